//! A live, filtered, searched and sorted view of the active tasks
//!
//! The view is derived from four inputs: a [`TaskFilter`], a search query, a [`SortOrder`] and the latest
//! snapshot of the active tasks.
//! Changing any of them recomputes the whole view with [`derive_view`], and the new view replaces the previous one
//! at once: readers never see a half-computed view.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use crate::task::{Priority, Task};
use crate::traits::TaskSnapshot;

/// The ordered list of tasks that matches the current inputs of a [`QueryPipeline`]
pub type TaskView = Arc<Vec<Task>>;


/// Which tasks should be kept in a view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskFilter {
    All,
    Pending,
    Completed,
    HighPriority,
    MediumPriority,
    LowPriority,
}

impl Default for TaskFilter {
    fn default() -> Self {
        TaskFilter::All
    }
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => task.completed() == false,
            TaskFilter::Completed => task.completed(),
            TaskFilter::HighPriority => *task.priority() == Priority::High,
            TaskFilter::MediumPriority => *task.priority() == Priority::Medium,
            TaskFilter::LowPriority => *task.priority() == Priority::Low,
        }
    }
}


/// How a view should be ordered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Newest first
    DateDesc,
    DateAsc,
    /// Highest priority first, then newest first
    PriorityDesc,
    /// Lowest priority first, then newest first
    PriorityAsc,
    TitleAsc,
    TitleDesc,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::DateDesc
    }
}

impl SortOrder {
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortOrder::DateDesc => b.created_at().cmp(a.created_at()),
            SortOrder::DateAsc => a.created_at().cmp(b.created_at()),
            // Ties between equal priorities always favour the newest task, whatever the direction
            SortOrder::PriorityDesc => b.priority().rank().cmp(&a.priority().rank())
                .then_with(|| b.created_at().cmp(a.created_at())),
            SortOrder::PriorityAsc => a.priority().rank().cmp(&b.priority().rank())
                .then_with(|| b.created_at().cmp(a.created_at())),
            SortOrder::TitleAsc => a.title().cmp(b.title()),
            SortOrder::TitleDesc => b.title().cmp(a.title()),
        }
    }
}


/// The user-settable inputs of a [`QueryPipeline`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryInputs {
    pub filter: TaskFilter,
    /// Empty means "no search"
    pub search_query: String,
    pub sort_order: SortOrder,
}


/// Compute a view out of a task snapshot: filter, then search, then sort.
///
/// Sorting is stable, so tasks that compare equal keep their relative order.
pub fn derive_view(tasks: &[Task], inputs: &QueryInputs) -> Vec<Task> {
    let filtered = tasks.iter().filter(|t| inputs.filter.matches(t));

    let mut view: Vec<Task> = if inputs.search_query.is_empty() {
        filtered.cloned().collect()
    } else {
        let needle = inputs.search_query.to_lowercase();
        filtered.filter(|t| t.matches_lowercase(&needle)).cloned().collect()
    };

    view.sort_by(|a, b| inputs.sort_order.compare(a, b));
    view
}


/// Maintains a [`TaskView`] that is always consistent with its inputs
#[derive(Debug)]
pub struct QueryPipeline {
    inputs: QueryInputs,
    snapshot: TaskSnapshot,
    view_tx: watch::Sender<TaskView>,
}

impl QueryPipeline {
    /// Create a pipeline with default inputs (every task, no search, newest first)
    pub fn new(snapshot: TaskSnapshot) -> Self {
        Self::with_inputs(snapshot, QueryInputs::default())
    }

    pub fn with_inputs(snapshot: TaskSnapshot, inputs: QueryInputs) -> Self {
        let view = derive_view(&snapshot, &inputs);
        let (view_tx, _) = watch::channel(Arc::new(view));
        Self { inputs, snapshot, view_tx }
    }

    pub fn inputs(&self) -> &QueryInputs {
        &self.inputs
    }

    /// The current view
    pub fn view(&self) -> TaskView {
        self.view_tx.borrow().clone()
    }

    /// Get notified every time the view is recomputed
    pub fn subscribe(&self) -> watch::Receiver<TaskView> {
        self.view_tx.subscribe()
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.inputs.filter = filter;
        self.recompute();
    }

    pub fn set_search_query<S: ToString>(&mut self, query: S) {
        self.inputs.search_query = query.to_string();
        self.recompute();
    }

    pub fn set_sort_order(&mut self, sort_order: SortOrder) {
        self.inputs.sort_order = sort_order;
        self.recompute();
    }

    /// Feed the latest content of the active store
    pub fn set_snapshot(&mut self, snapshot: TaskSnapshot) {
        self.snapshot = snapshot;
        self.recompute();
    }

    fn recompute(&mut self) {
        let view = derive_view(&self.snapshot, &self.inputs);
        log::trace!("Task view recomputed ({} of {} tasks)", view.len(), self.snapshot.len());
        self.view_tx.send_replace(Arc::new(view));
    }

    /// Feed `pipeline` with every snapshot `snapshots` receives, until its sender is dropped.
    ///
    /// This is usually spawned as a background task, e.g. with the receiver of [`TaskStore::watch_tasks`](crate::traits::TaskStore::watch_tasks)
    pub async fn follow(pipeline: Arc<Mutex<QueryPipeline>>, mut snapshots: watch::Receiver<TaskSnapshot>) {
        loop {
            {
                // Reading the receiver under the pipeline lock keeps other feeders from installing an older snapshot
                let mut pipeline = pipeline.lock().unwrap_or_else(PoisonError::into_inner);
                let snapshot = snapshots.borrow_and_update().clone();
                pipeline.set_snapshot(snapshot);
            }

            if snapshots.changed().await.is_err() {
                log::debug!("Task snapshots are not published anymore, the view will not follow them");
                break;
            }
        }
    }
}
