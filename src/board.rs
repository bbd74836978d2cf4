//! The entry point for task commands
//!
//! A [`TaskBoard`] validates and applies commands to a store, routes deletions through the trash, and keeps a
//! [`QueryPipeline`] fed with the latest content of the active store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::pipeline::{QueryInputs, QueryPipeline, SortOrder, TaskFilter, TaskView};
use crate::task::{NewTask, Task, TaskId};
use crate::trash::TrashBin;
use crate::trashed_task::TrashedTask;
use crate::traits::{TaskSnapshot, TaskStore, TrashStore};


pub struct TaskBoard<S> {
    store: Arc<S>,
    trash: TrashBin<S>,
    pipeline: Arc<Mutex<QueryPipeline>>,
    snapshots: Mutex<watch::Receiver<TaskSnapshot>>,
    /// Keeps the view in sync with changes that are not made through this board
    follower: Option<JoinHandle<()>>,
}

impl<S> TaskBoard<S>
where
    S: TaskStore + TrashStore,
{
    /// Create a board over `store`.
    ///
    /// When called from within a Tokio runtime, a background task follows every change of the store (including the
    /// ones made by other boards or directly on the store), so that view subscribers are always notified. \
    /// Without a runtime, the view is only refreshed when this board is used.
    pub fn new(store: Arc<S>) -> Self {
        let mut snapshots = store.watch_tasks();
        let pipeline = Arc::new(Mutex::new(QueryPipeline::new(snapshots.borrow_and_update().clone())));

        let follower = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => Some(runtime.spawn(QueryPipeline::follow(pipeline.clone(), store.watch_tasks()))),
            Err(_) => {
                log::debug!("No Tokio runtime, the task view will only be refreshed on demand");
                None
            },
        };

        Self {
            trash: TrashBin::new(store.clone()),
            store,
            pipeline,
            snapshots: Mutex::new(snapshots),
            follower,
        }
    }

    /// The trash bin deleted tasks go to
    pub fn trash(&self) -> &TrashBin<S> {
        &self.trash
    }

    /// The pipeline behind [`Self::view`]
    pub fn pipeline(&self) -> Arc<Mutex<QueryPipeline>> {
        self.pipeline.clone()
    }

    //
    // Commands
    //

    /// Create a task, and return the id the store has given to it
    pub async fn create_task(&self, task: NewTask) -> Result<TaskId> {
        task.validate()?;
        let id = self.store.insert_task(task).await
            .map_err(Error::store("create the task"))?;
        log::debug!("Task {} created", id);
        self.refresh();
        Ok(id)
    }

    /// Save the edited fields of an existing task
    pub async fn update_task(&self, task: &Task) -> Result<()> {
        task.validate()?;
        self.store.update_task(task).await
            .map_err(Error::store("update the task"))?;
        log::debug!("Task {} updated", task.id());
        self.refresh();
        Ok(())
    }

    /// Switch a task between completed and pending, and return its new completion status
    pub async fn toggle_completion(&self, id: &TaskId) -> Result<bool> {
        let task = self.get_task(id).await?.ok_or(Error::TaskNotFound(*id))?;
        let completed = task.completed() == false;
        self.store.set_task_completion(id, completed).await
            .map_err(Error::store("change the task status"))?;
        log::debug!("Task {} is now {}", id, if completed { "completed" } else { "pending" });
        self.refresh();
        Ok(completed)
    }

    /// Move a task to the trash.
    ///
    /// The task is read again from the store, so that the trash keeps its latest content even if `task` is outdated.
    pub async fn delete_task(&self, task: &Task) -> Result<TrashedTask> {
        let stored = self.get_task(task.id()).await?.ok_or(Error::TaskNotFound(*task.id()))?;
        let result = self.trash.move_to_trash(&stored).await;
        self.refresh();
        result
    }

    /// Move every completed task to the trash, and return how many have been moved.
    ///
    /// This stops at the first failure; tasks that have been moved already stay in the trash.
    pub async fn trash_completed_tasks(&self) -> Result<usize> {
        let completed = self.store.get_tasks_by_completion(true).await
            .map_err(Error::store("list completed tasks"))?;

        let mut n_moved = 0;
        let mut result = Ok(());
        for task in &completed {
            if let Err(err) = self.trash.move_to_trash(task).await {
                result = Err(err);
                break;
            }
            n_moved += 1;
        }
        self.refresh();
        result.map(|_| n_moved)
    }

    /// Bring a trashed task back, and return its new id
    pub async fn restore_task(&self, trashed: &TrashedTask) -> Result<TaskId> {
        let result = self.trash.restore(trashed).await;
        self.refresh();
        result
    }

    //
    // Queries
    //

    pub async fn get_task(&self, id: &TaskId) -> Result<Option<Task>> {
        self.store.get_task(id).await
            .map_err(Error::store("read the task"))
    }

    /// Every category used by at least one task, sorted alphabetically
    pub async fn categories(&self) -> Result<Vec<String>> {
        self.store.get_categories().await
            .map_err(Error::store("list categories"))
    }

    //
    // View
    //

    pub fn set_filter(&self, filter: TaskFilter) {
        self.refresh();
        self.lock_pipeline().set_filter(filter);
    }

    pub fn set_search_query<Q: ToString>(&self, query: Q) {
        self.refresh();
        self.lock_pipeline().set_search_query(query);
    }

    pub fn set_sort_order(&self, sort_order: SortOrder) {
        self.refresh();
        self.lock_pipeline().set_sort_order(sort_order);
    }

    pub fn inputs(&self) -> QueryInputs {
        self.lock_pipeline().inputs().clone()
    }

    /// The active tasks that match the current filter and search query, in the current sort order
    pub fn view(&self) -> TaskView {
        self.refresh();
        self.lock_pipeline().view()
    }

    /// Get notified every time the view changes.
    ///
    /// See [`Self::new`] for the changes that are followed without a runtime.
    pub fn subscribe_view(&self) -> watch::Receiver<TaskView> {
        self.lock_pipeline().subscribe()
    }

    /// Feed the pipeline with the latest snapshot of the active store, if it has changed
    fn refresh(&self) {
        // Same lock order as `QueryPipeline::follow`: pipeline first, then the receiver
        let mut pipeline = self.lock_pipeline();
        let mut snapshots = self.snapshots.lock().unwrap_or_else(PoisonError::into_inner);
        let changed = match snapshots.has_changed() {
            Ok(changed) => changed,
            // The store is gone, there is nothing new to see
            Err(_) => false,
        };
        if changed {
            let snapshot = snapshots.borrow_and_update().clone();
            pipeline.set_snapshot(snapshot);
        }
    }
}

impl<S> Drop for TaskBoard<S> {
    fn drop(&mut self) {
        if let Some(follower) = self.follower.take() {
            follower.abort();
        }
    }
}

impl<S> TaskBoard<S> {
    fn lock_pipeline(&self) -> MutexGuard<'_, QueryPipeline> {
        self.pipeline.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
