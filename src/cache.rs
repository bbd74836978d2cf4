//! This module provides a local store, that keeps its data in memory and can save it to a JSON file

use std::path::PathBuf;
use std::path::Path;
use std::error::Error;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::watch;

use crate::traits::{TaskStore, TrashStore, HolidayStore};
use crate::traits::{StoreError, StoreResult, TaskSnapshot, TrashSnapshot, HolidaySnapshot};
use crate::task::{NewTask, Task, TaskId};
use crate::trashed_task::{TrashEntry, TrashId, TrashedTask};
use crate::holiday::Holiday;
use crate::mock_behaviour::MockBehaviour;


/// A store that keeps every collection in memory.
///
/// It implements [`TaskStore`], [`TrashStore`] and [`HolidayStore`].
/// Its content can be saved to (and loaded from) a backing JSON file.
#[derive(Debug)]
pub struct Cache {
    backing_file: Option<PathBuf>,
    data: Mutex<CachedData>,

    tasks_tx: watch::Sender<TaskSnapshot>,
    trash_tx: watch::Sender<TrashSnapshot>,
    holidays_tx: watch::Sender<HolidaySnapshot>,

    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CachedData {
    /// In insertion order
    tasks: Vec<Task>,
    /// In insertion order
    trash: Vec<TrashedTask>,
    holidays: BTreeMap<NaiveDate, Holiday>,
}

impl Cache {
    /// Initialize a cache with no content, that will be saved to `path`
    pub fn new(path: &Path) -> Self {
        Self::from_data(Some(PathBuf::from(path)), CachedData::default())
    }

    /// Initialize a cache with no content and no backing file
    pub fn in_memory() -> Self {
        Self::from_data(None, CachedData::default())
    }

    /// Initialize a cache from the content of a valid backing file if it exists.
    /// Returns an error otherwise
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let data = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(file)?,
        };

        Ok(Self::from_data(Some(PathBuf::from(path)), data))
    }

    fn from_data(backing_file: Option<PathBuf>, data: CachedData) -> Self {
        let (tasks_tx, _) = watch::channel(Arc::new(sorted_tasks(&data)));
        let (trash_tx, _) = watch::channel(Arc::new(sorted_trash(&data)));
        let (holidays_tx, _) = watch::channel(Arc::new(data.holidays.values().cloned().collect()));

        Self {
            backing_file,
            data: Mutex::new(data),
            tasks_tx,
            trash_tx,
            holidays_tx,
            mock_behaviour: None,
        }
    }

    /// Make this store fail some operations, according to `mock_behaviour`
    pub fn with_mock_behaviour(mut self, mock_behaviour: Arc<Mutex<MockBehaviour>>) -> Self {
        self.mock_behaviour = Some(mock_behaviour);
        self
    }

    /// Store the current content to the backing file
    pub fn save_to_file(&self) -> Result<(), Box<dyn Error>> {
        let path = match &self.backing_file {
            None => return Err("This cache has no backing file".into()),
            Some(path) => path,
        };
        if let Some(folder) = path.parent() {
            std::fs::create_dir_all(folder)?;
        }
        let file = match std::fs::File::create(path) {
            Err(err) => {
                return Err(format!("Unable to save file {:?}: {}", path, err).into());
            },
            Ok(f) => f,
        };

        let data = self.data().clone();
        serde_json::to_writer(file, &data)?;
        log::debug!("Cache saved to {:?}", path);
        Ok(())
    }

    /// Compares two Caches to check they have the same current content
    pub fn has_same_contents_than(&self, other: &Self) -> bool {
        *self.data() == *other.data()
    }

    fn data(&self) -> MutexGuard<'_, CachedData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_mock<F>(&self, can: F) -> StoreResult<()>
    where
        F: FnOnce(&mut MockBehaviour) -> Result<(), StoreError>,
    {
        match &self.mock_behaviour {
            None => Ok(()),
            Some(mb) => can(&mut mb.lock().unwrap_or_else(PoisonError::into_inner)),
        }
    }

    fn publish_tasks(&self, data: &CachedData) {
        self.tasks_tx.send_replace(Arc::new(sorted_tasks(data)));
    }
    fn publish_trash(&self, data: &CachedData) {
        self.trash_tx.send_replace(Arc::new(sorted_trash(data)));
    }
    fn publish_holidays(&self, data: &CachedData) {
        self.holidays_tx.send_replace(Arc::new(data.holidays.values().cloned().collect()));
    }
}

/// Newest first. Tasks created at the same instant keep their insertion order.
fn sorted_tasks(data: &CachedData) -> Vec<Task> {
    let mut tasks = data.tasks.clone();
    tasks.sort_by(|a, b| b.created_at().cmp(a.created_at()));
    tasks
}

/// Most recently deleted first
fn sorted_trash(data: &CachedData) -> Vec<TrashedTask> {
    let mut trash = data.trash.clone();
    trash.sort_by(|a, b| b.deleted_at().cmp(a.deleted_at()));
    trash
}


#[async_trait]
impl TaskStore for Cache {
    async fn insert_task(&self, task: NewTask) -> StoreResult<TaskId> {
        self.check_mock(MockBehaviour::can_insert_task)?;

        let id = TaskId::random();
        let mut data = self.data();
        data.tasks.push(Task::from_new(id, task));
        self.publish_tasks(&data);
        Ok(id)
    }

    async fn update_task(&self, task: &Task) -> StoreResult<()> {
        self.check_mock(MockBehaviour::can_update_task)?;

        let mut data = self.data();
        match data.tasks.iter_mut().find(|t| t.id() == task.id()) {
            None => return Err(format!("No task with id {}", task.id()).into()),
            Some(stored) => {
                // The creation date belongs to the stored task, whatever the caller sent
                let content = NewTask { created_at: *stored.created_at(), ..task.content().clone() };
                *stored = Task::from_new(*task.id(), content);
            },
        }
        self.publish_tasks(&data);
        Ok(())
    }

    async fn delete_task(&self, id: &TaskId) -> StoreResult<()> {
        self.check_mock(MockBehaviour::can_delete_task)?;

        let mut data = self.data();
        let len_before = data.tasks.len();
        data.tasks.retain(|t| t.id() != id);
        if data.tasks.len() == len_before {
            return Err(format!("No task with id {}", id).into());
        }
        self.publish_tasks(&data);
        Ok(())
    }

    async fn get_task(&self, id: &TaskId) -> StoreResult<Option<Task>> {
        Ok(self.data().tasks.iter().find(|t| t.id() == id).cloned())
    }

    async fn get_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(sorted_tasks(&self.data()))
    }

    async fn set_task_completion(&self, id: &TaskId, completed: bool) -> StoreResult<()> {
        self.check_mock(MockBehaviour::can_update_task)?;

        let mut data = self.data();
        match data.tasks.iter_mut().find(|t| t.id() == id) {
            None => return Err(format!("No task with id {}", id).into()),
            Some(stored) => stored.set_completed(completed),
        }
        self.publish_tasks(&data);
        Ok(())
    }

    fn watch_tasks(&self) -> watch::Receiver<TaskSnapshot> {
        self.tasks_tx.subscribe()
    }
}


#[async_trait]
impl TrashStore for Cache {
    async fn insert_trashed(&self, entry: TrashEntry) -> StoreResult<TrashId> {
        self.check_mock(MockBehaviour::can_insert_trashed)?;

        let id = TrashId::random();
        let mut data = self.data();
        data.trash.push(TrashedTask::from_entry(id, entry));
        self.publish_trash(&data);
        Ok(id)
    }

    async fn delete_trashed(&self, id: &TrashId) -> StoreResult<()> {
        self.check_mock(MockBehaviour::can_delete_trashed)?;

        let mut data = self.data();
        let len_before = data.trash.len();
        data.trash.retain(|t| t.id() != id);
        if data.trash.len() == len_before {
            return Err(format!("No trash entry with id {}", id).into());
        }
        self.publish_trash(&data);
        Ok(())
    }

    async fn delete_all_trashed(&self) -> StoreResult<usize> {
        self.check_mock(MockBehaviour::can_delete_trashed)?;

        let mut data = self.data();
        let n_removed = data.trash.len();
        data.trash.clear();
        self.publish_trash(&data);
        Ok(n_removed)
    }

    async fn delete_trashed_older_than(&self, threshold: DateTime<Utc>) -> StoreResult<usize> {
        self.check_mock(MockBehaviour::can_delete_trashed)?;

        let mut data = self.data();
        let len_before = data.trash.len();
        data.trash.retain(|t| *t.deleted_at() >= threshold);
        let n_removed = len_before - data.trash.len();
        if n_removed > 0 {
            self.publish_trash(&data);
        }
        Ok(n_removed)
    }

    async fn get_trashed_task(&self, id: &TrashId) -> StoreResult<Option<TrashedTask>> {
        Ok(self.data().trash.iter().find(|t| t.id() == id).cloned())
    }

    async fn get_trashed_tasks(&self) -> StoreResult<Vec<TrashedTask>> {
        Ok(sorted_trash(&self.data()))
    }

    fn watch_trash(&self) -> watch::Receiver<TrashSnapshot> {
        self.trash_tx.subscribe()
    }

    async fn count_trashed(&self) -> StoreResult<usize> {
        Ok(self.data().trash.len())
    }
}


#[async_trait]
impl HolidayStore for Cache {
    async fn upsert_holiday(&self, holiday: Holiday) -> StoreResult<()> {
        self.upsert_holidays(vec![holiday]).await
    }

    async fn upsert_holidays(&self, holidays: Vec<Holiday>) -> StoreResult<()> {
        self.check_mock(MockBehaviour::can_upsert_holidays)?;

        let mut data = self.data();
        for holiday in holidays {
            data.holidays.insert(*holiday.date(), holiday);
        }
        self.publish_holidays(&data);
        Ok(())
    }

    async fn get_holiday_by_date(&self, date: &NaiveDate) -> StoreResult<Option<Holiday>> {
        Ok(self.data().holidays.get(date).cloned())
    }

    async fn get_holidays(&self) -> StoreResult<Vec<Holiday>> {
        Ok(self.data().holidays.values().cloned().collect())
    }

    async fn delete_all_holidays(&self) -> StoreResult<()> {
        self.check_mock(MockBehaviour::can_delete_holidays)?;

        let mut data = self.data();
        data.holidays.clear();
        self.publish_holidays(&data);
        Ok(())
    }

    async fn delete_holidays_by_year(&self, year: i32) -> StoreResult<()> {
        self.check_mock(MockBehaviour::can_delete_holidays)?;

        let mut data = self.data();
        data.holidays.retain(|_date, h| h.year() != year);
        self.publish_holidays(&data);
        Ok(())
    }

    fn watch_holidays(&self) -> watch::Receiver<HolidaySnapshot> {
        self.holidays_tx.subscribe()
    }

    async fn get_holidays_in_range(&self, start: &NaiveDate, end: &NaiveDate) -> StoreResult<Vec<Holiday>> {
        if start > end {
            return Ok(Vec::new());
        }
        Ok(self.data().holidays.range(*start..=*end).map(|(_, h)| h.clone()).collect())
    }
}
