//! The contract this crate expects from a durable store
//!
//! A store holds three independent collections: active tasks, trashed tasks and holidays.
//! Every collection can be observed: its `watch_*` method returns a receiver that is notified with a fresh
//! snapshot whenever the collection changes.

use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tokio::sync::watch;

use crate::task::{NewTask, Priority, Task, TaskId};
use crate::trashed_task::{TrashEntry, TrashId, TrashedTask};
use crate::holiday::Holiday;

/// The error a store may return
pub type StoreError = Box<dyn Error + Send + Sync>;
pub type StoreResult<T> = Result<T, StoreError>;

/// Every active task, newest first
pub type TaskSnapshot = Arc<Vec<Task>>;
/// Every trashed task, most recently deleted first
pub type TrashSnapshot = Arc<Vec<TrashedTask>>;
/// Every holiday, in chronological order
pub type HolidaySnapshot = Arc<Vec<Holiday>>;


#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a task and return the identity the store has given to it
    async fn insert_task(&self, task: NewTask) -> StoreResult<TaskId>;
    /// Replace the content of an existing task. Its creation date is kept as it was stored
    async fn update_task(&self, task: &Task) -> StoreResult<()>;
    /// Remove a task. Fails if it does not exist
    async fn delete_task(&self, id: &TaskId) -> StoreResult<()>;
    async fn get_task(&self, id: &TaskId) -> StoreResult<Option<Task>>;
    /// Returns every task, newest first
    async fn get_tasks(&self) -> StoreResult<Vec<Task>>;
    /// Mark a task as completed or pending. Fails if it does not exist
    async fn set_task_completion(&self, id: &TaskId, completed: bool) -> StoreResult<()>;

    /// Get notified of every change of the task collection
    fn watch_tasks(&self) -> watch::Receiver<TaskSnapshot>;

    async fn get_tasks_by_completion(&self, completed: bool) -> StoreResult<Vec<Task>> {
        let tasks = self.get_tasks().await?;
        Ok(tasks.into_iter().filter(|t| t.completed() == completed).collect())
    }

    async fn get_tasks_by_priority(&self, priority: &Priority) -> StoreResult<Vec<Task>> {
        let tasks = self.get_tasks().await?;
        Ok(tasks.into_iter().filter(|t| t.priority() == priority).collect())
    }

    async fn get_tasks_by_category(&self, category: &str) -> StoreResult<Vec<Task>> {
        let tasks = self.get_tasks().await?;
        Ok(tasks.into_iter().filter(|t| t.category() == category).collect())
    }

    /// Returns the tasks whose title or description contains `needle` (ignoring case), newest first
    async fn search_tasks(&self, needle: &str) -> StoreResult<Vec<Task>> {
        let needle = needle.to_lowercase();
        let tasks = self.get_tasks().await?;
        Ok(tasks.into_iter().filter(|t| t.matches_lowercase(&needle)).collect())
    }

    /// Returns every category that is used by at least one task, sorted alphabetically
    async fn get_categories(&self) -> StoreResult<Vec<String>> {
        let mut categories: Vec<String> = self.get_tasks().await?
            .iter()
            .map(|t| t.category().to_string())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }
}


#[async_trait]
pub trait TrashStore: Send + Sync {
    /// Insert a trash entry and return the identity the store has given to it
    async fn insert_trashed(&self, entry: TrashEntry) -> StoreResult<TrashId>;
    /// Remove a trash entry. Fails if it does not exist
    async fn delete_trashed(&self, id: &TrashId) -> StoreResult<()>;
    /// Remove every trash entry, and return how many have been removed
    async fn delete_all_trashed(&self) -> StoreResult<usize>;
    /// Remove every trash entry that has been deleted strictly before `threshold`, and return how many have been removed
    async fn delete_trashed_older_than(&self, threshold: DateTime<Utc>) -> StoreResult<usize>;
    async fn get_trashed_task(&self, id: &TrashId) -> StoreResult<Option<TrashedTask>>;
    /// Returns every trash entry, most recently deleted first
    async fn get_trashed_tasks(&self) -> StoreResult<Vec<TrashedTask>>;

    /// Get notified of every change of the trash collection
    fn watch_trash(&self) -> watch::Receiver<TrashSnapshot>;

    async fn count_trashed(&self) -> StoreResult<usize> {
        Ok(self.get_trashed_tasks().await?.len())
    }
}


#[async_trait]
pub trait HolidayStore: Send + Sync {
    /// Insert a holiday, or replace the one that is on the same date
    async fn upsert_holiday(&self, holiday: Holiday) -> StoreResult<()>;
    /// Insert several holidays, replacing the ones that are on the same dates
    async fn upsert_holidays(&self, holidays: Vec<Holiday>) -> StoreResult<()>;
    async fn get_holiday_by_date(&self, date: &NaiveDate) -> StoreResult<Option<Holiday>>;
    /// Returns every holiday, in chronological order
    async fn get_holidays(&self) -> StoreResult<Vec<Holiday>>;
    async fn delete_all_holidays(&self) -> StoreResult<()>;
    /// Remove the holidays that have been generated for `year`
    async fn delete_holidays_by_year(&self, year: i32) -> StoreResult<()>;

    /// Get notified of every change of the holiday collection
    fn watch_holidays(&self) -> watch::Receiver<HolidaySnapshot>;

    /// Returns the holidays that have been generated for `year`, in chronological order
    async fn get_holidays_by_year(&self, year: i32) -> StoreResult<Vec<Holiday>> {
        let holidays = self.get_holidays().await?;
        Ok(holidays.into_iter().filter(|h| h.year() == year).collect())
    }

    /// Returns the holidays of `year` that fall in `month` (1-12), in chronological order
    async fn get_holidays_by_month(&self, year: i32, month: u32) -> StoreResult<Vec<Holiday>> {
        let holidays = self.get_holidays_by_year(year).await?;
        Ok(holidays.into_iter().filter(|h| h.date().month() == month).collect())
    }

    /// Returns the holidays between `start` and `end` (both included), in chronological order
    async fn get_holidays_in_range(&self, start: &NaiveDate, end: &NaiveDate) -> StoreResult<Vec<Holiday>> {
        let holidays = self.get_holidays().await?;
        Ok(holidays.into_iter().filter(|h| h.date() >= start && h.date() <= end).collect())
    }
}
