//! The trash bin: soft deletion, restoration and purge of tasks
//!
//! A task is either active or trashed, never both and never neither.
//! Every deletion goes through the trash, and leaving the trash means being either restored (under a new identity)
//! or purged for good.
//!
//! Moving between the two stores takes two store operations. When the second one fails, the first one is undone
//! before the error is reported.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::error::{Error, Result};
use crate::task::{Task, TaskId};
use crate::trashed_task::{TrashEntry, TrashId, TrashedTask};
use crate::traits::{TaskStore, TrashStore};


pub struct TrashBin<S> {
    store: Arc<S>,
}

impl<S> Clone for TrashBin<S> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone() }
    }
}

impl<S> TrashBin<S>
where
    S: TaskStore + TrashStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Move an active task to the trash, and return the resulting trash entry
    pub async fn move_to_trash(&self, task: &Task) -> Result<TrashedTask> {
        self.move_to_trash_at(task, Utc::now()).await
    }

    /// Same as [`Self::move_to_trash`], with an explicit deletion date
    pub async fn move_to_trash_at(&self, task: &Task, deleted_at: DateTime<Utc>) -> Result<TrashedTask> {
        let entry = TrashEntry::from_task(task, deleted_at);
        let trash_id = self.store.insert_trashed(entry.clone()).await
            .map_err(Error::store("insert a task into the trash"))?;

        if let Err(err) = self.store.delete_task(task.id()).await {
            log::warn!("Unable to remove task {} from the active tasks ({}). Taking it out of the trash again", task.id(), err);
            if let Err(undo_err) = self.store.delete_trashed(&trash_id).await {
                log::error!("Task {} is now both active and trashed (as {}): {}", task.id(), trash_id, undo_err);
                return Err(Error::Inconsistent {
                    operation: "move to trash",
                    details: format!("task {} is also in the trash as {} ({})", task.id(), trash_id, undo_err),
                });
            }
            return Err(Error::Store { operation: "remove a task from the active tasks", source: err });
        }

        log::info!("Task {} ({}) moved to the trash as {}", task.id(), task.title(), trash_id);
        Ok(TrashedTask::from_entry(trash_id, entry))
    }

    /// Bring a trashed task back to the active tasks, and return its new identity.
    ///
    /// Every field is restored as it was (including its creation date), but the task gets a new id.
    pub async fn restore(&self, trashed: &TrashedTask) -> Result<TaskId> {
        let new_id = self.store.insert_task(trashed.to_restored()).await
            .map_err(Error::store("restore a task"))?;

        if let Err(err) = self.store.delete_trashed(trashed.id()).await {
            log::warn!("Unable to remove {} from the trash ({}). Removing its restored copy {}", trashed.id(), err, new_id);
            if let Err(undo_err) = self.store.delete_task(&new_id).await {
                log::error!("Trash entry {} is now also active as task {}: {}", trashed.id(), new_id, undo_err);
                return Err(Error::Inconsistent {
                    operation: "restore",
                    details: format!("trash entry {} is also active as task {} ({})", trashed.id(), new_id, undo_err),
                });
            }
            return Err(Error::Store { operation: "remove a task from the trash", source: err });
        }

        log::info!("Trash entry {} ({}) restored as task {}", trashed.id(), trashed.title(), new_id);
        Ok(new_id)
    }

    /// Delete a trashed task for good
    pub async fn purge_one(&self, trashed: &TrashedTask) -> Result<()> {
        self.store.delete_trashed(trashed.id()).await
            .map_err(Error::store("permanently delete a task"))?;
        log::info!("Trash entry {} ({}) permanently deleted", trashed.id(), trashed.title());
        Ok(())
    }

    /// Empty the trash, and return how many tasks have been deleted
    pub async fn purge_all(&self) -> Result<usize> {
        let n_purged = self.store.delete_all_trashed().await
            .map_err(Error::store("empty the trash"))?;
        log::info!("Trash emptied ({} tasks permanently deleted)", n_purged);
        Ok(n_purged)
    }

    /// Delete for good every task that has been trashed strictly before `threshold`, and return how many have been deleted
    pub async fn purge_older_than(&self, threshold: DateTime<Utc>) -> Result<usize> {
        let n_purged = self.store.delete_trashed_older_than(threshold).await
            .map_err(Error::store("purge old tasks from the trash"))?;
        log::info!("{} tasks trashed before {} permanently deleted", n_purged, threshold);
        Ok(n_purged)
    }

    /// Delete for good every task that has stayed in the trash longer than the configured retention
    /// (see [`TRASH_RETENTION_DAYS`](crate::config::TRASH_RETENTION_DAYS))
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let days = crate::config::trash_retention_days();
        let threshold = Duration::try_days(days)
            .and_then(|retention| now.checked_sub_signed(retention))
            .ok_or(Error::RetentionOutOfRange(days))?;
        self.purge_older_than(threshold).await
    }

    /// Returns every trashed task, most recently deleted first
    pub async fn list(&self) -> Result<Vec<TrashedTask>> {
        self.store.get_trashed_tasks().await
            .map_err(Error::store("list the trash"))
    }

    pub async fn get(&self, id: &TrashId) -> Result<TrashedTask> {
        match self.store.get_trashed_task(id).await.map_err(Error::store("read the trash"))? {
            None => Err(Error::TrashEntryNotFound(*id)),
            Some(trashed) => Ok(trashed),
        }
    }

    pub async fn count(&self) -> Result<usize> {
        self.store.count_trashed().await
            .map_err(Error::store("count the trash"))
    }
}
