//! Tasks that have been moved to the trash

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use crate::task::{NewTask, Task, TaskId};


/// The identifier of an entry of the trash store
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrashId {
    content: Uuid,
}
impl TrashId {
    /// Generate a random TrashId.
    pub fn random() -> Self {
        Self { content: Uuid::new_v4() }
    }
}
impl Display for TrashId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content.to_hyphenated())
    }
}


/// A trash entry that has not been given an identity by a store yet
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrashEntry {
    /// The id the task had when it was active
    pub original_task_id: TaskId,
    /// Every field of the task, as they were at deletion time
    pub snapshot: NewTask,
    pub deleted_at: DateTime<Utc>,
}

impl TrashEntry {
    /// Snapshot an active task
    pub fn from_task(task: &Task, deleted_at: DateTime<Utc>) -> Self {
        Self {
            original_task_id: *task.id(),
            snapshot: task.content().clone(),
            deleted_at,
        }
    }
}


/// A snapshot of a deleted task
///
/// Once created, none of its fields ever change: it can only be restored (which creates a brand new task) or purged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrashedTask {
    id: TrashId,
    entry: TrashEntry,
}

impl TrashedTask {
    /// Give an identity to a trash entry. This is meant to be called by stores only.
    pub fn from_entry(id: TrashId, entry: TrashEntry) -> Self {
        Self { id, entry }
    }

    pub fn id(&self) -> &TrashId                    { &self.id                      }
    pub fn original_task_id(&self) -> &TaskId       { &self.entry.original_task_id  }
    pub fn deleted_at(&self) -> &DateTime<Utc>      { &self.entry.deleted_at        }
    pub fn title(&self) -> &str                     { &self.entry.snapshot.title    }
    /// The task fields, as they were when it has been deleted
    pub fn snapshot(&self) -> &NewTask              { &self.entry.snapshot          }

    /// The content a restored task will have.
    ///
    /// The original creation date is preserved, only the identity will differ.
    pub fn to_restored(&self) -> NewTask {
        self.entry.snapshot.clone()
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::task::Priority;

    #[test]
    fn test_snapshot_keeps_every_field() {
        let content = NewTask::new("Water the plants")
            .with_description("The big ones too")
            .with_priority(Priority::High)
            .with_category("Home")
            .completed(true)
            .with_due_at(Utc::now());
        let task = Task::from_new(TaskId::random(), content.clone());

        let deleted_at = Utc::now();
        let trashed = TrashedTask::from_entry(TrashId::random(), TrashEntry::from_task(&task, deleted_at));
        assert_eq!(trashed.original_task_id(), task.id());
        assert_eq!(trashed.deleted_at(), &deleted_at);
        assert_eq!(trashed.to_restored(), content);
    }
}
