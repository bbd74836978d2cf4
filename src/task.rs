//! To-do tasks

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};

use crate::error::ValidationError;


/// The identifier of an active task.
///
/// It is assigned by a store when a task is inserted, and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId {
    content: Uuid,
}
impl TaskId {
    /// Generate a random TaskId.
    pub fn random() -> Self {
        Self { content: Uuid::new_v4() }
    }
}
impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content.to_hyphenated())
    }
}


/// How urgent a task is.
///
/// Labels that are none of the three known ones are kept as-is in `Other`, they rank below `Low`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
    Other(String),
}

impl Priority {
    /// The rank used to sort tasks by priority (High=3, Medium=2, Low=1, anything else=0)
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
            Priority::Other(_) => 0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Other(label) => label,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = std::convert::Infallible;

    /// Parsing never fails: unknown labels become `Priority::Other`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let prio = match s.to_lowercase().as_str() {
            "high" | "alta" => Priority::High,
            "medium" | "media" => Priority::Medium,
            "low" | "baja" => Priority::Low,
            _ => Priority::Other(s.to_string()),
        };
        Ok(prio)
    }
}

/// Used to support serde
impl Serialize for Priority {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Priority, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        let prio = match label.parse() {
            Ok(p) => p,
            Err(never) => match never {},
        };
        Ok(prio)
    }
}


/// Where the due date of a task stands, relative to a given instant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DueStatus {
    NoDueDate,
    /// The due instant is already past
    Overdue,
    DueToday,
    DueTomorrow,
    Later,
}


/// The content of a task that has not been given an identity by a store yet.
///
/// This is what gets inserted into a [`TaskStore`](crate::traits::TaskStore).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub category: String,
    pub completed: bool,
    /// This is set once, when the task is first created
    pub created_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
}

impl NewTask {
    /// Create a pending, medium-priority task in the default category, created now
    pub fn new<S: ToString>(title: S) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            priority: Priority::default(),
            category: crate::config::default_category(),
            completed: false,
            created_at: Utc::now(),
            due_at: None,
        }
    }

    pub fn with_description<S: ToString>(mut self, description: S) -> Self {
        self.description = Some(description.to_string());
        self
    }
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
    pub fn with_category<S: ToString>(mut self, category: S) -> Self {
        self.category = category.to_string();
        self
    }
    pub fn with_due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}


/// A to-do task, as stored in the active store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    content: NewTask,
}

impl Task {
    /// Give an identity to a new task. This is meant to be called by stores only.
    pub fn from_new(id: TaskId, content: NewTask) -> Self {
        Self { id, content }
    }

    pub fn id(&self) -> &TaskId                     { &self.id                  }
    pub fn title(&self) -> &str                     { &self.content.title       }
    pub fn description(&self) -> Option<&str>       { self.content.description.as_deref() }
    pub fn priority(&self) -> &Priority             { &self.content.priority    }
    pub fn category(&self) -> &str                  { &self.content.category    }
    pub fn completed(&self) -> bool                 { self.content.completed    }
    pub fn created_at(&self) -> &DateTime<Utc>      { &self.content.created_at  }
    pub fn due_at(&self) -> Option<&DateTime<Utc>>  { self.content.due_at.as_ref() }

    /// Everything but the identity of this task
    pub fn content(&self) -> &NewTask {
        &self.content
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.content.validate()
    }

    pub fn set_title<S: ToString>(&mut self, new_title: S) {
        self.content.title = new_title.to_string();
    }
    pub fn set_description(&mut self, new_description: Option<String>) {
        self.content.description = new_description;
    }
    pub fn set_priority(&mut self, new_priority: Priority) {
        self.content.priority = new_priority;
    }
    pub fn set_category<S: ToString>(&mut self, new_category: S) {
        self.content.category = new_category.to_string();
    }
    pub fn set_due_at(&mut self, new_due_at: Option<DateTime<Utc>>) {
        self.content.due_at = new_due_at;
    }
    pub fn set_completed(&mut self, completed: bool) {
        self.content.completed = completed;
    }

    /// Whether the title or the description contains `needle`, ignoring case.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title().to_lowercase().contains(needle)
            || self.description()
                .map(|d| d.to_lowercase().contains(needle))
                .unwrap_or(false)
    }

    /// Classify the due date of this task relative to `now` (days are UTC days)
    pub fn due_status(&self, now: DateTime<Utc>) -> DueStatus {
        let due = match self.due_at() {
            None => return DueStatus::NoDueDate,
            Some(due) => *due,
        };

        let today = now.date_naive();
        if due < now {
            DueStatus::Overdue
        } else if due.date_naive() == today {
            DueStatus::DueToday
        } else if due.date_naive() == today + Duration::days(1) {
            DueStatus::DueTomorrow
        } else {
            DueStatus::Later
        }
    }
}
