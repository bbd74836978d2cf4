//! Errors returned by this crate

use thiserror::Error;

use crate::task::TaskId;
use crate::trashed_task::TrashId;
use crate::traits::StoreError;

/// Reasons why a task is refused before it reaches a store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("a task title cannot be empty")]
    EmptyTitle,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid task: {0}")]
    Validation(#[from] ValidationError),

    #[error("task {0} does not exist")]
    TaskNotFound(TaskId),

    #[error("trash entry {0} does not exist")]
    TrashEntryNotFound(TrashId),

    /// The underlying store refused an operation. Nothing has been changed.
    #[error("unable to {operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    /// A two-step transition failed half-way, and undoing its first step failed as well.
    #[error("inconsistent state after a failed {operation}: {details}")]
    Inconsistent {
        operation: &'static str,
        details: String,
    },

    #[error("{year}-{month} is not a valid month")]
    InvalidMonth { year: i32, month: u32 },

    #[error("year {0} is out of the supported date range")]
    YearOutOfRange(i32),

    /// The configured trash retention cannot be subtracted from the current date
    #[error("a trash retention of {0} days is out of the supported date range")]
    RetentionOutOfRange(i64),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns a closure that wraps a store error, to be used with `map_err`
    pub(crate) fn store(operation: &'static str) -> impl FnOnce(StoreError) -> Error {
        move |source| Error::Store { operation, source }
    }
}
