//! This crate provides a way to manage a personal task list, with a trash and a holiday calendar.
//!
//! Tasks, trashed tasks and holidays live in stores, that are defined by the traits in the [`traits`] module.
//! An in-memory (and optionally file-backed) implementation of every store is provided in the [`cache`] module.
//!
//! On top of these stores:
//! * a [`TaskBoard`](board::TaskBoard) validates and applies commands, and keeps a filtered, searched and sorted view of the active tasks (see [`pipeline`]),
//! * a [`TrashBin`](trash::TrashBin) moves tasks to the trash and back, without ever losing or duplicating them,
//! * a [`HolidayCalendar`](calendar::HolidayCalendar) generates the public holidays of a year and builds month grids that show them.

pub mod traits;

mod task;
pub use task::{DueStatus, NewTask, Priority, Task, TaskId};
mod trashed_task;
pub use trashed_task::{TrashEntry, TrashId, TrashedTask};
mod holiday;
pub use holiday::{Holiday, HolidayKind};

pub mod cache;
pub use cache::Cache;
pub mod mock_behaviour;

pub mod pipeline;
pub use pipeline::{QueryInputs, QueryPipeline, SortOrder, TaskFilter};
pub mod trash;
pub use trash::TrashBin;
pub mod board;
pub use board::TaskBoard;
pub mod calendar;
pub use calendar::HolidayCalendar;

pub mod config;
pub mod error;
pub use error::{Error, Result};
pub mod utils;
