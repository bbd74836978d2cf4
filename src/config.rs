//! Support for library configuration options

use std::sync::{Arc, Mutex, PoisonError};
use once_cell::sync::Lazy;

/// The category new tasks are filed under, unless told otherwise.
/// Feel free to override it when initing this library.
pub static DEFAULT_CATEGORY: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("General".to_string())));

/// How many days a deleted task is kept in the trash before [`TrashBin::purge_expired`](crate::trash::TrashBin::purge_expired) removes it.
/// Feel free to override it when initing this library.
pub static TRASH_RETENTION_DAYS: Lazy<Arc<Mutex<i64>>> = Lazy::new(|| Arc::new(Mutex::new(30)));

pub(crate) fn default_category() -> String {
    DEFAULT_CATEGORY.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

pub(crate) fn trash_retention_days() -> i64 {
    *TRASH_RETENTION_DAYS.lock().unwrap_or_else(PoisonError::into_inner)
}
