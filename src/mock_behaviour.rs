//! This module provides ways to tweak a [`Cache`](crate::cache::Cache), so that it can return errors on some tests

use crate::traits::StoreError;

/// This stores some behaviour tweaks, that describe how a mocked store will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    // From the TaskStore trait
    pub insert_task_behaviour: (u32, u32),
    pub update_task_behaviour: (u32, u32),
    pub delete_task_behaviour: (u32, u32),

    // From the TrashStore trait
    pub insert_trashed_behaviour: (u32, u32),
    pub delete_trashed_behaviour: (u32, u32),

    // From the HolidayStore trait
    pub upsert_holidays_behaviour: (u32, u32),
    pub delete_holidays_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All items will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            insert_task_behaviour: (0, n_fails),
            update_task_behaviour: (0, n_fails),
            delete_task_behaviour: (0, n_fails),
            insert_trashed_behaviour: (0, n_fails),
            delete_trashed_behaviour: (0, n_fails),
            upsert_holidays_behaviour: (0, n_fails),
            delete_holidays_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_insert_task(&mut self) -> Result<(), StoreError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.insert_task_behaviour, "insert_task")
    }
    pub fn can_update_task(&mut self) -> Result<(), StoreError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.update_task_behaviour, "update_task")
    }
    pub fn can_delete_task(&mut self) -> Result<(), StoreError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.delete_task_behaviour, "delete_task")
    }
    pub fn can_insert_trashed(&mut self) -> Result<(), StoreError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.insert_trashed_behaviour, "insert_trashed")
    }
    pub fn can_delete_trashed(&mut self) -> Result<(), StoreError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.delete_trashed_behaviour, "delete_trashed")
    }
    pub fn can_upsert_holidays(&mut self) -> Result<(), StoreError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.upsert_holidays_behaviour, "upsert_holidays")
    }
    pub fn can_delete_holidays(&mut self) -> Result<(), StoreError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.delete_holidays_behaviour, "delete_holidays")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), StoreError> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 -= 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else if remaining_failures > 0 {
        value.1 -= 1;
        log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
        Err(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value).into())
    } else {
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    }
}
