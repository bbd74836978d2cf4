//! Calendar computations: holidays and month grids
//!
//! [`holidays`] and [`grid`] are pure computations. [`HolidayCalendar`] stores generated holidays into a
//! [`HolidayStore`] and builds month views out of them.

pub mod grid;
pub mod holidays;

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::holiday::Holiday;
use crate::traits::HolidayStore;

pub use grid::{CalendarDay, DayFlags, MonthGrid, GRID_SIZE};


/// Persists holidays, and builds month views that show them
pub struct HolidayCalendar<S> {
    store: Arc<S>,
}

impl<S> Clone for HolidayCalendar<S> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone() }
    }
}

impl<S> HolidayCalendar<S>
where
    S: HolidayStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Generate the holidays of `year` and save them.
    ///
    /// This can safely be called several times: holidays that are already known are replaced, not duplicated.
    pub async fn initialize_year(&self, year: i32) -> Result<Vec<Holiday>> {
        let holidays = holidays::holidays_for_year(year)?;
        self.store.upsert_holidays(holidays.clone()).await
            .map_err(Error::store("save holidays"))?;
        log::info!("{} holidays saved for year {}", holidays.len(), year);
        Ok(holidays)
    }

    pub async fn holidays_for_year(&self, year: i32) -> Result<Vec<Holiday>> {
        self.store.get_holidays_by_year(year).await
            .map_err(Error::store("read holidays"))
    }

    /// `month` is 1-12
    pub async fn holidays_for_month(&self, year: i32, month: u32) -> Result<Vec<Holiday>> {
        self.store.get_holidays_by_month(year, month).await
            .map_err(Error::store("read holidays"))
    }

    pub async fn holiday_on(&self, date: &NaiveDate) -> Result<Option<Holiday>> {
        self.store.get_holiday_by_date(date).await
            .map_err(Error::store("read holidays"))
    }

    /// Both ends are included
    pub async fn holidays_in_range(&self, start: &NaiveDate, end: &NaiveDate) -> Result<Vec<Holiday>> {
        self.store.get_holidays_in_range(start, end).await
            .map_err(Error::store("read holidays"))
    }

    pub async fn clear_year(&self, year: i32) -> Result<()> {
        self.store.delete_holidays_by_year(year).await
            .map_err(Error::store("delete holidays"))?;
        log::info!("Holidays of year {} deleted", year);
        Ok(())
    }

    pub async fn clear_all(&self) -> Result<()> {
        self.store.delete_all_holidays().await
            .map_err(Error::store("delete holidays"))?;
        log::info!("Every holiday deleted");
        Ok(())
    }

    /// Build the grid of a month, flagging the holidays that are currently stored for it
    pub async fn month_view(&self, year: i32, month: u32, today: NaiveDate) -> Result<MonthGrid> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth { year, month });
        }
        let holidays = self.holidays_for_month(year, month).await?;
        grid::month_grid(year, month, &holidays, today)
    }
}
