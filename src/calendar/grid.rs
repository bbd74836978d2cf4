//! Month grids: the days to display for a month, as a fixed 6-week, Sunday-first grid

use std::collections::HashMap;

use bitflags::bitflags;
use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{Error, Result};
use crate::holiday::Holiday;

/// How many days a month grid contains (6 weeks of 7 days)
pub const GRID_SIZE: usize = 42;

bitflags! {
    pub struct DayFlags: u8 {
        /// The day belongs to the month the grid is displayed for (it is not padding)
        const IN_DISPLAYED_MONTH = 1;
        const TODAY = 2;
        const HOLIDAY = 4;
    }
}


/// A cell of a month grid
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarDay {
    date: NaiveDate,
    flags: DayFlags,
    holiday: Option<Holiday>,
}

impl CalendarDay {
    /// The day of the month (1-31)
    pub fn day(&self) -> u32                    { self.date.day()   }
    pub fn date(&self) -> &NaiveDate            { &self.date        }
    pub fn flags(&self) -> DayFlags             { self.flags        }
    pub fn holiday(&self) -> Option<&Holiday>   { self.holiday.as_ref() }

    pub fn is_in_displayed_month(&self) -> bool {
        self.flags.contains(DayFlags::IN_DISPLAYED_MONTH)
    }
    pub fn is_today(&self) -> bool {
        self.flags.contains(DayFlags::TODAY)
    }
    pub fn is_holiday(&self) -> bool {
        self.flags.contains(DayFlags::HOLIDAY)
    }
}


/// The 42 days to display for a month
#[derive(Clone, Debug, PartialEq)]
pub struct MonthGrid {
    year: i32,
    month: u32,
    days: Vec<CalendarDay>,
}

impl MonthGrid {
    pub fn year(&self) -> i32 { self.year }
    /// 1-12
    pub fn month(&self) -> u32 { self.month }

    /// Every day of the grid, Sunday-first week after week
    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    /// The six rows of the grid
    pub fn weeks(&self) -> std::slice::Chunks<'_, CalendarDay> {
        self.days.chunks(7)
    }
}


/// Returns how many days `month` (1-12) has in `year`
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(first_of_next.signed_duration_since(first).num_days() as u32)
}

/// Build the grid of `month` (1-12) of `year`.
///
/// The grid starts with the last days of the previous month (so that the first row starts on a Sunday),
/// then every day of the month, then the first days of the next month until the grid is full. \
/// Only days of the displayed month are checked against `today` and against `holidays` (by exact date).
pub fn month_grid(year: i32, month: u32, holidays: &[Holiday], today: NaiveDate) -> Result<MonthGrid> {
    let invalid = || Error::InvalidMonth { year, month };

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let month_length = days_in_month(year, month).ok_or_else(invalid)?;
    let holidays_by_date: HashMap<&NaiveDate, &Holiday> = holidays.iter()
        .map(|h| (h.date(), h))
        .collect();

    let mut days = Vec::with_capacity(GRID_SIZE);

    // Trailing days of the previous month
    let n_leading = first.weekday().num_days_from_sunday() as i64;
    for offset in (1..=n_leading).rev() {
        let date = first.checked_sub_signed(Duration::days(offset)).ok_or_else(invalid)?;
        days.push(CalendarDay { date, flags: DayFlags::empty(), holiday: None });
    }

    for day in 1..=month_length {
        let date = first.with_day(day).ok_or_else(invalid)?;
        let mut flags = DayFlags::IN_DISPLAYED_MONTH;
        if date == today {
            flags |= DayFlags::TODAY;
        }
        let holiday = holidays_by_date.get(&date).map(|h| (*h).clone());
        if holiday.is_some() {
            flags |= DayFlags::HOLIDAY;
        }
        days.push(CalendarDay { date, flags, holiday });
    }

    // Leading days of the next month
    let last = first.with_day(month_length).ok_or_else(invalid)?;
    let n_trailing = (GRID_SIZE - days.len()) as i64;
    for offset in 1..=n_trailing {
        let date = last.checked_add_signed(Duration::days(offset)).ok_or_else(invalid)?;
        days.push(CalendarDay { date, flags: DayFlags::empty(), holiday: None });
    }

    Ok(MonthGrid { year, month, days })
}
