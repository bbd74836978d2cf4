//! Public holidays

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use chrono::{Datelike, NaiveDate};


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HolidayKind {
    National,
    Religious,
    Regional,
}

impl Display for HolidayKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HolidayKind::National => write!(f, "National"),
            HolidayKind::Religious => write!(f, "Religious"),
            HolidayKind::Regional => write!(f, "Regional"),
        }
    }
}


/// A public holiday.
///
/// A holiday is identified by its date: there is at most one holiday per day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    date: NaiveDate,
    name: String,
    kind: HolidayKind,
    /// Whether this holiday falls on the same month and day every year
    recurring: bool,
    /// The year this holiday has been generated for
    year: i32,
}

impl Holiday {
    pub fn new<S: ToString>(date: NaiveDate, name: S, kind: HolidayKind, recurring: bool) -> Self {
        Self {
            date,
            name: name.to_string(),
            kind,
            recurring,
            year: date.year(),
        }
    }

    /// Override the year this holiday is attached to (it defaults to the year of its date)
    pub fn for_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// The identity of this holiday, i.e. its ISO date (`YYYY-MM-DD`)
    pub fn id(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn date(&self) -> &NaiveDate    { &self.date    }
    pub fn name(&self) -> &str          { &self.name    }
    pub fn kind(&self) -> HolidayKind   { self.kind     }
    pub fn is_recurring(&self) -> bool  { self.recurring }
    pub fn year(&self) -> i32           { self.year     }
}
