//! The set of public holidays of a year

use chrono::{Duration, NaiveDate};

use crate::error::{Error, Result};
use crate::holiday::{Holiday, HolidayKind};

/// Holidays that fall on the same month and day every year: (month, day, name, kind)
const FIXED_HOLIDAYS: [(u32, u32, &str, HolidayKind); 10] = [
    ( 1,  1, "New Year's Day",           HolidayKind::National),
    ( 5,  1, "Labour Day",               HolidayKind::National),
    ( 5, 21, "Navy Day",                 HolidayKind::National),
    ( 9, 18, "Independence Day",         HolidayKind::National),
    ( 9, 19, "Army Day",                 HolidayKind::National),
    ( 7, 16, "Our Lady of Mount Carmel", HolidayKind::Religious),
    ( 8, 15, "Assumption of Mary",       HolidayKind::Religious),
    (11,  1, "All Saints' Day",          HolidayKind::Religious),
    (12,  8, "Immaculate Conception",    HolidayKind::Religious),
    (12, 25, "Christmas Day",            HolidayKind::Religious),
];

/// Compute the date of Easter Sunday (anonymous Gregorian algorithm).
///
/// Returns `None` if the year is out of the range `chrono` can represent.
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b.div_euclid(4);
    let e = b.rem_euclid(4);
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c.div_euclid(4);
    let k = c.rem_euclid(4);
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l).div_euclid(451);
    let month = (h + l - 7 * m + 114).div_euclid(31);
    let day = (h + l - 7 * m + 114).rem_euclid(31) + 1;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Returns every holiday of `year`, in chronological order.
///
/// Running this twice for the same year gives the same dates, so that upserting the result is idempotent.
pub fn holidays_for_year(year: i32) -> Result<Vec<Holiday>> {
    let mut holidays = Vec::with_capacity(FIXED_HOLIDAYS.len() + 2);

    for (month, day, name, kind) in FIXED_HOLIDAYS.iter() {
        let date = NaiveDate::from_ymd_opt(year, *month, *day).ok_or(Error::YearOutOfRange(year))?;
        holidays.push(Holiday::new(date, name, *kind, true));
    }

    let easter = easter_sunday(year).ok_or(Error::YearOutOfRange(year))?;
    let good_friday = easter.checked_sub_signed(Duration::days(2)).ok_or(Error::YearOutOfRange(year))?;
    let easter_monday = easter.checked_add_signed(Duration::days(1)).ok_or(Error::YearOutOfRange(year))?;
    // Their month and day change every year
    holidays.push(Holiday::new(good_friday, "Good Friday", HolidayKind::Religious, false).for_year(year));
    holidays.push(Holiday::new(easter_monday, "Easter Monday", HolidayKind::Religious, false).for_year(year));

    holidays.sort_by(|a, b| a.date().cmp(b.date()));
    Ok(holidays)
}


#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Datelike, Weekday};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_easter_golden_values() {
        assert_eq!(easter_sunday(2023), Some(ymd(2023, 4, 9)));
        assert_eq!(easter_sunday(2024), Some(ymd(2024, 3, 31)));
        assert_eq!(easter_sunday(2025), Some(ymd(2025, 4, 20)));
        assert_eq!(easter_sunday(2000), Some(ymd(2000, 4, 23)));
        assert_eq!(easter_sunday(2038), Some(ymd(2038, 4, 25)));
        assert_eq!(easter_sunday(2285), Some(ymd(2285, 3, 22)));
    }

    #[test]
    fn test_easter_is_always_a_sunday() {
        for year in 1900..2200 {
            let easter = easter_sunday(year).unwrap();
            assert_eq!(easter.weekday(), Weekday::Sun, "Easter {} is not a Sunday", year);
        }
    }

    #[test]
    fn test_holidays_of_a_year() {
        let holidays = holidays_for_year(2024).unwrap();
        assert_eq!(holidays.len(), 12);
        assert!(holidays.windows(2).all(|w| w[0].date() < w[1].date()));
        assert!(holidays.iter().all(|h| h.year() == 2024));

        let good_friday = holidays.iter().find(|h| h.name() == "Good Friday").unwrap();
        assert_eq!(good_friday.date(), &ymd(2024, 3, 29));
        assert_eq!(good_friday.kind(), HolidayKind::Religious);
        let easter_monday = holidays.iter().find(|h| h.name() == "Easter Monday").unwrap();
        assert_eq!(easter_monday.date(), &ymd(2024, 4, 1));
        assert_eq!(easter_monday.id(), "2024-04-01");

        let national: Vec<_> = holidays.iter()
            .filter(|h| h.kind() == HolidayKind::National)
            .map(|h| h.id())
            .collect();
        assert_eq!(national, vec!["2024-01-01", "2024-05-01", "2024-05-21", "2024-09-18", "2024-09-19"]);
    }

    #[test]
    fn test_out_of_range_year() {
        assert!(holidays_for_year(i32::MAX).is_err());
    }
}
