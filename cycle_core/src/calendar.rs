//! Calendar arithmetic on whole local days.
//!
//! Every date in the engine is a [`CalendarDate`]: a day in the user's local
//! calendar with no time-of-day or offset attached. A `CalendarDate` can only
//! be built from a real day, so impossible inputs such as `2023-02-29` are
//! rejected with [`Error::InvalidDate`] at the boundary and the arithmetic
//! below is total.

use crate::{Error, Result};
use chrono::{DateTime, Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ISO format used for parsing and display
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A day in the local calendar
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Build a date from year, month (1-12) and day (1-31)
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| {
                Error::InvalidDate(format!(
                    "{:04}-{:02}-{:02} is not a calendar day",
                    year, month, day
                ))
            })
    }

    /// Normalize a zoned instant to the calendar day it falls on in its own zone.
    ///
    /// Two instants on the same local day always map to the same date, even when
    /// a daylight-saving transition changed the offset in between.
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self(dt.date_naive())
    }

    /// Shift by a signed number of days
    ///
    /// Fails with [`Error::InvalidDate`] if the result leaves chrono's
    /// representable range.
    pub fn add_days(self, days: i64) -> Result<Self> {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };

        shifted.map(Self).ok_or_else(|| {
            Error::InvalidDate(format!("{} shifted by {} days is out of range", self, days))
        })
    }

    /// Underlying chrono date
    pub fn as_naive(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for CalendarDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(Self)
            .map_err(|e| Error::InvalidDate(format!("'{}': {}", s, e)))
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

/// Whole days from `from` to `to`; negative when `to` is earlier
pub fn days_between(from: CalendarDate, to: CalendarDate) -> i64 {
    to.0.signed_duration_since(from.0).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_same_day_is_zero() {
        let d = date("2024-05-17");
        assert_eq!(days_between(d, d), 0);
    }

    #[test]
    fn test_direction_and_sign() {
        let a = date("2024-01-01");
        let b = date("2024-01-31");
        assert_eq!(days_between(a, b), 30);
        assert_eq!(days_between(b, a), -30);
    }

    #[test]
    fn test_leap_year_february() {
        assert_eq!(days_between(date("2024-02-28"), date("2024-03-01")), 2);
        assert_eq!(days_between(date("2023-02-28"), date("2023-03-01")), 1);
        assert_eq!(days_between(date("2024-01-01"), date("2025-01-01")), 366);
    }

    #[test]
    fn test_additivity_across_year_boundary() {
        let a = date("2023-11-15");
        let b = date("2024-02-29");
        let c = date("2024-07-04");
        assert_eq!(days_between(a, c), days_between(a, b) + days_between(b, c));

        // Intermediate point outside [a, c]
        let outside = date("2025-03-01");
        assert_eq!(
            days_between(a, c),
            days_between(a, outside) + days_between(outside, c)
        );
    }

    #[test]
    fn test_offset_change_does_not_perturb_day_count() {
        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        let edt = FixedOffset::west_opt(4 * 3600).unwrap();

        // Just after midnight before the switch, just before midnight after it
        let early = est.with_ymd_and_hms(2024, 3, 9, 0, 10, 0).unwrap();
        let late = edt.with_ymd_and_hms(2024, 3, 10, 23, 50, 0).unwrap();

        let from = CalendarDate::from_datetime(&early);
        let to = CalendarDate::from_datetime(&late);
        assert_eq!(days_between(from, to), 1);
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(matches!(
            CalendarDate::from_ymd(2024, 4, 31),
            Err(Error::InvalidDate(_))
        ));
        assert!(matches!(
            CalendarDate::from_ymd(2023, 2, 29),
            Err(Error::InvalidDate(_))
        ));
        assert!(matches!(
            "2024-13-01".parse::<CalendarDate>(),
            Err(Error::InvalidDate(_))
        ));
        assert!(matches!(
            "not a date".parse::<CalendarDate>(),
            Err(Error::InvalidDate(_))
        ));
        assert!(CalendarDate::from_ymd(2024, 2, 29).is_ok());
    }

    #[test]
    fn test_add_days_both_directions() {
        let d = date("2024-10-07");
        assert_eq!(d.add_days(-280).unwrap(), date("2024-01-01"));
        assert_eq!(date("2024-01-01").add_days(280).unwrap(), d);
        assert_eq!(d.add_days(0).unwrap(), d);
    }

    #[test]
    fn test_add_days_overflow_is_error() {
        let d = date("2024-01-01");
        assert!(matches!(d.add_days(i64::MAX), Err(Error::InvalidDate(_))));
        assert!(matches!(d.add_days(i64::MIN), Err(Error::InvalidDate(_))));
    }

    #[test]
    fn test_display_and_serde_use_iso_format() {
        let d = CalendarDate::from_ymd(2024, 3, 7).unwrap();
        assert_eq!(d.to_string(), "2024-03-07");
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"2024-03-07\"");

        let parsed: CalendarDate = serde_json::from_str("\"2024-03-07\"").unwrap();
        assert_eq!(parsed, d);
        assert!(serde_json::from_str::<CalendarDate>("\"2024-02-30\"").is_err());
    }
}
