//! Sources of "today".
//!
//! Projectors never read the clock; callers pass a date obtained from one of
//! these so tests and the CLI's `--today` flag can pin it.

use crate::CalendarDate;
use chrono::Local;

pub trait Clock {
    fn today(&self) -> CalendarDate;
}

/// The local calendar day of the host
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDate {
        CalendarDate::from_datetime(&Local::now())
    }
}

/// A clock pinned to one day
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub CalendarDate);

impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        self.0
    }
}
