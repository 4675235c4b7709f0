#![forbid(unsafe_code)]

//! Cycle and gestational projection engine.
//!
//! This crate provides:
//! - Calendar arithmetic on whole local days
//! - Cycle projection (cycle day, phase, fertile window, next period)
//! - Gestational projection (weeks and days, trimester, due date)
//! - Forecast views for charts and calendars
//! - Ambient support: configuration, logging, profile persistence
//!
//! The projectors are pure functions. "Today" is always passed in by the
//! caller, usually from a [`Clock`].

pub mod error;
pub mod calendar;
pub mod types;
pub mod cycle;
pub mod gestation;
pub mod forecast;
pub mod clock;
pub mod config;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use error::{Error, Result};
pub use calendar::{days_between, CalendarDate};
pub use types::*;
pub use cycle::project_cycle;
pub use gestation::project_gestation;
pub use forecast::{
    phase_calendar, pregnancy_milestones, upcoming_periods, CalendarDay, Milestone,
    MilestoneKind, PeriodForecast,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use store::{ProfileStore, PROFILE_FILE};
