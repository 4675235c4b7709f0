//! Core domain types for the projection engine.
//!
//! This module defines:
//! - Input profiles (menstrual cycle baseline, pregnancy anchor)
//! - Projection outputs (cycle state, gestational age)
//! - The fixed constants of the cycle and pregnancy model

use crate::{CalendarDate, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Model Constants
// ============================================================================

/// Shortest accepted average cycle length
pub const MIN_CYCLE_LENGTH_DAYS: u32 = 10;

/// Longest accepted average cycle length
pub const MAX_CYCLE_LENGTH_DAYS: u32 = 60;

/// Days from LMP to the expected due date
pub const GESTATION_DAYS: i64 = 280;

/// Longest plausible gestation, measured from LMP
pub const MAX_GESTATION_DAYS: i64 = 300;

/// First gestational week of the second trimester
pub const SECOND_TRIMESTER_WEEK: u32 = 14;

/// First gestational week of the third trimester
pub const THIRD_TRIMESTER_WEEK: u32 = 28;

/// Days before the ovulation estimate that open the fertile window
pub const FERTILE_DAYS_BEFORE_OVULATION: u32 = 5;

/// Days after the ovulation estimate that close the fertile window
pub const FERTILE_DAYS_AFTER_OVULATION: u32 = 1;

// ============================================================================
// Cycle Types
// ============================================================================

/// A user's menstrual cycle baseline
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CycleProfile {
    pub last_period_start: CalendarDate,
    pub cycle_length_days: u32,
    pub period_duration_days: u32,
}

impl CycleProfile {
    /// Build a profile, rejecting impossible combinations up front
    pub fn new(
        last_period_start: CalendarDate,
        cycle_length_days: u32,
        period_duration_days: u32,
    ) -> Result<Self> {
        let profile = Self {
            last_period_start,
            cycle_length_days,
            period_duration_days,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check the length and duration invariants.
    ///
    /// Profiles can arrive through deserialization, so the projector calls this
    /// again rather than trusting the constructor.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_CYCLE_LENGTH_DAYS..=MAX_CYCLE_LENGTH_DAYS).contains(&self.cycle_length_days) {
            return Err(Error::InvalidProfile(format!(
                "cycle length {} days is outside {}..={}",
                self.cycle_length_days, MIN_CYCLE_LENGTH_DAYS, MAX_CYCLE_LENGTH_DAYS
            )));
        }

        if self.period_duration_days > self.cycle_length_days {
            return Err(Error::InvalidProfile(format!(
                "period duration {} days exceeds cycle length {} days",
                self.period_duration_days, self.cycle_length_days
            )));
        }

        Ok(())
    }
}

/// Phase of the menstrual cycle
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    Menstruation,
    Follicular,
    Ovulation,
    Luteal,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CyclePhase::Menstruation => "menstruation",
            CyclePhase::Follicular => "follicular",
            CyclePhase::Ovulation => "ovulation",
            CyclePhase::Luteal => "luteal",
        };
        f.write_str(name)
    }
}

/// Inclusive range of cycle days considered fertile
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FertileWindow {
    pub start_day: u32,
    pub end_day: u32,
}

impl FertileWindow {
    pub fn contains(&self, cycle_day: u32) -> bool {
        (self.start_day..=self.end_day).contains(&cycle_day)
    }
}

/// Projected position within the current cycle
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CycleState {
    /// 1-based day within the current cycle
    pub cycle_day: u32,
    pub cycle_length_days: u32,
    pub phase: CyclePhase,
    pub fertile_window: FertileWindow,
    pub ovulation_day: u32,
    /// Zero on the ovulation day itself; counts into the next cycle once passed
    pub days_until_ovulation: u32,
    /// Zero while menstruating
    pub days_until_next_period: u32,
    pub current_cycle_start: CalendarDate,
    pub next_period_start: CalendarDate,
}

// ============================================================================
// Pregnancy Types
// ============================================================================

/// Which date the user entered to anchor a pregnancy
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PregnancyMode {
    DueDate,
    Lmp,
}

/// Pregnancy anchor: one stored date, the other always derived
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PregnancySetup {
    pub mode: PregnancyMode,
    pub reference_date: CalendarDate,
}

impl PregnancySetup {
    pub fn from_due_date(due_date: CalendarDate) -> Self {
        Self {
            mode: PregnancyMode::DueDate,
            reference_date: due_date,
        }
    }

    pub fn from_lmp(lmp_date: CalendarDate) -> Self {
        Self {
            mode: PregnancyMode::Lmp,
            reference_date: lmp_date,
        }
    }

    /// Last menstrual period date, whatever the mode
    pub fn lmp_date(&self) -> Result<CalendarDate> {
        match self.mode {
            PregnancyMode::Lmp => Ok(self.reference_date),
            PregnancyMode::DueDate => self.reference_date.add_days(-GESTATION_DAYS),
        }
    }

    /// Expected due date, always derived from the LMP
    pub fn due_date(&self) -> Result<CalendarDate> {
        self.lmp_date()?.add_days(GESTATION_DAYS)
    }

    /// Same pregnancy re-anchored on its LMP
    pub fn to_lmp_mode(&self) -> Result<Self> {
        Ok(Self::from_lmp(self.lmp_date()?))
    }

    /// Same pregnancy re-anchored on its due date
    pub fn to_due_date_mode(&self) -> Result<Self> {
        Ok(Self::from_due_date(self.due_date()?))
    }
}

/// Coarse three-way bucketing of gestational age
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(into = "u8", try_from = "u8")]
pub enum Trimester {
    First,
    Second,
    Third,
}

impl Trimester {
    /// Bucket a completed-weeks count
    pub fn from_weeks(weeks: u32) -> Self {
        if weeks < SECOND_TRIMESTER_WEEK {
            Trimester::First
        } else if weeks < THIRD_TRIMESTER_WEEK {
            Trimester::Second
        } else {
            Trimester::Third
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Trimester::First => 1,
            Trimester::Second => 2,
            Trimester::Third => 3,
        }
    }
}

impl From<Trimester> for u8 {
    fn from(trimester: Trimester) -> Self {
        trimester.number()
    }
}

impl TryFrom<u8> for Trimester {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Trimester::First),
            2 => Ok(Trimester::Second),
            3 => Ok(Trimester::Third),
            other => Err(Error::InvalidProfile(format!("no trimester {}", other))),
        }
    }
}

impl fmt::Display for Trimester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Projected gestational age for a given day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GestationalAge {
    pub weeks: u32,
    /// Remainder days, 0..=6
    pub days: u32,
    pub trimester: Trimester,
    pub due_date: CalendarDate,
    pub lmp_date: CalendarDate,
    /// Elapsed days since LMP
    pub total_days: u32,
    /// Negative once the due date has passed
    pub days_until_due: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_profile_accepts_typical_values() {
        let profile = CycleProfile::new(date("2024-01-01"), 28, 5).unwrap();
        assert_eq!(profile.cycle_length_days, 28);
        assert!(CycleProfile::new(date("2024-01-01"), 10, 0).is_ok());
        assert!(CycleProfile::new(date("2024-01-01"), 60, 60).is_ok());
    }

    #[test]
    fn test_profile_rejects_out_of_range_lengths() {
        for length in [0, 9, 61, u32::MAX] {
            let result = CycleProfile::new(date("2024-01-01"), length, 0);
            assert!(
                matches!(result, Err(Error::InvalidProfile(_))),
                "length {} should be rejected",
                length
            );
        }
    }

    #[test]
    fn test_profile_rejects_period_longer_than_cycle() {
        let result = CycleProfile::new(date("2024-01-01"), 28, 29);
        assert!(matches!(result, Err(Error::InvalidProfile(_))));
    }

    #[test]
    fn test_fertile_window_is_inclusive() {
        let window = FertileWindow {
            start_day: 9,
            end_day: 15,
        };
        assert!(window.contains(9));
        assert!(window.contains(15));
        assert!(!window.contains(8));
        assert!(!window.contains(16));
    }

    #[test]
    fn test_due_date_mode_derives_lmp() {
        let setup = PregnancySetup::from_due_date(date("2024-10-07"));
        assert_eq!(setup.lmp_date().unwrap(), date("2024-01-01"));
        assert_eq!(setup.due_date().unwrap(), date("2024-10-07"));
    }

    #[test]
    fn test_mode_conversion_round_trip() {
        let original = PregnancySetup::from_due_date(date("2025-06-30"));
        let back = original.to_lmp_mode().unwrap().to_due_date_mode().unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_trimester_thresholds() {
        assert_eq!(Trimester::from_weeks(0), Trimester::First);
        assert_eq!(Trimester::from_weeks(13), Trimester::First);
        assert_eq!(Trimester::from_weeks(14), Trimester::Second);
        assert_eq!(Trimester::from_weeks(27), Trimester::Second);
        assert_eq!(Trimester::from_weeks(28), Trimester::Third);
        assert_eq!(Trimester::from_weeks(42), Trimester::Third);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&PregnancySetup::from_due_date(date("2024-10-08"))).unwrap();
        assert_eq!(json, r#"{"mode":"due_date","reference_date":"2024-10-08"}"#);

        assert_eq!(serde_json::to_string(&CyclePhase::Luteal).unwrap(), "\"luteal\"");
        assert_eq!(serde_json::to_string(&Trimester::Second).unwrap(), "2");
        assert!(serde_json::from_str::<Trimester>("4").is_err());
    }
}
