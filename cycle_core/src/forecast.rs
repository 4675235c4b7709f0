//! Forward-looking views built on the projectors.
//!
//! Chart and calendar surfaces read these directly instead of doing their own
//! date math, so every value here goes back through [`project_cycle`] or the
//! pregnancy anchor's derived dates.

use crate::types::{GESTATION_DAYS, SECOND_TRIMESTER_WEEK, THIRD_TRIMESTER_WEEK};
use crate::{project_cycle, CalendarDate, CyclePhase, CycleProfile, PregnancySetup, Result};
use serde::{Deserialize, Serialize};

/// A predicted period
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodForecast {
    pub start: CalendarDate,
    /// Last bleeding day; equals `start` when the duration is zero
    pub end: CalendarDate,
    pub duration_days: u32,
}

/// One day of a phase calendar
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: CalendarDate,
    pub cycle_day: u32,
    pub phase: CyclePhase,
}

/// Pregnancy landmark dates
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    SecondTrimester,
    ThirdTrimester,
    DueDate,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Milestone {
    pub kind: MilestoneKind,
    pub date: CalendarDate,
    /// Gestational week that begins on `date`
    pub week: u32,
}

/// The next `count` period starts after the current cycle began
pub fn upcoming_periods(
    profile: &CycleProfile,
    today: CalendarDate,
    count: usize,
) -> Result<Vec<PeriodForecast>> {
    let state = project_cycle(profile, today)?;
    let cycle_length = i64::from(profile.cycle_length_days);
    let duration = profile.period_duration_days;

    let mut forecasts = Vec::with_capacity(count);
    let mut start = state.next_period_start;
    for _ in 0..count {
        let end = start.add_days(i64::from(duration.saturating_sub(1)))?;
        forecasts.push(PeriodForecast {
            start,
            end,
            duration_days: duration,
        });
        start = start.add_days(cycle_length)?;
    }

    Ok(forecasts)
}

/// Phase for each of `days` consecutive days starting at `from`
pub fn phase_calendar(
    profile: &CycleProfile,
    from: CalendarDate,
    days: u32,
) -> Result<Vec<CalendarDay>> {
    (0..days)
        .map(|offset| {
            let date = from.add_days(i64::from(offset))?;
            let state = project_cycle(profile, date)?;
            Ok(CalendarDay {
                date,
                cycle_day: state.cycle_day,
                phase: state.phase,
            })
        })
        .collect()
}

/// Trimester starts and due date for a pregnancy
pub fn pregnancy_milestones(setup: &PregnancySetup) -> Result<Vec<Milestone>> {
    let lmp = setup.lmp_date()?;
    let week_start = |week: u32| lmp.add_days(i64::from(week) * 7);

    Ok(vec![
        Milestone {
            kind: MilestoneKind::SecondTrimester,
            date: week_start(SECOND_TRIMESTER_WEEK)?,
            week: SECOND_TRIMESTER_WEEK,
        },
        Milestone {
            kind: MilestoneKind::ThirdTrimester,
            date: week_start(THIRD_TRIMESTER_WEEK)?,
            week: THIRD_TRIMESTER_WEEK,
        },
        Milestone {
            kind: MilestoneKind::DueDate,
            date: setup.due_date()?,
            week: (GESTATION_DAYS / 7) as u32,
        },
    ])
}
