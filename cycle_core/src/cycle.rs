//! Cycle projection: where a profile puts the user on a given day.
//!
//! The model is a fixed-length cycle:
//! - Ovulation is estimated at the midpoint, `cycle_length / 2`
//! - The fertile window runs from five days before to one day after it
//! - Menstruation outranks every other phase, even an overlapping window

use crate::types::{FERTILE_DAYS_AFTER_OVULATION, FERTILE_DAYS_BEFORE_OVULATION};
use crate::{
    days_between, CalendarDate, CyclePhase, CycleProfile, CycleState, Error, FertileWindow, Result,
};

/// Project a cycle profile onto `today`
///
/// Fails with [`Error::InvalidProfile`] if the profile breaks its invariants or
/// if its last period start lies after `today`.
pub fn project_cycle(profile: &CycleProfile, today: CalendarDate) -> Result<CycleState> {
    profile.validate()?;

    let elapsed = days_between(profile.last_period_start, today);
    if elapsed < 0 {
        return Err(Error::InvalidProfile(format!(
            "last period start {} is after {}",
            profile.last_period_start, today
        )));
    }

    let cycle_length = profile.cycle_length_days;
    let offset = elapsed.rem_euclid(i64::from(cycle_length));
    // offset < cycle_length <= MAX_CYCLE_LENGTH_DAYS, so it always fits
    let cycle_day = offset as u32 + 1;

    let ovulation_day = ovulation_day(cycle_length);
    let fertile_window = fertile_window(cycle_length);
    let phase = classify_phase(
        cycle_day,
        profile.period_duration_days,
        ovulation_day,
        &fertile_window,
    );

    let days_until_next_period = if cycle_day > profile.period_duration_days {
        cycle_length - cycle_day + 1
    } else {
        0
    };

    let days_until_ovulation = if cycle_day <= ovulation_day {
        ovulation_day - cycle_day
    } else {
        cycle_length - cycle_day + ovulation_day
    };

    let current_cycle_start = today.add_days(-offset)?;
    let next_period_start = current_cycle_start.add_days(i64::from(cycle_length))?;

    tracing::debug!(
        "Projected cycle day {} ({}) for {}, next period {}",
        cycle_day,
        phase,
        today,
        next_period_start
    );

    Ok(CycleState {
        cycle_day,
        cycle_length_days: cycle_length,
        phase,
        fertile_window,
        ovulation_day,
        days_until_ovulation,
        days_until_next_period,
        current_cycle_start,
        next_period_start,
    })
}

/// Estimated ovulation cycle day for a given cycle length
pub fn ovulation_day(cycle_length_days: u32) -> u32 {
    cycle_length_days / 2
}

/// Fertile window around the ovulation estimate, clamped to the cycle
pub fn fertile_window(cycle_length_days: u32) -> FertileWindow {
    let ovulation = ovulation_day(cycle_length_days);
    FertileWindow {
        start_day: ovulation.saturating_sub(FERTILE_DAYS_BEFORE_OVULATION).max(1),
        end_day: (ovulation + FERTILE_DAYS_AFTER_OVULATION).min(cycle_length_days),
    }
}

fn classify_phase(
    cycle_day: u32,
    period_duration_days: u32,
    ovulation_day: u32,
    fertile_window: &FertileWindow,
) -> CyclePhase {
    if cycle_day <= period_duration_days {
        CyclePhase::Menstruation
    } else if fertile_window.contains(cycle_day) {
        CyclePhase::Ovulation
    } else if cycle_day < ovulation_day {
        CyclePhase::Follicular
    } else {
        CyclePhase::Luteal
    }
}
