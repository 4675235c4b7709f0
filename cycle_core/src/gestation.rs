//! Gestational age projection.
//!
//! Both anchoring modes are reduced to an LMP date first; the due date is then
//! always `lmp + 280 days`, so the two modes cannot drift apart.

use crate::types::MAX_GESTATION_DAYS;
use crate::{
    days_between, CalendarDate, Error, GestationalAge, PregnancySetup, Result, Trimester,
};

/// Project a pregnancy setup onto `today`
///
/// Fails with [`Error::InvalidProfile`] when `today` precedes the LMP or lies
/// more than 300 days after it.
pub fn project_gestation(setup: &PregnancySetup, today: CalendarDate) -> Result<GestationalAge> {
    let lmp_date = setup.lmp_date()?;
    let due_date = setup.due_date()?;

    let total_days = days_between(lmp_date, today);
    if total_days < 0 {
        return Err(Error::InvalidProfile(format!(
            "{} is before the last menstrual period {}",
            today, lmp_date
        )));
    }
    if total_days > MAX_GESTATION_DAYS {
        return Err(Error::InvalidProfile(format!(
            "{} days since the last menstrual period {} is not a plausible gestation",
            total_days, lmp_date
        )));
    }

    // 0..=MAX_GESTATION_DAYS
    let total_days = total_days as u32;
    let weeks = total_days / 7;
    let days = total_days % 7;
    let trimester = Trimester::from_weeks(weeks);

    tracing::debug!(
        "Projected gestational age {}w{}d (trimester {}) for {}",
        weeks,
        days,
        trimester,
        today
    );

    Ok(GestationalAge {
        weeks,
        days,
        trimester,
        due_date,
        lmp_date,
        total_days,
        days_until_due: days_between(today, due_date),
    })
}
