use std::sync::LazyLock;

use super::solver::{required_contribution, target_capital};
use super::types::{ProjectionError, ProjectionInput, ProjectionResult};

pub const ANNUAL_RETURN: f64 = 0.15;
/// Monthly share of capital assumed withdrawable forever.
pub const PASSIVE_RATE: f64 = 0.006;

static MONTHLY_RATE: LazyLock<f64> =
    LazyLock::new(|| (1.0 + ANNUAL_RETURN).powf(1.0 / 12.0) - 1.0);

/// Monthly compounding rate equivalent to `ANNUAL_RETURN`.
pub fn monthly_rate() -> f64 {
    *MONTHLY_RATE
}

/// Whole months between the two ages, rounded to nearest. `None` when the
/// count does not fit in a `u32`.
pub fn months_until(age_now: f64, age_retire: f64) -> Option<u32> {
    let years = (age_retire - age_now).max(0.0);
    checked_u32((years * 12.0).round())
}

/// Ages as whole years. Both must be positive, fit in a `u32`, and retirement
/// must come strictly after the current age.
pub fn validate_ages(age_now: f64, age_retire: f64) -> Result<(u32, u32), ProjectionError> {
    let invalid = ProjectionError::InvalidHorizon {
        age_now,
        age_retire,
    };
    if !(age_now > 0.0 && age_retire > age_now) {
        return Err(invalid);
    }
    match (checked_u32(age_now.floor()), checked_u32(age_retire.floor())) {
        (Some(now), Some(retire)) => Ok((now, retire)),
        _ => Err(invalid),
    }
}

/// Validated horizon in months.
pub fn horizon_months(age_now: f64, age_retire: f64) -> Result<u32, ProjectionError> {
    validate_ages(age_now, age_retire)?;
    months_until(age_now, age_retire).ok_or(ProjectionError::InvalidHorizon {
        age_now,
        age_retire,
    })
}

fn checked_u32(value: f64) -> Option<u32> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    // Saturates at u64::MAX, which the narrowing then rejects.
    u32::try_from(value as u64).ok()
}

/// Future value of `present_value` plus an ordinary annuity of
/// `contribution` paid at the end of each of `months` periods.
pub fn future_value(present_value: f64, contribution: f64, monthly_rate: f64, months: u32) -> f64 {
    let growth = (1.0 + monthly_rate).powf(f64::from(months));
    let from_present = present_value * growth;
    let from_contributions = if monthly_rate == 0.0 {
        contribution * f64::from(months)
    } else {
        contribution * ((growth - 1.0) / monthly_rate)
    };
    from_present + from_contributions
}

pub fn run_projection(input: &ProjectionInput) -> Result<ProjectionResult, ProjectionError> {
    let months = horizon_months(f64::from(input.age_now), f64::from(input.age_retire))?;
    let i = monthly_rate();

    let future_value = future_value(input.present_value, input.monthly_contribution, i, months);
    let passive_income = future_value * PASSIVE_RATE;

    let (target_capital, required_contribution, gap) = if input.has_goal() {
        let target = target_capital(input.income_goal);
        (
            Some(target),
            required_contribution(target, input.present_value, i, months),
            Some((input.income_goal - passive_income).max(0.0)),
        )
    } else {
        (None, None, None)
    };

    Ok(ProjectionResult {
        months,
        future_value,
        passive_income,
        target_capital,
        required_contribution,
        gap,
    })
}
