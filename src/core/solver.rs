use super::engine::PASSIVE_RATE;

/// Capital whose monthly passive yield equals `income_goal`.
pub fn target_capital(income_goal: f64) -> f64 {
    income_goal / PASSIVE_RATE
}

/// Monthly end-of-period contribution that grows `present_value` into
/// `target_fv` after `months` periods at `monthly_rate`.
///
/// Returns `None` when there is no horizon or the annuity factor
/// `(1+i)^n - 1` is not positive. A present value that already reaches the
/// target needs no contribution, so negative solutions clamp to zero.
pub fn required_contribution(
    target_fv: f64,
    present_value: f64,
    monthly_rate: f64,
    months: u32,
) -> Option<f64> {
    if months == 0 {
        return None;
    }
    let growth = (1.0 + monthly_rate).powf(f64::from(months));
    let denom = growth - 1.0;
    if denom <= 0.0 || !denom.is_finite() {
        return None;
    }
    let pmt = (target_fv - present_value * growth) * monthly_rate / denom;
    if pmt.is_nan() {
        return None;
    }
    Some(pmt.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::{future_value, monthly_rate};
    use proptest::prelude::{prop_assert, proptest};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn target_capital_divides_goal_by_passive_rate() {
        assert_close(target_capital(5_000.0), 833_333.333_333, 1e-3);
        assert_close(target_capital(0.0), 0.0, 0.0);
    }

    #[test]
    fn required_contribution_is_unavailable_without_horizon() {
        assert_eq!(required_contribution(1_000.0, 0.0, monthly_rate(), 0), None);
    }

    #[test]
    fn required_contribution_is_unavailable_at_zero_rate() {
        assert_eq!(required_contribution(1_000.0, 0.0, 0.0, 12), None);
    }

    #[test]
    fn required_contribution_is_unavailable_for_shrinking_growth() {
        assert_eq!(required_contribution(1_000.0, 0.0, -0.01, 12), None);
    }

    #[test]
    fn required_contribution_clamps_when_present_value_suffices() {
        let target = target_capital(5_000.0);
        let pmt = required_contribution(target, 100_000.0, monthly_rate(), 360)
            .expect("horizon is valid");
        assert_eq!(pmt, 0.0);
    }

    #[test]
    fn required_contribution_from_nothing_matches_annuity_factor() {
        let i = monthly_rate();
        let target = 1_000_000.0;
        let pmt = required_contribution(target, 0.0, i, 120).expect("horizon is valid");
        let factor = ((1.0 + i).powf(120.0) - 1.0) / i;
        assert_close(pmt, target / factor, 1e-6);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_required_contribution_round_trips_through_future_value(
            months in 1u32..721,
            funded_bp in 0u32..10_000,
            target in 1u32..10_000_000,
            rate_bp in 1u32..300
        ) {
            let i = rate_bp as f64 / 10_000.0;
            let target = target as f64;
            // Present value that grows into a fraction of the target on its own.
            let pv = target * (funded_bp as f64 / 10_000.0) / (1.0 + i).powf(f64::from(months));

            let pmt = required_contribution(target, pv, i, months)
                .expect("positive horizon and rate must solve");
            prop_assert!(pmt >= 0.0);
            let fv = future_value(pv, pmt, i, months);
            prop_assert!(
                (fv - target).abs() <= target * 1e-9,
                "fv {} target {}", fv, target
            );
        }

        #[test]
        fn prop_required_contribution_never_negative(
            months in 1u32..721,
            present_value in 0u32..5_000_000,
            target in 0u32..1_000_000
        ) {
            let pmt = required_contribution(
                target as f64,
                present_value as f64,
                monthly_rate(),
                months,
            );
            prop_assert!(pmt.is_some_and(|v| v >= 0.0));
        }
    }
}
