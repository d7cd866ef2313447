//! Single-dose insulin decay model.
//!
//! Uses an oref-style gamma-variate curve: the remaining fraction of a dose
//! is `1 - F(t) / F(end)`, where `F` is the gamma CDF with shape `n + 1` and
//! rate `n / peak`, and `end` is the end of the action window.

use crate::gamma::gamma_cdf_integer_k;
use crate::types::round_to;
use crate::{CurveParameters, Result};

/// Remaining active insulin (units) for one dose.
///
/// Parameters are validated before anything else, so a non-positive DIA or
/// peak fails even for a zero dose. With `round_result` the value is rounded
/// to 2 decimals; aggregation passes `false` and rounds the total instead.
pub fn evaluate_dose(
    amount: f64,
    elapsed: f64,
    params: &CurveParameters,
    round_result: bool,
) -> Result<f64> {
    params.validate()?;

    if amount <= 0.0 {
        return Ok(0.0);
    }

    let value = amount * remaining_fraction(elapsed, params);

    Ok(if round_result { round_to(value, 2) } else { value })
}

/// Fraction of a dose still active after `elapsed` minutes, in [0, 1].
///
/// Assumes `params` has already been validated.
fn remaining_fraction(elapsed: f64, params: &CurveParameters) -> f64 {
    let end = params.window_minutes().max(1.0);
    // Doses "in the future" count as just given
    let t = elapsed.max(0.0);

    if t == 0.0 {
        return 1.0;
    }
    if t >= end {
        return 0.0;
    }

    let n = params.effective_shape();
    let k = n + 1;
    let lambda = f64::from(n) / params.peak_minutes;

    let f_t = gamma_cdf_integer_k(k, lambda * t);
    let f_end = gamma_cdf_integer_k(k, lambda * end);
    if f_end <= 0.0 {
        tracing::debug!("Degenerate curve (F(end) = {}), treating dose as decayed", f_end);
        return 0.0;
    }

    (1.0 - f_t / f_end).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn defaults() -> CurveParameters {
        CurveParameters::default()
    }

    fn raw(amount: f64, elapsed: f64) -> f64 {
        evaluate_dose(amount, elapsed, &defaults(), false).unwrap()
    }

    #[test]
    fn test_reference_value_at_30_minutes() {
        let value = raw(1.0, 30.0);
        assert!((value - 0.9661534626175571).abs() < 1e-12, "got {}", value);

        let rounded = evaluate_dose(1.0, 30.0, &defaults(), true).unwrap();
        assert_eq!(rounded, 0.97);
    }

    #[test]
    fn test_reference_values_other_curves() {
        let value = raw(2.0, 120.0);
        assert!((value - 0.5852174467767142).abs() < 1e-12, "got {}", value);

        let short = CurveParameters::new(4.5, 60.0, 3);
        let value = evaluate_dose(1.0, 30.0, &short, false).unwrap();
        assert!((value - 0.9343111044615783).abs() < 1e-12, "got {}", value);
    }

    #[test]
    fn test_invalid_duration_fails() {
        for dia in [0.0, -3.0] {
            let params = CurveParameters::new(dia, 75.0, 3);
            let err = evaluate_dose(1.0, 30.0, &params, true).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter(_)));
        }
    }

    #[test]
    fn test_invalid_peak_fails() {
        for peak in [0.0, -10.0] {
            let params = CurveParameters::new(5.0, peak, 3);
            let err = evaluate_dose(1.0, 30.0, &params, true).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter(_)));
        }
    }

    #[test]
    fn test_invalid_parameters_checked_before_amount() {
        let params = CurveParameters::new(0.0, 75.0, 3);
        assert!(evaluate_dose(0.0, 30.0, &params, true).is_err());
    }

    #[test]
    fn test_non_positive_amount_is_zero() {
        for elapsed in [0.0, 30.0, 299.0, 500.0, -5.0] {
            assert_eq!(raw(0.0, elapsed), 0.0);
            assert_eq!(raw(-1.5, elapsed), 0.0);
        }
    }

    #[test]
    fn test_full_amount_at_time_zero() {
        assert_eq!(raw(1.3, 0.0), 1.3);
        assert_eq!(raw(2.0, -15.0), 2.0);
    }

    #[test]
    fn test_rounded_full_dose_matches_decimal_amount() {
        let params = defaults();
        assert_eq!(evaluate_dose(0.025, 0.0, &params, true).unwrap(), 0.03);
        assert_eq!(evaluate_dose(1.115, 0.0, &params, true).unwrap(), 1.11);
        assert_eq!(evaluate_dose(2.675, 0.0, &params, true).unwrap(), 2.67);
    }

    #[test]
    fn test_zero_at_end_of_window() {
        assert_eq!(raw(1.0, 300.0), 0.0);
        assert_eq!(raw(1.0, 301.5), 0.0);
        assert_eq!(raw(1.0, 10_000.0), 0.0);
    }

    #[test]
    fn test_near_end_of_window_is_small_but_positive() {
        let value = raw(0.8, 290.0);
        assert!((value - 0.0006614739557477379).abs() < 1e-12, "got {}", value);
    }

    #[test]
    fn test_monotone_decay() {
        let mut prev = raw(1.0, 0.5);
        for i in 1..300 {
            let current = raw(1.0, i as f64);
            assert!(current <= prev, "IOB rose at {} min: {} > {}", i, current, prev);
            assert!(current >= 0.0);
            prev = current;
        }
    }

    #[test]
    fn test_shape_below_one_behaves_like_one() {
        let zero = CurveParameters::new(5.0, 75.0, 0);
        let one = CurveParameters::new(5.0, 75.0, 1);
        let a = evaluate_dose(1.0, 60.0, &zero, false).unwrap();
        let b = evaluate_dose(1.0, 60.0, &one, false).unwrap();
        assert_eq!(a, b);
        assert!((a - 0.7895164301214643).abs() < 1e-12, "got {}", a);
    }

    #[test]
    fn test_tiny_window_is_floored_to_one_minute() {
        // 0.001 h is 0.06 min, but the curve uses a 1 minute window
        let params = CurveParameters::new(0.001, 75.0, 3);
        let value = evaluate_dose(1.0, 0.5, &params, false).unwrap();
        assert!(value > 0.0 && value < 1.0);
        assert_eq!(evaluate_dose(1.0, 1.0, &params, false).unwrap(), 0.0);
    }

    #[test]
    fn test_round_result_flag() {
        let amount = 1.804925322024908;
        let elapsed = 83.1664139320608;
        let raw_value = evaluate_dose(amount, elapsed, &defaults(), false).unwrap();
        let rounded = evaluate_dose(amount, elapsed, &defaults(), true).unwrap();

        assert!((raw_value - rounded).abs() > 1e-6);
        assert_eq!(round_to(raw_value, 2), rounded);
    }
}
