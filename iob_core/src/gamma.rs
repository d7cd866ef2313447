//! Regularized lower incomplete gamma function for integer shape.
//!
//! For integer `k >= 1` the function has the closed form
//!
//! ```text
//! P(k, x) = 1 - e^(-x) * sum_{m=0}^{k-1} x^m / m!
//! ```
//!
//! which is exact and identical across platforms, so no general
//! special-function machinery is needed.

/// Gamma CDF P(k, x) for integer `k >= 1`.
///
/// Returns exactly 0.0 for `x <= 0`.
pub fn gamma_cdf_integer_k(k: u32, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }

    let mut sum = 1.0;
    let mut term = 1.0;
    for m in 1..k {
        term *= x / f64::from(m);
        sum += term;
    }

    1.0 - (-x).exp() * sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_argument_is_zero() {
        assert_eq!(gamma_cdf_integer_k(4, 0.0), 0.0);
        assert_eq!(gamma_cdf_integer_k(4, -2.5), 0.0);
        assert_eq!(gamma_cdf_integer_k(1, -0.0), 0.0);
    }

    #[test]
    fn test_k_one_is_exponential_cdf() {
        let x = 1.5_f64;
        let expected = 1.0 - (-x).exp();
        assert!((gamma_cdf_integer_k(1, x) - expected).abs() < 1e-15);
        assert!((gamma_cdf_integer_k(1, 1.0) - 0.6321205588285577).abs() < 1e-15);
    }

    #[test]
    fn test_known_values() {
        assert!((gamma_cdf_integer_k(4, 2.0) - 0.14287653950145296).abs() < 1e-15);

        // P(2, x) = 1 - e^-x (1 + x)
        let x = 3.0_f64;
        let expected = 1.0 - (-x).exp() * (1.0 + x);
        assert!((gamma_cdf_integer_k(2, x) - expected).abs() < 1e-15);
    }

    #[test]
    fn test_bounded_and_increasing() {
        let mut prev = 0.0;
        for i in 1..200 {
            let x = i as f64 * 0.1;
            let p = gamma_cdf_integer_k(4, x);
            assert!((0.0..=1.0).contains(&p));
            assert!(p >= prev, "P(4, {}) = {} dropped below {}", x, p, prev);
            prev = p;
        }
        assert!(prev > 0.999);
    }
}
