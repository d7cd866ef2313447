//! Core domain types for the IOB calculator.
//!
//! This module defines the value types shared by the model and aggregation:
//! - Doses (amount + elapsed minutes)
//! - Curve parameters (DIA, peak, shape)
//! - Aggregation results and per-dose breakdown rows

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Defaults
// ============================================================================

/// Default duration of insulin action, in hours
pub const DEFAULT_DURATION_HOURS: f64 = 5.0;

/// Default time to peak activity, in minutes
pub const DEFAULT_PEAK_MINUTES: f64 = 75.0;

/// Default gamma-variate shape exponent
pub const DEFAULT_SHAPE_N: i32 = 3;

// ============================================================================
// Dose
// ============================================================================

/// A single bolus: insulin units given `elapsed` minutes ago
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dose {
    pub amount: f64,
    pub elapsed: f64,
}

impl Dose {
    pub fn new(amount: f64, elapsed: f64) -> Self {
        Self { amount, elapsed }
    }
}

impl From<(f64, f64)> for Dose {
    fn from((amount, elapsed): (f64, f64)) -> Self {
        Self::new(amount, elapsed)
    }
}

// ============================================================================
// Curve Parameters
// ============================================================================

/// Shape of the insulin activity curve
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveParameters {
    /// Duration of insulin action (DIA), in hours
    #[serde(default = "default_duration_hours")]
    pub duration_hours: f64,

    /// Time to peak activity, in minutes
    #[serde(default = "default_peak_minutes")]
    pub peak_minutes: f64,

    /// Shape exponent n; values below 1 are treated as 1
    #[serde(default = "default_shape_n")]
    pub shape_n: i32,
}

impl Default for CurveParameters {
    fn default() -> Self {
        Self {
            duration_hours: DEFAULT_DURATION_HOURS,
            peak_minutes: DEFAULT_PEAK_MINUTES,
            shape_n: DEFAULT_SHAPE_N,
        }
    }
}

fn default_duration_hours() -> f64 {
    DEFAULT_DURATION_HOURS
}

fn default_peak_minutes() -> f64 {
    DEFAULT_PEAK_MINUTES
}

fn default_shape_n() -> i32 {
    DEFAULT_SHAPE_N
}

impl CurveParameters {
    pub fn new(duration_hours: f64, peak_minutes: f64, shape_n: i32) -> Self {
        Self {
            duration_hours,
            peak_minutes,
            shape_n,
        }
    }

    /// Check that both DIA and peak are strictly positive
    pub fn validate(&self) -> Result<()> {
        self.validate_duration()?;
        self.validate_peak()
    }

    /// Check that DIA is strictly positive
    ///
    /// NaN fails as well, since it is not greater than zero.
    pub fn validate_duration(&self) -> Result<()> {
        if self.duration_hours > 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidParameter(format!(
                "dia must be a positive number of hours (got {})",
                self.duration_hours
            )))
        }
    }

    /// Check that the peak time is strictly positive
    pub fn validate_peak(&self) -> Result<()> {
        if self.peak_minutes > 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidParameter(format!(
                "peak must be a positive number of minutes (got {})",
                self.peak_minutes
            )))
        }
    }

    /// Action window length in minutes (unfloored)
    pub fn window_minutes(&self) -> f64 {
        self.duration_hours * 60.0
    }

    /// Effective shape exponent, never below 1
    pub fn effective_shape(&self) -> u32 {
        self.shape_n.max(1) as u32
    }
}

// ============================================================================
// Aggregation Results
// ============================================================================

/// One row of the per-dose breakdown
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub amount: f64,
    /// Elapsed minutes rounded to a whole number
    pub elapsed: f64,
    /// Individual IOB rounded to 2 decimals; 0.0 for doses outside the window
    pub iob: f64,
}

/// Total IOB with an optional per-dose breakdown in input order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<BreakdownEntry>>,
}

/// Unrounded contribution of a dose inside the action window
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawContribution {
    pub amount: f64,
    pub elapsed: f64,
    pub iob: f64,
}

/// Unrounded total and per-dose contributions, for debugging output
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAggregate {
    pub total: f64,
    pub contributions: Vec<RawContribution>,
}

// ============================================================================
// Rounding
// ============================================================================

/// Round to `decimals` places based on the exact binary value.
///
/// Scaling by `10^decimals` first would itself round, turning values such as
/// 0.025 (really 0.02500000000000000139) into exact ties. Fixed-precision
/// formatting works on the exact value and breaks true ties to even.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}
