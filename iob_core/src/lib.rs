#![forbid(unsafe_code)]

//! Insulin On Board (IOB) computation.
//!
//! This crate provides:
//! - Domain types (doses, curve parameters, results)
//! - Closed-form incomplete gamma evaluator
//! - Single-dose gamma-variate decay model
//! - Multi-dose aggregation with round-once totals
//! - Dose argument parsing (elapsed minutes or HH:MM)
//! - Configuration and logging setup

pub mod types;
pub mod error;
pub mod gamma;
pub mod model;
pub mod aggregate;
pub mod parse;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use gamma::gamma_cdf_integer_k;
pub use model::evaluate_dose;
pub use aggregate::{aggregate, aggregate_unrounded};
pub use parse::{parse_pairs, parse_hhmm_to_elapsed, is_hhmm_token};
pub use config::Config;
