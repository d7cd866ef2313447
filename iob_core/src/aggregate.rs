//! Multi-dose IOB aggregation.
//!
//! Doses inside the action window (`0 <= elapsed < DIA * 60`, positive
//! amount) contribute their unrounded IOB to a running total; everything
//! else contributes zero without raising. The total is rounded to 2 decimals
//! exactly once, after all doses are summed.

use crate::model::evaluate_dose;
use crate::types::round_to;
use crate::{
    AggregateResult, BreakdownEntry, CurveParameters, Dose, RawAggregate, RawContribution,
    Result,
};

/// Total IOB for a set of doses, with an optional per-dose breakdown.
///
/// The breakdown has one entry per input dose, in input order. Invalid
/// curve parameters abort before any dose is evaluated.
pub fn aggregate(
    doses: &[Dose],
    params: &CurveParameters,
    include_breakdown: bool,
) -> Result<AggregateResult> {
    params.validate()?;

    let end = params.window_minutes();
    let mut total = 0.0;
    let mut breakdown = include_breakdown.then(|| Vec::with_capacity(doses.len()));

    for dose in doses {
        let contribution = if in_window(dose, end) {
            let raw = evaluate_dose(dose.amount, dose.elapsed, params, false)?;
            total += raw;
            round_to(raw, 2)
        } else {
            tracing::debug!(
                "Skipping dose {} U at {} min (outside {} min window)",
                dose.amount,
                dose.elapsed,
                end
            );
            0.0
        };

        if let Some(rows) = breakdown.as_mut() {
            rows.push(BreakdownEntry {
                amount: dose.amount,
                elapsed: round_to(dose.elapsed, 0),
                iob: contribution,
            });
        }
    }

    let total = round_to(total, 2);
    tracing::debug!("Aggregated {} doses: total IOB {:.2} U", doses.len(), total);

    Ok(AggregateResult { total, breakdown })
}

/// Unrounded total and contributions of the doses inside the window.
///
/// Doses outside the window are left out of `contributions` entirely.
pub fn aggregate_unrounded(doses: &[Dose], params: &CurveParameters) -> Result<RawAggregate> {
    params.validate()?;

    let end = params.window_minutes();
    let mut result = RawAggregate::default();

    for dose in doses.iter().filter(|d| in_window(d, end)) {
        let iob = evaluate_dose(dose.amount, dose.elapsed, params, false)?;
        result.total += iob;
        result.contributions.push(RawContribution {
            amount: dose.amount,
            elapsed: dose.elapsed,
            iob,
        });
    }

    Ok(result)
}

fn in_window(dose: &Dose, end: f64) -> bool {
    dose.amount > 0.0 && (0.0..end).contains(&dose.elapsed)
}
