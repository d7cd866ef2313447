//! Dose argument parsing.
//!
//! Doses arrive as a flat list of `(units, time)` token pairs, where the time
//! is either elapsed minutes (`30`, `120.5`) or a 24h clock time (`22:30`).
//! Clock times later than "now" are taken to mean yesterday. Doses older
//! than the DIA window are silently dropped.

use crate::{CurveParameters, Dose, Error, Result};
use chrono::{Duration, NaiveDateTime, NaiveTime};

/// Whether a token looks like `HH:MM` (digits on both sides of the first `:`).
///
/// This is a loose check; range errors are reported by
/// [`parse_hhmm_to_elapsed`].
pub fn is_hhmm_token(token: &str) -> bool {
    match token.split_once(':') {
        Some((hour, minute)) => is_digits(hour) && is_digits(minute),
        None => false,
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Convert `HH:MM` into minutes elapsed before `now`.
///
/// Uses today's date, or yesterday's if that time is still in the future.
/// Returns `Ok(None)` when the dose is older than `dia_minutes`.
pub fn parse_hhmm_to_elapsed(
    token: &str,
    now: NaiveDateTime,
    dia_minutes: f64,
) -> Result<Option<f64>> {
    let invalid =
        |detail: &str| Error::InvalidInput(format!("Invalid HH:MM time '{}'{}", token, detail));

    let (hour, minute) = token.split_once(':').ok_or_else(|| invalid(""))?;
    let hour: u32 = hour.parse().map_err(|_| invalid(""))?;
    let minute: u32 = minute.parse().map_err(|_| invalid(""))?;
    if hour > 23 {
        return Err(invalid(" (hour must be 0-23)"));
    }
    if minute > 59 {
        return Err(invalid(" (minute must be 0-59)"));
    }

    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| invalid(""))?;
    let mut when = now.date().and_time(time);
    if when > now {
        when -= Duration::days(1);
    }

    let delta = now - when;
    let seconds = match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    };
    let elapsed = seconds / 60.0;
    if (0.0..=dia_minutes).contains(&elapsed) {
        Ok(Some(elapsed))
    } else {
        tracing::debug!("Dropping dose at {} ({:.0} min ago, beyond DIA)", token, elapsed);
        Ok(None)
    }
}

/// Parse `U TIME U TIME ...` tokens into doses.
///
/// Pairs whose time falls outside `[0, dia_hours * 60]` are skipped without
/// error.
pub fn parse_pairs<S: AsRef<str>>(
    tokens: &[S],
    now: NaiveDateTime,
    dia_hours: f64,
) -> Result<Vec<Dose>> {
    CurveParameters {
        duration_hours: dia_hours,
        ..CurveParameters::default()
    }
    .validate_duration()?;

    if tokens.len() % 2 != 0 {
        return Err(Error::InvalidInput(
            "Odd number of positional arguments; doses must be (units, time) pairs.".into(),
        ));
    }

    let dia_minutes = dia_hours * 60.0;
    let mut doses = Vec::with_capacity(tokens.len() / 2);

    for (pair_index, pair) in tokens.chunks_exact(2).enumerate() {
        let arg = pair_index * 2 + 1;
        let units_token = pair[0].as_ref();
        let time_token = pair[1].as_ref();

        let units: f64 = units_token.trim().parse().map_err(|_| {
            Error::InvalidInput(format!(
                "Expected units (float) at arg {}, got '{}'",
                arg, units_token
            ))
        })?;

        let elapsed = if is_hhmm_token(time_token) {
            parse_hhmm_to_elapsed(time_token, now, dia_minutes)?
        } else {
            let minutes: f64 = time_token.trim().parse().map_err(|_| {
                Error::InvalidInput(format!(
                    "Expected elapsed minutes or 'HH:MM' at arg {}, got '{}'",
                    arg + 1,
                    time_token
                ))
            })?;
            if (0.0..=dia_minutes).contains(&minutes) {
                Some(minutes)
            } else {
                tracing::debug!("Dropping dose at {} min (outside DIA)", minutes);
                None
            }
        };

        if let Some(elapsed) = elapsed {
            doses.push(Dose::new(units, elapsed));
        }
    }

    Ok(doses)
}
