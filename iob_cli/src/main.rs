use clap::Parser;
use iob_core::*;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "iob")]
#[command(
    about = "Compute Insulin On Board (IOB) from one or more (units, time) pairs",
    long_about = "Compute Insulin On Board (IOB) from one or more (units, time) pairs.\n\
                  Time can be elapsed minutes or 'HH:MM' (24h). Clock times later than \
                  now are taken as yesterday."
)]
struct Cli {
    /// Pairs: U ELAPSED or U HH:MM (repeatable). Example: 1.0 30  2.0 120  0.8 01:10
    #[arg(required = true, allow_negative_numbers = true, value_name = "PAIRS")]
    args: Vec<String>,

    /// Duration of insulin activity in hours [default: 5]
    #[arg(long, visible_alias = "DIA")]
    dia: Option<f64>,

    /// Time to peak activity in minutes [default: 75]
    #[arg(long, visible_alias = "PEAK")]
    peak: Option<f64>,

    /// Shape parameter n (gamma-variate) [default: 3]
    #[arg(long, allow_negative_numbers = true)]
    shape_n: Option<i32>,

    /// Show per-dose breakdown
    #[arg(long)]
    breakdown: bool,

    /// Disable rounding (mainly for debugging)
    #[arg(long, conflicts_with = "json")]
    no_round: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Read curve defaults from this config file (flags still override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    iob_core::logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let params = resolve_params(&cli, &config);

    params.validate_duration()?;

    // Local wall-clock time for HH:MM tokens
    let now = chrono::Local::now().naive_local();
    let doses = parse_pairs(&cli.args, now, params.duration_hours)?;

    params.validate_peak()?;

    if doses.is_empty() {
        eprintln!("Total IOB: 0.00 U (no doses within DIA)");
        return Ok(());
    }

    tracing::debug!("Evaluating {} doses with {:?}", doses.len(), params);

    if cli.no_round {
        let raw = aggregate_unrounded(&doses, &params)?;
        print_raw(&raw, cli.breakdown);
        return Ok(());
    }

    let result = aggregate(&doses, &params, cli.breakdown)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    Ok(())
}

/// Command-line flags win over the config file
fn resolve_params(cli: &Cli, config: &Config) -> CurveParameters {
    CurveParameters {
        duration_hours: cli.dia.unwrap_or(config.curve.duration_hours),
        peak_minutes: cli.peak.unwrap_or(config.curve.peak_minutes),
        shape_n: cli.shape_n.unwrap_or(config.curve.shape_n),
    }
}

/// Rounded view: units in printf `%g` style, elapsed in whole minutes
fn print_result(result: &AggregateResult) {
    println!("Total IOB: {:.2} U", result.total);

    if let Some(ref rows) = result.breakdown {
        for row in rows {
            println!(
                "{} U, {:.0} min -> {:.2} U",
                format_units(row.amount),
                row.elapsed,
                row.iob
            );
        }
    }
}

/// Raw view: every float at full round-trip precision
fn print_raw(raw: &RawAggregate, breakdown: bool) {
    println!("Total IOB (raw): {:?}", raw.total);

    if breakdown {
        for row in &raw.contributions {
            println!("{:?} U, {:.0} min -> {:?} U", row.amount, row.elapsed, row.iob);
        }
    }
}

/// Six significant digits with trailing zeros dropped, like printf `%g`
fn format_units(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }

    // Exponent after rounding to six significant digits
    let sci = format!("{:.5e}", value);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..6).contains(&exponent) {
        let decimals = (5 - exponent) as usize;
        trim_fraction(format!("{:.*}", decimals, value))
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa.to_string()),
            sign,
            exponent.abs()
        )
    }
}

fn trim_fraction(digits: String) -> String {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        digits
    }
}
