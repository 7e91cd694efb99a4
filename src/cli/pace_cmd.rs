use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::config::AppConfig;
use crate::core::extract::{parse_remaining_percent, parse_reset_date};
use crate::core::models::pace::{PaceReport, UsageReading};
use crate::core::pace::compute_surplus_or_deficit;

/// Raw `pace` arguments as they come off the command line.
#[derive(Debug, Clone, Default)]
pub struct PaceArgs {
    pub remaining: Option<f64>,
    pub remaining_text: Option<String>,
    pub reset: Option<NaiveDate>,
    pub reset_text: Option<String>,
    pub today: Option<NaiveDate>,
    pub quota_per_day: Option<f64>,
}

#[derive(Serialize)]
struct InsufficientPayload {
    ok: bool,
    reason: &'static str,
    remaining_percent: Option<f64>,
    reset_date: Option<NaiveDate>,
}

/// Turn CLI arguments into a reading, parsing scraped text where numbers are absent.
pub fn build_reading(args: &PaceArgs, quota_per_day: f64) -> UsageReading {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let remaining_percent = args
        .remaining
        .or_else(|| args.remaining_text.as_deref().and_then(parse_remaining_percent));
    let reset_date = args.reset.or_else(|| {
        args.reset_text
            .as_deref()
            .and_then(|text| parse_reset_date(text, today))
    });

    UsageReading {
        remaining_percent,
        reset_date,
        reference_date: Some(today),
        quota_per_day: Some(quota_per_day),
    }
}

pub fn run(args: PaceArgs, config: &AppConfig, opts: &OutputOptions) -> Result<()> {
    let quota_per_day = config
        .resolve_quota_per_day(args.quota_per_day)
        .context("Failed to resolve daily quota")?;
    let reading = build_reading(&args, quota_per_day);
    tracing::debug!(?reading, "built usage reading");

    let Some(report) = compute_surplus_or_deficit(&reading) else {
        report_insufficient(&reading, opts)?;
        std::process::exit(1);
    };

    match opts.format {
        OutputFormat::Text => {
            println!("{}", renderer::render_report(&report, &reading, opts.use_color));
        }
        OutputFormat::Json => {
            println!("{}", opts.to_json(&report)?);
        }
    }

    if let PaceReport::Unavailable(unavailable) = &report {
        tracing::info!(days_remaining = unavailable.days_remaining, "pace unavailable");
    }
    Ok(())
}

fn report_insufficient(reading: &UsageReading, opts: &OutputOptions) -> Result<()> {
    match opts.format {
        OutputFormat::Text => {
            if reading.remaining_percent.is_none() {
                eprintln!("Could not parse the remaining percentage. Pass --remaining or --remaining-text.");
            }
            if reading.reset_date.is_none() {
                eprintln!("Could not parse the reset date. Pass --reset or --reset-text.");
            }
        }
        OutputFormat::Json => {
            let payload = InsufficientPayload {
                ok: false,
                reason: "insufficient_input",
                remaining_percent: reading.remaining_percent,
                reset_date: reading.reset_date,
            };
            println!("{}", opts.to_json(&payload)?);
        }
    }
    Ok(())
}
