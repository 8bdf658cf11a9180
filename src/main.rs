//! # Tide Seat Application Entry Point
//!
//! Fetches the wind forecast and the current table for the chosen day, then
//! prints which seat faces the current for each morning hour. Runs against
//! the live sites by default or against a JSON fixture with `--fixture`.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::Context;
use chrono::{Duration, Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use tide_seat_lib::cache::CachedSource;
use tide_seat_lib::config::Config;
use tide_seat_lib::report::{draw_ascii, DayReport};
use tide_seat_lib::source::{load_day, DayInputs, FixtureSource, ForecastSource, LiveSource};

#[derive(Debug, Parser)]
#[command(
    name = "tide-seat",
    version,
    about = "Which side of a drifting boat faces the tidal current, hour by hour"
)]
struct Cli {
    /// Day to report on (YYYY-MM-DD), defaults to today or to the fixture's first day
    #[arg(short, long)]
    date: Option<NaiveDate>,
    /// Report every day of the forecast window instead of a single day
    #[arg(long, conflicts_with = "date")]
    week: bool,
    /// Configuration file, defaults to seat-config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Read wind and tide data from a JSON fixture instead of the network
    #[arg(long)]
    fixture: Option<PathBuf>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// Reject days outside the wind forecast window.
fn check_window(date: NaiveDate, today: NaiveDate, forecast_days: u32) -> anyhow::Result<()> {
    let last = today + Duration::days(i64::from(forecast_days.max(1)) - 1);
    if date < today || date > last {
        anyhow::bail!(
            "{} is outside the forecast window {} to {}",
            date,
            today,
            last
        );
    }
    Ok(())
}

/// Days covered by this run, counted from `start` unless `--date` names one.
fn report_days(cli: &Cli, start: NaiveDate, forecast_days: u32) -> Vec<NaiveDate> {
    if cli.week {
        (0..i64::from(forecast_days.max(1)))
            .map(|offset| start + Duration::days(offset))
            .collect()
    } else {
        vec![cli.date.unwrap_or(start)]
    }
}

async fn load_all<S: ForecastSource>(source: &S, days: &[NaiveDate]) -> Vec<(NaiveDate, DayInputs)> {
    let mut loaded = Vec::with_capacity(days.len());
    for &day in days {
        loaded.push((day, load_day(source, day).await));
    }
    loaded
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    let fixture = match &cli.fixture {
        Some(path) => Some(
            FixtureSource::load(path)
                .with_context(|| format!("loading fixture {}", path.display()))?,
        ),
        None => None,
    };

    // Fixtures carry their own dates; only live runs are bound to the forecast
    let today = Local::now().date_naive();
    let start = fixture
        .as_ref()
        .and_then(FixtureSource::first_day)
        .unwrap_or(today);
    let days = report_days(&cli, start, config.report.forecast_days);
    if fixture.is_none() {
        for &day in &days {
            check_window(day, today, config.report.forecast_days)?;
        }
    }

    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;

    // Fetch failures never abort the run: they degrade to empty wind data or
    // the estimated tide model inside load_day
    let loaded = rt.block_on(async {
        match &fixture {
            Some(fixture) => Ok::<_, anyhow::Error>(load_all(fixture, &days).await),
            None => {
                let live = LiveSource::new(config.clone()).context("building HTTP client")?;
                let cached = CachedSource::new(live, config.network.cache_ttl());
                Ok(load_all(&cached, &days).await)
            }
        }
    })?;

    let reports: Vec<DayReport> = loaded
        .iter()
        .map(|(day, inputs)| {
            DayReport::build(
                &config.location.name,
                *day,
                &inputs.wind,
                inputs.tides.as_deref(),
                &config.report,
            )
        })
        .collect();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for (index, report) in reports.iter().enumerate() {
            if index > 0 {
                println!();
            }
            draw_ascii(report);
        }
    }

    Ok(())
}
