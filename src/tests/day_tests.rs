//! # End-to-End Day Report Tests
//!
//! These tests run the whole pipeline the binary uses, from source data to the
//! rendered report, without touching the network. Current tables are parsed
//! from a captured page layout and fed through a fixture source.

use chrono::{Duration, NaiveDate, Timelike};
use clap::Parser;
use std::fs;
use tempfile::NamedTempFile;
use tide_seat_lib::config::Config;
use tide_seat_lib::report::{render_ascii, DayReport};
use tide_seat_lib::seat::{Seat, SeatResult};
use tide_seat_lib::source::{load_day, FixtureSource};
use tide_seat_lib::{tide_data, TideOrigin, WindSample};

use crate::{check_window, report_days, Cli};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
}

const PAGE: &str = r#"
    <table>
      <tr><td>1:12</td><td><span>転流</span></td></tr>
      <tr><td>4:31</td><td><span>西流最強</span></td><td>4.6kt</td></tr>
      <tr><td>7:48</td><td><span>転流</span></td></tr>
      <tr><td>10:05</td><td><span>東流最強</span></td><td>3.8kt</td></tr>
      <tr><td>13:20</td><td><span>転流</span></td></tr>
    </table>
"#;

/// Steady south-westerly at 3 m/s for every report hour.
fn south_westerly() -> Vec<WindSample> {
    (5..=13)
        .map(|h| WindSample::new(day().and_hms_opt(h, 0, 0).unwrap(), 3.0, 225).unwrap())
        .collect()
}

fn run(source: &FixtureSource) -> DayReport {
    let config = Config::default();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let inputs = rt.block_on(load_day(source, day()));
    DayReport::build(
        &config.location.name,
        day(),
        &inputs.wind,
        inputs.tides.as_deref(),
        &config.report,
    )
}

/// A south-westerly boat sees the west flow on starboard and the east flow on
/// port, with slack water around each reversal.
#[test]
fn observed_day_walks_through_reversals() {
    let events = tide_data::parse_current_table(PAGE, day()).unwrap();
    let source = FixtureSource::new()
        .with_wind(south_westerly())
        .with_tides(events);
    let report = run(&source);

    assert_eq!(report.origin, TideOrigin::Observed);
    assert_eq!(report.rows.len(), 9, "One row per hour from 05:00 to 13:00");

    let seats: Vec<SeatResult> = report.rows.iter().map(|r| r.seat).collect();
    let mid_starboard = SeatResult::Seat(Seat::MidStarboard);
    let mid_port = SeatResult::Seat(Seat::MidPort);
    assert_eq!(
        seats,
        vec![
            mid_starboard,                // 05:00 west flow
            mid_starboard,                // 06:00 west flow
            mid_starboard,                // 07:00 48 min before the turn
            SeatResult::Undeterminable,   // 08:00 slack
            mid_port,                     // 09:00 after the turn, east flow ahead
            mid_port,                     // 10:00
            mid_port,                     // 11:00
            mid_port,                     // 12:00 80 min before the next turn
            SeatResult::Undeterminable,   // 13:00 slack
        ]
    );
    assert_eq!(report.rows[3].tide_label, "calm");
    assert_eq!(report.rows[4].tide_label, "east-flow");
    assert!(report.rows.iter().all(|r| r.compass == "SW"));
}

/// Without a current table every row comes from the estimated model.
#[test]
fn missing_tides_fall_back_to_model() {
    let source = FixtureSource::new().with_wind(south_westerly());
    let report = run(&source);

    assert_eq!(report.origin, TideOrigin::Estimated);
    assert!(
        report.rows.iter().all(|r| r.tide.origin == TideOrigin::Estimated),
        "All rows should be estimated"
    );
    assert!(render_ascii(&report).contains("estimated (sine model)"));
}

/// Rows are dropped for hours the forecast does not cover.
#[test]
fn wind_gaps_skip_hours() {
    let mut wind = south_westerly();
    wind.retain(|s| s.time.hour() != 9);
    let source = FixtureSource::new().with_wind(wind);
    let report = run(&source);

    assert_eq!(report.rows.len(), 8);
    assert!(report
        .rows
        .iter()
        .all(|r| r.time != day().and_hms_opt(9, 0, 0).unwrap()));
}

/// Fixture files round-trip through disk the way `--fixture` reads them.
#[test]
fn fixture_file_drives_report() {
    let file = NamedTempFile::new().expect("Should create temp file");
    fs::write(
        file.path(),
        r#"{
            "wind": [
                { "time": "2025-05-01T06:00:00", "speed": 5.0, "direction": 270 },
                { "time": "2025-05-01T07:00:00", "speed": 0.4, "direction": 270 }
            ],
            "tides": [
                { "time": "2025-05-01T05:00:00", "kind": "east-flow" }
            ]
        }"#,
    )
    .expect("Should write fixture");

    let source = FixtureSource::load(file.path()).expect("Fixture should load");
    let report = run(&source);

    assert_eq!(report.rows.len(), 2);
    // Westerly wind against an east-going stream
    assert_eq!(report.rows[0].seat, SeatResult::Seat(Seat::SternPort));
    assert_eq!(report.rows[1].seat, SeatResult::Undeterminable);
}

/// Only today and the following days of the forecast are accepted.
#[test]
fn date_window_is_enforced() {
    let today = day();
    assert!(check_window(today, today, 8).is_ok());
    assert!(check_window(today + Duration::days(7), today, 8).is_ok());
    assert!(check_window(today + Duration::days(8), today, 8).is_err());
    assert!(check_window(today - Duration::days(1), today, 8).is_err());
}

/// `--week` expands to every forecast day, otherwise a single day is used.
#[test]
fn report_days_follow_flags() {
    let today = day();

    let cli = Cli::parse_from(["tide-seat", "--week"]);
    let days = report_days(&cli, today, 8);
    assert_eq!(days.len(), 8);
    assert_eq!(days[0], today);
    assert_eq!(days[7], today + Duration::days(7));

    let cli = Cli::parse_from(["tide-seat", "--date", "2025-05-03"]);
    assert_eq!(report_days(&cli, today, 8), vec![today + Duration::days(2)]);

    let cli = Cli::parse_from(["tide-seat"]);
    assert_eq!(report_days(&cli, today, 8), vec![today]);
}

const SAMPLE_FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/akashi-sample.json");

/// The shipped sample fixture still loads and produces the expected morning.
#[test]
fn sample_fixture_builds_observed_day() {
    let source = FixtureSource::load(SAMPLE_FIXTURE).expect("sample fixture should load");
    assert_eq!(source.first_day(), Some(day()));

    let report = run(&source);
    assert_eq!(report.origin, TideOrigin::Observed);
    let seats: Vec<(u32, SeatResult)> = report
        .rows
        .iter()
        .map(|row| (row.time.hour(), row.seat))
        .collect();
    assert_eq!(
        seats,
        vec![
            (5, SeatResult::Seat(Seat::MidStarboard)),
            (6, SeatResult::Seat(Seat::BowStarboard)),
            (7, SeatResult::Seat(Seat::BowStarboard)),
            (8, SeatResult::Undeterminable),
            (9, SeatResult::Seat(Seat::SternPort)),
            (10, SeatResult::Seat(Seat::SternPort)),
            (11, SeatResult::Seat(Seat::SternPort)),
            (12, SeatResult::Seat(Seat::SternPort)),
            (13, SeatResult::Undeterminable),
        ],
        "seats for the sample morning"
    );
    assert_eq!(report.rows[3].tide_label, "calm");
    assert_eq!(report.rows[4].tide_label, "east-flow");
}

/// Without `--date`, a fixture run starts from the fixture's own first day.
#[test]
fn fixture_runs_start_on_fixture_day() {
    let source = FixtureSource::load(SAMPLE_FIXTURE).unwrap();
    let start = source.first_day().unwrap();

    let cli = Cli::parse_from(["tide-seat", "--fixture", SAMPLE_FIXTURE]);
    assert_eq!(report_days(&cli, start, 8), vec![day()]);

    let cli = Cli::parse_from(["tide-seat", "--fixture", SAMPLE_FIXTURE, "--week"]);
    let days = report_days(&cli, start, 8);
    assert_eq!(days.first(), Some(&day()));
    assert_eq!(days.last(), Some(&(day() + Duration::days(7))));

    let cli = Cli::parse_from(["tide-seat", "--fixture", SAMPLE_FIXTURE, "--date", "2025-05-02"]);
    assert_eq!(report_days(&cli, start, 8), vec![day() + Duration::days(1)]);
}
