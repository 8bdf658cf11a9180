//! # Daily Seat Report
//!
//! Assembles one row per report hour and renders the result for a terminal.
//! Each row pairs the wind forecast for that hour with the resolved current
//! and the seat that faces it. Hours without a wind sample are left out, as
//! nothing can be said about the boat's heading for them.

use crate::config::ReportConfig;
use crate::seat::{SeatResult, Side};
use crate::{compass, resolve_and_classify, TideEvent, TideOrigin, TideState, TideStatus};
use crate::{WindForecast, WindSample};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt::Write;

/// One report hour.
#[derive(Debug, Clone, Serialize)]
pub struct HourRow {
    pub time: NaiveDateTime,
    pub wind: WindSample,
    /// Eight-point compass label of the wind direction
    pub compass: &'static str,
    pub tide: TideStatus,
    pub tide_label: String,
    pub seat: SeatResult,
    pub seat_label: &'static str,
    pub side: Side,
    /// Badge colour for graphical front ends
    pub color: &'static str,
}

/// Hourly advice for one day.
#[derive(Debug, Clone, Serialize)]
pub struct DayReport {
    pub location: String,
    pub date: NaiveDate,
    /// Observed when current-table events were supplied
    pub origin: TideOrigin,
    pub rows: Vec<HourRow>,
}

impl DayReport {
    /// Build the report for `date` over the configured hour window.
    pub fn build(
        location: &str,
        date: NaiveDate,
        wind: &WindForecast,
        tides: Option<&[TideEvent]>,
        window: &ReportConfig,
    ) -> Self {
        let tides = tides.filter(|events| !events.is_empty());
        let origin = match tides {
            Some(_) => TideOrigin::Observed,
            None => TideOrigin::Estimated,
        };

        let rows = (window.first_hour..=window.last_hour)
            .filter_map(|hour| date.and_hms_opt(hour, 0, 0))
            .filter_map(|time| {
                let Some(wind) = wind.get(&time) else {
                    log::debug!("No wind sample for {}, skipping hour", time);
                    return None;
                };
                let (tide, seat) = resolve_and_classify(time, wind, tides);
                Some(HourRow {
                    time,
                    wind: *wind,
                    compass: compass::label(wind.direction),
                    tide,
                    tide_label: tide.label(),
                    seat,
                    seat_label: seat.label(),
                    side: seat.side(),
                    color: seat.color(),
                })
            })
            .collect();

        DayReport {
            location: location.to_string(),
            date,
            origin,
            rows,
        }
    }

    pub fn source_label(&self) -> &'static str {
        match self.origin {
            TideOrigin::Observed => "observed (tide736.net)",
            TideOrigin::Estimated => "estimated (sine model)",
        }
    }
}

fn side_marker(side: Side) -> &'static str {
    match side {
        Side::Starboard => "[S]",
        Side::Port => "[P]",
        Side::Unknown => "[-]",
    }
}

fn tide_marker(tide: &TideStatus) -> &'static str {
    match tide.state {
        TideState::WestFlow => "<<",
        TideState::EastFlow => ">>",
        TideState::Turning | TideState::Calm => "--",
    }
}

/// Render the report as a fixed-width table.
pub fn render_ascii(report: &DayReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "{} {}", report.location, report.date.format("%Y-%m-%d (%a)"));
    let _ = writeln!(out, "Tide data: {}", report.source_label());
    let _ = writeln!(out);

    if report.rows.is_empty() {
        let _ = writeln!(out, "No wind forecast available for this day.");
        return out;
    }

    let _ = writeln!(out, "{:<6} {:<12} {:<25} {}", "Time", "Wind", "Tide", "Seat");
    let _ = writeln!(out, "{}", "-".repeat(64));
    for row in &report.rows {
        let wind = format!("{:.1}m/s {}", row.wind.speed, row.compass);
        let tide = format!("{} {}", tide_marker(&row.tide), row.tide_label);
        let _ = writeln!(
            out,
            "{:<6} {:<12} {:<25} {} {}",
            row.time.format("%H:%M"),
            wind,
            tide,
            side_marker(row.side),
            row.seat_label
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "[S] starboard side faces the current, [P] port side");
    let _ = writeln!(out, "Only valid for boats held head-to-wind by a stern sail.");
    out
}

/// Print the report to stdout.
pub fn draw_ascii(report: &DayReport) {
    print!("{}", render_ascii(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seat::Seat;
    use crate::TideEventKind;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    fn window() -> ReportConfig {
        ReportConfig {
            first_hour: 5,
            last_hour: 13,
            forecast_days: 8,
        }
    }

    fn forecast(hours: &[(u32, f32, u16)]) -> WindForecast {
        hours
            .iter()
            .map(|&(h, speed, dir)| {
                let time = day().and_hms_opt(h, 0, 0).unwrap();
                (time, WindSample::new(time, speed, dir).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_rows_follow_wind_hours_inside_window() {
        let wind = forecast(&[(4, 3.0, 0), (5, 3.0, 0), (9, 3.0, 0), (13, 3.0, 0), (14, 3.0, 0)]);
        let report = DayReport::build("Akashi Strait", day(), &wind, None, &window());
        let hours: Vec<String> = report
            .rows
            .iter()
            .map(|r| r.time.format("%H").to_string())
            .collect();
        assert_eq!(hours, vec!["05", "09", "13"]);
        assert_eq!(report.origin, TideOrigin::Estimated);
        assert!(report.rows.iter().all(|r| r.tide.origin == TideOrigin::Estimated));
    }

    #[test]
    fn test_observed_rows_use_events() {
        let wind = forecast(&[(6, 4.0, 0), (8, 4.0, 0), (10, 0.5, 0)]);
        let events = [
            TideEvent::new(day().and_hms_opt(5, 0, 0).unwrap(), TideEventKind::WestFlow),
            TideEvent::new(day().and_hms_opt(8, 10, 0).unwrap(), TideEventKind::Turning),
            TideEvent::new(day().and_hms_opt(11, 30, 0).unwrap(), TideEventKind::EastFlow),
        ];
        let report = DayReport::build("Akashi Strait", day(), &wind, Some(&events[..]), &window());
        assert_eq!(report.origin, TideOrigin::Observed);

        let six = &report.rows[0];
        assert_eq!(six.tide_label, "west-flow");
        assert_eq!(six.seat, SeatResult::Seat(Seat::MidPort));
        assert_eq!(six.compass, "N");

        let eight = &report.rows[1];
        assert_eq!(eight.tide_label, "calm");
        assert_eq!(eight.seat, SeatResult::Undeterminable);

        // East flow but too little wind to hold a heading
        let ten = &report.rows[2];
        assert_eq!(ten.tide_label, "east-flow");
        assert_eq!(ten.seat, SeatResult::Undeterminable);
        assert_eq!(ten.side, Side::Unknown);
    }

    #[test]
    fn test_empty_event_list_counts_as_estimated() {
        let wind = forecast(&[(7, 3.0, 90)]);
        let report = DayReport::build("Akashi Strait", day(), &wind, Some(&[][..]), &window());
        assert_eq!(report.origin, TideOrigin::Estimated);
        assert!(report.rows[0].tide_label.ends_with("(estimated)"));
    }

    #[test]
    fn test_render_ascii_table() {
        let wind = forecast(&[(6, 4.0, 0)]);
        let events = [TideEvent::new(
            day().and_hms_opt(5, 0, 0).unwrap(),
            TideEventKind::WestFlow,
        )];
        let report = DayReport::build("Akashi Strait", day(), &wind, Some(&events[..]), &window());
        let text = render_ascii(&report);
        assert!(text.starts_with("Akashi Strait 2025-05-01 (Thu)"));
        assert!(text.contains("observed (tide736.net)"));
        assert!(text.contains("4.0m/s N"));
        assert!(text.contains("<< west-flow"));
        assert!(text.contains("[P] mid-port"));
    }

    #[test]
    fn test_render_without_wind() {
        let report = DayReport::build("Akashi Strait", day(), &WindForecast::new(), None, &window());
        assert!(render_ascii(&report).contains("No wind forecast available"));
    }

    #[test]
    fn test_report_serializes_labels() {
        let wind = forecast(&[(6, 4.0, 0)]);
        let report = DayReport::build("Akashi Strait", day(), &wind, None, &window());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["origin"], "estimated");
        assert_eq!(json["rows"][0]["compass"], "N");
        assert!(json["rows"][0]["tide_label"].as_str().unwrap().contains("estimated"));
    }
}
