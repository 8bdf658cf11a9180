//! # Tide Seat Core Library
//!
//! This library decides which seat on a drifting boat faces the tidal current
//! ("shio-saki") for each morning hour at a fixed strait location. The boat is
//! assumed to lie head-to-wind under a stern sail, so the wind direction stands
//! in for the bow heading and the current is classified relative to it.
//!
//! ## Data Flow
//!
//! For every hour of the chosen day:
//! 1. **Wind**: a [`WindSample`] is looked up in the [`WindForecast`] mapping
//! 2. **Tide**: [`tide::resolve`] turns the (possibly absent) [`TideEvent`] list
//!    into a [`TideStatus`], falling back to [`fallback::estimate`] when no
//!    events are available
//! 3. **Seat**: [`seat::classify`] maps the relative bearing into a
//!    [`seat::SeatResult`]
//!
//! Steps 2 and 3 are pure and total. Network access lives entirely in
//! [`source`], [`wind_data`] and [`tide_data`]; failures there become empty or
//! absent inputs before they reach the core.
//!
//! ## Direction Conventions
//! - Wind direction is meteorological: the bearing the wind blows *from*
//! - Current direction is only ever [`WEST`] (270) or [`EAST`] (90); the strait
//!   is modeled as a two-way channel

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub mod cache;
pub mod compass;
pub mod config;
pub mod fallback;
pub mod report;
pub mod retry;
pub mod seat;
pub mod source;
pub mod tide;
pub mod tide_data;
pub mod wind_data;

use seat::SeatResult;

/// Direction of a westward-flowing current, in degrees.
pub const WEST: u16 = 270;
/// Direction of an eastward-flowing current, in degrees.
pub const EAST: u16 = 90;

/// Contract violations detected while building core inputs.
///
/// These are raised by the data collaborators when they validate what they
/// fetched. The core itself never produces them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// Wind speed below zero, NaN or infinite
    #[error("invalid wind speed {0} m/s")]
    Speed(f32),

    /// Wind direction outside [0, 360)
    #[error("invalid wind direction {0}°")]
    Direction(i32),

    /// Timestamp text that does not parse
    #[error("malformed timestamp {0:?}")]
    Timestamp(String),
}

/// Hourly wind forecast for one instant.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use tide_seat_lib::WindSample;
///
/// let time = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap().and_hms_opt(6, 0, 0).unwrap();
/// let sample = WindSample::new(time, 3.4, 225).unwrap();
/// assert_eq!(sample.direction, 225);
///
/// assert!(WindSample::new(time, -0.1, 225).is_err());
/// assert!(WindSample::new(time, 3.4, 360).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindSample {
    /// Naive local time, hour resolution
    pub time: NaiveDateTime,
    /// Wind speed in m/s
    pub speed: f32,
    /// Direction the wind blows from, 0-359 degrees
    pub direction: u16,
}

impl WindSample {
    /// Build a sample, rejecting negative speeds and out-of-range directions.
    pub fn new(time: NaiveDateTime, speed: f32, direction: u16) -> Result<Self, InputError> {
        let sample = WindSample {
            time,
            speed,
            direction,
        };
        sample.validate()?;
        Ok(sample)
    }

    /// Check the sample against the input contract.
    ///
    /// Deserialized samples bypass [`WindSample::new`], so fixture loaders call
    /// this explicitly.
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(InputError::Speed(self.speed));
        }
        if self.direction >= 360 {
            return Err(InputError::Direction(self.direction as i32));
        }
        Ok(())
    }
}

/// Wind samples keyed by their timestamp.
pub type WindForecast = BTreeMap<NaiveDateTime, WindSample>;

/// What a published current-table entry says is happening.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TideEventKind {
    /// Maximum of the westward flow
    WestFlow,
    /// Maximum of the eastward flow
    EastFlow,
    /// Slack water, the current reverses around this time
    Turning,
}

impl TideEventKind {
    /// Current direction in degrees, `None` for a turning event.
    pub fn direction(self) -> Option<u16> {
        match self {
            TideEventKind::WestFlow => Some(WEST),
            TideEventKind::EastFlow => Some(EAST),
            TideEventKind::Turning => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TideEventKind::WestFlow => "west-flow",
            TideEventKind::EastFlow => "east-flow",
            TideEventKind::Turning => "turning",
        }
    }
}

/// One entry of the current table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideEvent {
    pub time: NaiveDateTime,
    pub kind: TideEventKind,
}

impl TideEvent {
    pub fn new(time: NaiveDateTime, kind: TideEventKind) -> Self {
        TideEvent { time, kind }
    }

    pub fn direction(&self) -> Option<u16> {
        self.kind.direction()
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// Resolved current at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TideState {
    WestFlow,
    EastFlow,
    /// Raw turning state; only surfaces when a lone turning event has no
    /// neighbour to resolve to
    Turning,
    /// Slack water
    Calm,
}

impl From<TideEventKind> for TideState {
    fn from(kind: TideEventKind) -> Self {
        match kind {
            TideEventKind::WestFlow => TideState::WestFlow,
            TideEventKind::EastFlow => TideState::EastFlow,
            TideEventKind::Turning => TideState::Turning,
        }
    }
}

/// Where a [`TideStatus`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TideOrigin {
    /// Derived from published current-table events
    Observed,
    /// Derived from the sinusoidal fallback model
    Estimated,
}

/// Acting current at one instant, recomputed per query.
///
/// The direction is derived from the state, so a calm or turning status can
/// never carry a direction.
///
/// # Example
/// ```
/// use tide_seat_lib::{TideOrigin, TideState, TideStatus};
///
/// let status = TideStatus::new(TideState::WestFlow, TideOrigin::Estimated);
/// assert_eq!(status.direction(), Some(270));
/// assert_eq!(status.label(), "west-flow (estimated)");
///
/// let slack = TideStatus::new(TideState::Calm, TideOrigin::Observed);
/// assert_eq!(slack.direction(), None);
/// assert_eq!(slack.label(), "calm");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TideStatus {
    pub state: TideState,
    pub origin: TideOrigin,
}

impl TideStatus {
    pub fn new(state: TideState, origin: TideOrigin) -> Self {
        TideStatus { state, origin }
    }

    /// Current direction in degrees (90 or 270), `None` for slack water.
    pub fn direction(&self) -> Option<u16> {
        match self.state {
            TideState::WestFlow => Some(WEST),
            TideState::EastFlow => Some(EAST),
            TideState::Turning | TideState::Calm => None,
        }
    }

    /// Display label, suffixed with "(estimated)" for model output.
    pub fn label(&self) -> String {
        let base = match self.state {
            TideState::WestFlow => "west-flow",
            TideState::EastFlow => "east-flow",
            TideState::Turning => "turning",
            TideState::Calm => "calm",
        };
        match self.origin {
            TideOrigin::Observed => base.to_string(),
            TideOrigin::Estimated => format!("{base} (estimated)"),
        }
    }
}

/// Resolve the current at `time` and classify the seat for `wind`.
///
/// This is the single entry point callers need: an absent or empty event list
/// switches the resolver to the fallback model, and the classifier handles
/// slack water and light wind on its own.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use tide_seat_lib::{resolve_and_classify, TideEvent, TideEventKind, WindSample};
/// use tide_seat_lib::seat::{Seat, SeatResult};
///
/// let day = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
/// let time = day.and_hms_opt(7, 0, 0).unwrap();
/// let events = [TideEvent::new(day.and_hms_opt(6, 30, 0).unwrap(), TideEventKind::WestFlow)];
///
/// // Wind from the north, current setting west: port side mid-ship
/// let wind = WindSample::new(time, 4.0, 0).unwrap();
/// let (tide, seat) = resolve_and_classify(time, &wind, Some(&events[..]));
/// assert_eq!(tide.direction(), Some(270));
/// assert_eq!(seat, SeatResult::Seat(Seat::MidPort));
/// ```
pub fn resolve_and_classify(
    time: NaiveDateTime,
    wind: &WindSample,
    events: Option<&[TideEvent]>,
) -> (TideStatus, SeatResult) {
    let tide = tide::resolve(time, events);
    let seat = seat::classify(wind.direction, tide.direction(), wind.speed);
    (tide, seat)
}
