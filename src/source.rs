//! # Forecast Sources
//!
//! The resolver and classifier never touch the network. Everything they need
//! comes through [`ForecastSource`], which has a live implementation backed by
//! HTTP with retries ([`LiveSource`]) and an in-memory one for tests and
//! offline runs ([`FixtureSource`]). [`CachedSource`](crate::cache::CachedSource)
//! wraps either with a time-boxed cache.
//!
//! [`load_day`] is the boundary where failures stop: a failed wind fetch
//! becomes an empty forecast and a failed tide fetch becomes an absent event
//! list, which switches the resolver to its fallback model.

use crate::config::Config;
use crate::retry::RetryConfig;
use crate::{tide_data, wind_data, InputError, TideEvent, WindForecast, WindSample};
use chrono::NaiveDate;
use serde::Deserialize;
use std::{fs, io, path::Path};
use thiserror::Error;

/// Errors that can occur while fetching or loading forecast data.
#[derive(Error, Debug)]
pub enum SourceError {
    /// HTTP request failed (network, server, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// Response body did not have the expected shape
    #[error("malformed payload: {0}")]
    Parse(String),

    /// Payload parsed but broke the input contract
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    /// Source has nothing for the request
    #[error("no data available for {0}")]
    Unavailable(String),

    /// Every attempt failed with a retryable error
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<SourceError>,
    },

    /// Fixture file could not be read
    #[error("fixture IO: {0}")]
    Io(#[from] io::Error),
}

/// Capability to provide wind forecasts and current-table events.
#[allow(async_fn_in_trait)]
pub trait ForecastSource {
    /// Hourly wind samples for the whole forecast window.
    async fn wind_forecast(&self) -> Result<WindForecast, SourceError>;

    /// Current-table events for one day, sorted by time.
    async fn tide_events(&self, date: NaiveDate) -> Result<Vec<TideEvent>, SourceError>;
}

/// Inputs for one report day after failures have been absorbed.
#[derive(Debug, Clone, Default)]
pub struct DayInputs {
    /// Empty when the wind fetch failed
    pub wind: WindForecast,
    /// `None` when the tide fetch failed or found no events
    pub tides: Option<Vec<TideEvent>>,
}

/// Fetch both inputs for `date`, degrading failures to empty/absent data.
pub async fn load_day<S: ForecastSource>(source: &S, date: NaiveDate) -> DayInputs {
    let (wind, tides) = tokio::join!(source.wind_forecast(), source.tide_events(date));

    let wind = wind.unwrap_or_else(|err| {
        log::warn!("Wind forecast unavailable: {}", err);
        WindForecast::new()
    });

    let tides = match tides {
        Ok(events) if events.is_empty() => {
            log::info!("No current-table events for {}, using estimated model", date);
            None
        }
        Ok(events) => Some(events),
        Err(err) => {
            log::warn!("Current table unavailable for {}: {}", date, err);
            log::warn!("Falling back to estimated tide model");
            None
        }
    };

    DayInputs { wind, tides }
}

/// HTTP-backed source for the configured location.
pub struct LiveSource {
    client: reqwest::Client,
    config: Config,
    retry: RetryConfig,
}

impl LiveSource {
    pub fn new(config: Config) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().build()?;
        let retry = RetryConfig::from(&config.network);
        Ok(LiveSource {
            client,
            config,
            retry,
        })
    }
}

impl ForecastSource for LiveSource {
    async fn wind_forecast(&self) -> Result<WindForecast, SourceError> {
        wind_data::fetch(&self.client, &self.config, &self.retry).await
    }

    async fn tide_events(&self, date: NaiveDate) -> Result<Vec<TideEvent>, SourceError> {
        tide_data::fetch(&self.client, &self.config, date, &self.retry).await
    }
}

/// Fixture file layout.
#[derive(Debug, Default, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    wind: Vec<WindSample>,
    #[serde(default)]
    tides: Vec<TideEvent>,
}

/// In-memory source with fixed data.
///
/// # Example
/// ```
/// use tide_seat_lib::source::FixtureSource;
///
/// let fixture = FixtureSource::from_json(r#"{
///     "wind": [{ "time": "2025-05-01T06:00:00", "speed": 3.0, "direction": 250 }],
///     "tides": [{ "time": "2025-05-01T05:40:00", "kind": "turning" }]
/// }"#).unwrap();
/// assert_eq!(fixture.wind().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    wind: WindForecast,
    tides: Vec<TideEvent>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wind<I: IntoIterator<Item = WindSample>>(mut self, samples: I) -> Self {
        self.wind
            .extend(samples.into_iter().map(|sample| (sample.time, sample)));
        self
    }

    pub fn with_tides<I: IntoIterator<Item = TideEvent>>(mut self, events: I) -> Self {
        self.tides.extend(events);
        self.tides.sort_by_key(|e| e.time);
        self
    }

    /// Parse a JSON fixture, validating every wind sample.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let file: FixtureFile =
            serde_json::from_str(json).map_err(|e| SourceError::Parse(e.to_string()))?;
        for sample in &file.wind {
            sample.validate()?;
        }
        Ok(Self::new().with_wind(file.wind).with_tides(file.tides))
    }

    /// Load a JSON fixture from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn wind(&self) -> &WindForecast {
        &self.wind
    }

    /// Earliest day the fixture covers, by wind sample and then tide event.
    pub fn first_day(&self) -> Option<NaiveDate> {
        self.wind
            .keys()
            .next()
            .or_else(|| self.tides.first().map(|e| &e.time))
            .map(|time| time.date())
    }
}

impl ForecastSource for FixtureSource {
    async fn wind_forecast(&self) -> Result<WindForecast, SourceError> {
        Ok(self.wind.clone())
    }

    async fn tide_events(&self, date: NaiveDate) -> Result<Vec<TideEvent>, SourceError> {
        let events: Vec<TideEvent> = self
            .tides
            .iter()
            .filter(|e| e.time.date() == date)
            .copied()
            .collect();
        if events.is_empty() {
            return Err(SourceError::Unavailable(format!("tides on {date}")));
        }
        Ok(events)
    }
}
