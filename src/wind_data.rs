//! # Open-Meteo Wind Forecast
//!
//! Fetches hourly 10 m wind speed and direction for the configured location.
//!
//! ## Data Source
//! - **URL**: https://api.open-meteo.com/v1/forecast
//! - **Units**: m/s (`wind_speed_unit=ms`), degrees the wind blows from
//! - **Time**: naive local timestamps in the configured timezone, formatted
//!   `%Y-%m-%dT%H:%M`
//!
//! ## Validation
//! Hours where the API reports `null` for either value are dropped, so the
//! report just skips them. A direction of exactly 360 is read as north. Any
//! negative speed or direction beyond 360 rejects the whole payload.

use crate::config::Config;
use crate::retry::{with_retry, RetryConfig, RetryError};
use crate::source::SourceError;
use crate::{InputError, WindForecast, WindSample};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::time::Duration;

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: Hourly,
}

#[derive(Debug, Deserialize)]
struct Hourly {
    time: Vec<String>,
    wind_speed_10m: Vec<Option<f32>>,
    wind_direction_10m: Vec<Option<f64>>,
}

/// Fetch the hourly wind forecast for the configured location.
pub async fn fetch(
    client: &reqwest::Client,
    config: &Config,
    retry: &RetryConfig,
) -> Result<WindForecast, SourceError> {
    let location = &config.location;
    let params = [
        ("latitude", location.latitude.to_string()),
        ("longitude", location.longitude.to_string()),
        ("hourly", "wind_speed_10m,wind_direction_10m".to_string()),
        ("wind_speed_unit", "ms".to_string()),
        ("timezone", location.timezone.clone()),
        ("forecast_days", config.report.forecast_days.to_string()),
    ];
    let params = &params;
    let timeout = Duration::from_secs(config.network.wind_timeout_secs);

    log::info!("Fetching wind forecast for {}", location.name);
    let body = with_retry(
        move || async move {
            let response = client
                .get(FORECAST_URL)
                .query(params)
                .timeout(timeout)
                .send()
                .await
                .map_err(RetryError::from_http)?;
            if !response.status().is_success() {
                return Err(RetryError::from_status(response.status()));
            }
            response.text().await.map_err(RetryError::from_http)
        },
        retry,
    )
    .await?;

    let forecast = parse_forecast(&body)?;
    log::info!("Wind forecast holds {} hourly samples", forecast.len());
    Ok(forecast)
}

/// Parse an Open-Meteo hourly response body.
pub fn parse_forecast(body: &str) -> Result<WindForecast, SourceError> {
    let response: ForecastResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;
    let hourly = response.hourly;

    if hourly.wind_speed_10m.len() != hourly.time.len()
        || hourly.wind_direction_10m.len() != hourly.time.len()
    {
        return Err(SourceError::Parse(format!(
            "hourly arrays differ in length: {} times, {} speeds, {} directions",
            hourly.time.len(),
            hourly.wind_speed_10m.len(),
            hourly.wind_direction_10m.len()
        )));
    }

    let mut forecast = WindForecast::new();
    let rows = hourly
        .time
        .iter()
        .zip(hourly.wind_speed_10m)
        .zip(hourly.wind_direction_10m);
    for ((time, speed), direction) in rows {
        let time = NaiveDateTime::parse_from_str(time, TIME_FORMAT)
            .map_err(|_| InputError::Timestamp(time.clone()))?;
        let (speed, direction) = match (speed, direction) {
            (Some(speed), Some(direction)) => (speed, direction),
            _ => {
                log::debug!("Skipping {} with missing wind values", time);
                continue;
            }
        };
        let sample = WindSample::new(time, speed, normalize_direction(direction)?)?;
        forecast.insert(time, sample);
    }
    Ok(forecast)
}

/// Round to whole degrees, folding 360 onto north.
fn normalize_direction(raw: f64) -> Result<u16, InputError> {
    let degrees = raw.round();
    if !degrees.is_finite() || !(0.0..=360.0).contains(&degrees) {
        return Err(InputError::Direction(degrees as i32));
    }
    Ok(degrees as u16 % 360)
}
