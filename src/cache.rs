//! # Time-Boxed Fetch Cache
//!
//! Wraps any [`ForecastSource`] so repeated reports within the TTL reuse the
//! last successful answer instead of hitting the upstream sites again.
//!
//! - **Wind**: one entry, the whole forecast window
//! - **Tides**: one entry per requested date
//! - **Failures**: never cached, the next call tries again
//!
//! Entries live in memory only and disappear with the process.

use crate::source::{ForecastSource, SourceError};
use crate::{TideEvent, WindForecast};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Cache-with-TTL decorator around a forecast source.
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    wind: Mutex<Option<(Instant, WindForecast)>>,
    tides: Mutex<HashMap<NaiveDate, (Instant, Vec<TideEvent>)>>,
}

impl<S: ForecastSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        CachedSource {
            inner,
            ttl,
            wind: Mutex::new(None),
            tides: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn fresh(&self, stored: Instant) -> bool {
        stored.elapsed() < self.ttl
    }
}

impl<S: ForecastSource> ForecastSource for CachedSource<S> {
    async fn wind_forecast(&self) -> Result<WindForecast, SourceError> {
        if let Ok(guard) = self.wind.lock() {
            if let Some((stored, forecast)) = guard.as_ref() {
                if self.fresh(*stored) {
                    log::debug!("Wind forecast served from cache");
                    return Ok(forecast.clone());
                }
            }
        }

        let forecast = self.inner.wind_forecast().await?;
        if let Ok(mut guard) = self.wind.lock() {
            *guard = Some((Instant::now(), forecast.clone()));
        }
        Ok(forecast)
    }

    async fn tide_events(&self, date: NaiveDate) -> Result<Vec<TideEvent>, SourceError> {
        if let Ok(guard) = self.tides.lock() {
            if let Some((stored, events)) = guard.get(&date) {
                if self.fresh(*stored) {
                    log::debug!("Current table for {} served from cache", date);
                    return Ok(events.clone());
                }
            }
        }

        let events = self.inner.tide_events(date).await?;
        if let Ok(mut guard) = self.tides.lock() {
            guard.insert(date, (Instant::now(), events.clone()));
        }
        Ok(events)
    }
}
