//! Retry with exponential backoff for upstream fetches.

use crate::config::NetworkConfig;
use crate::source::SourceError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Distinguishes retryable from non-retryable failures.
#[derive(Debug)]
pub enum RetryError {
    /// Timeouts, connection failures, server errors
    Retryable(SourceError),
    /// Client errors and payloads that will not parse on a second try
    NonRetryable(SourceError),
}

impl RetryError {
    /// Sort an HTTP failure into retryable or not.
    pub fn from_http(err: reqwest::Error) -> Self {
        let server_side = err.status().is_some_and(|s| s.is_server_error());
        if err.is_timeout() || err.is_connect() || server_side {
            RetryError::Retryable(SourceError::Http(err))
        } else {
            RetryError::NonRetryable(SourceError::Http(err))
        }
    }

    /// Sort an unexpected status code into retryable or not.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        let err = SourceError::Status(status.as_u16());
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            RetryError::Retryable(err)
        } else {
            RetryError::NonRetryable(err)
        }
    }
}

/// Maximum jitter as a fraction of the delay, i.e. ±25%.
pub const JITTER_FACTOR: f64 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    pub max_retries: u32,
    /// Base delay for exponential backoff.
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_retries: 3,
            base_delay_ms: 500,
        }
    }
}

impl From<&NetworkConfig> for RetryConfig {
    fn from(network: &NetworkConfig) -> Self {
        RetryConfig {
            max_retries: network.max_retries.max(1),
            base_delay_ms: network.base_delay_ms,
        }
    }
}

pub async fn with_retry<F, Fut, T>(func: F, config: &RetryConfig) -> Result<T, SourceError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, RetryError>>,
{
    let attempts = config.max_retries.max(1);
    let mut attempt = 0;
    loop {
        match func().await {
            Ok(result) => return Ok(result),
            Err(RetryError::NonRetryable(err)) => return Err(err),
            Err(RetryError::Retryable(err)) => {
                attempt += 1;
                log::warn!("Retryable error: {}", err);
                if attempt >= attempts {
                    return Err(SourceError::RetriesExhausted {
                        attempts,
                        last: Box::new(err),
                    });
                }
                let delay = backoff_with_jitter(attempt - 1, config);
                log::warn!("Retry attempt {}/{} after {:?}", attempt + 1, attempts, delay);
                sleep(delay).await;
            }
        }
    }
}

/// Calculate backoff delay with jitter for a given attempt.
///
/// Uses exponential backoff: base_delay * 2^attempt, with random jitter of
/// ±[`JITTER_FACTOR`] on top.
fn backoff_with_jitter(attempt: u32, config: &RetryConfig) -> Duration {
    let base_delay = config.base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    let jitter_range = (base_delay as f64 * JITTER_FACTOR) as u64;
    let jitter = rand::rng().random_range(0..=jitter_range * 2) as i64 - jitter_range as i64;
    let delay_ms = (base_delay as i64 + jitter).max(0) as u64;
    Duration::from_millis(delay_ms)
}
