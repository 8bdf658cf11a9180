//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! seat-config.toml file. It covers the fishing ground location, the hours the
//! report spans and the politeness settings for the two upstream sites.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "seat-config.toml";

/// Application configuration loaded from seat-config.toml
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Fishing ground and upstream identifiers
    pub location: LocationConfig,
    /// Which hours the daily report covers
    pub report: ReportConfig,
    /// Timeouts, retries and caching for upstream fetches
    pub network: NetworkConfig,
}

/// Fishing ground configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocationConfig {
    /// Human-readable name for the report header
    pub name: String,
    /// Latitude sent to the wind forecast API
    pub latitude: f64,
    /// Longitude sent to the wind forecast API
    pub longitude: f64,
    /// IANA timezone the forecast hours are expressed in
    pub timezone: String,
    /// Area code on the current-table site
    pub tide_area: u32,
    /// Location key on the current-table site
    pub tide_location: String,
}

/// Report window configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    /// First hour of the report (inclusive)
    pub first_hour: u32,
    /// Last hour of the report (inclusive)
    pub last_hour: u32,
    /// Days of wind forecast to request, starting today
    pub forecast_days: u32,
}

/// Upstream fetch configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Wind forecast request timeout in seconds
    pub wind_timeout_secs: u64,
    /// Current-table page request timeout in seconds
    pub tide_timeout_secs: u64,
    /// How long fetched data stays fresh, in minutes
    pub cache_ttl_minutes: u64,
    /// Attempts per fetch before giving up
    pub max_retries: u32,
    /// Base delay for exponential backoff in milliseconds
    pub base_delay_ms: u64,
    /// User-Agent sent to the current-table site
    pub user_agent: String,
}

impl NetworkConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_minutes * 60)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            location: LocationConfig {
                name: "Akashi Strait".to_string(),
                latitude: 34.61,
                longitude: 135.02,
                timezone: "Asia/Tokyo".to_string(),
                tide_area: 28,
                tide_location: "akashi".to_string(),
            },
            report: ReportConfig {
                first_hour: 5,
                last_hour: 13,
                forecast_days: 8,
            },
            network: NetworkConfig {
                wind_timeout_secs: 5,
                tide_timeout_secs: 3,
                cache_ttl_minutes: 60,
                max_retries: 3,
                base_delay_ms: 500,
                user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X)".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from seat-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    log::info!("Loaded configuration for {}", config.location.name);
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config file format in {}: {}", path.display(), e);
                    log::warn!("Using default configuration (Akashi Strait)");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config file at {}, using default configuration", path.display());
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        log::info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Save current configuration to seat-config.toml
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(CONFIG_FILE)
    }
}
