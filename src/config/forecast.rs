//! Forecast aggregator configuration.

use crate::{
    error::ConfigError,
    services::{
        places::{DEFAULT_PLACES_URL, MEXICO_COUNTRY_LABEL},
        weather::DEFAULT_OPENWEATHER_BASE_URL,
    },
};
use std::env;

/// Environment variable holding the weather provider key
pub const WEATHER_API_KEY_VAR: &str = "WEATHER_API_KEY";

/// Parallel weather fetches per request when not configured
pub const DEFAULT_WEATHER_FETCH_CONCURRENCY: usize = 4;

/// Configuration injected into [`crate::services::ForecastAggregator`]
#[derive(Clone)]
pub struct ForecastConfig {
    /// OpenWeatherMap API key
    pub weather_api_key: String,
    /// Place search endpoint (queried with `?q=<city>`)
    pub places_url: String,
    /// OpenWeatherMap base URL; `/onecall` is appended
    pub weather_base_url: String,
    /// Exact country label a candidate must carry to be kept
    pub country_label: String,
    /// Upper bound on concurrent weather fetches within one request
    pub weather_fetch_concurrency: usize,
}

impl std::fmt::Debug for ForecastConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastConfig")
            .field("weather_api_key", &"[REDACTED]")
            .field("places_url", &self.places_url)
            .field("weather_base_url", &self.weather_base_url)
            .field("country_label", &self.country_label)
            .field("weather_fetch_concurrency", &self.weather_fetch_concurrency)
            .finish()
    }
}

impl ForecastConfig {
    /// Default endpoints and filter with the given API key
    pub fn with_api_key(weather_api_key: impl Into<String>) -> Self {
        Self {
            weather_api_key: weather_api_key.into(),
            places_url: DEFAULT_PLACES_URL.to_string(),
            weather_base_url: DEFAULT_OPENWEATHER_BASE_URL.to_string(),
            country_label: MEXICO_COUNTRY_LABEL.to_string(),
            weather_fetch_concurrency: DEFAULT_WEATHER_FETCH_CONCURRENCY,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `WEATHER_API_KEY` is required; everything else falls back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let weather_api_key = env::var(WEATHER_API_KEY_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar(WEATHER_API_KEY_VAR))?;

        let mut config = Self::with_api_key(weather_api_key);

        if let Ok(url) = env::var("PLACES_API_URL") {
            config.places_url = url;
        }

        if let Ok(url) = env::var("OPENWEATHER_BASE_URL") {
            config.weather_base_url = url;
        }

        if let Ok(label) = env::var("PLACES_COUNTRY_LABEL") {
            config.country_label = label;
        }

        config.weather_fetch_concurrency = env::var("WEATHER_FETCH_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v: &usize| *v > 0)
            .unwrap_or(DEFAULT_WEATHER_FETCH_CONCURRENCY);

        Ok(config)
    }
}
