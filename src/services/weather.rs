//! Weather provider collaborator: daily forecasts from the OpenWeatherMap one-call API.

use crate::{
    models::DayForecast,
    services::upstream_client::{UpstreamClient, UpstreamError},
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone};
use serde::Deserialize;
use std::fmt;
use url::Url;

/// Default OpenWeatherMap API base URL
pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Granularities the one-call API should leave out of the response
const EXCLUDED_PARTS: &str = "current,minutely,hourly";

/// Output format of [`DayForecast::date`]
const DATE_FORMAT: &str = "%d-%m-%Y";

/// One-call API response; only the daily block is requested
#[derive(Debug, Deserialize)]
struct OneCallResponse {
    daily: Vec<DailyEntry>,
}

/// One day of the provider's daily forecast
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyEntry {
    /// Unix timestamp (UTC) of the forecast day
    pub dt: i64,
    pub temp: DailyTemperature,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyTemperature {
    pub max: f64,
    pub min: f64,
}

impl DailyEntry {
    /// Map to the client-facing record, dating it in `tz`
    pub fn to_day_forecast<Tz>(&self, tz: &Tz) -> Result<DayForecast, UpstreamError>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let date = format_forecast_date(self.dt, tz)
            .ok_or_else(|| UpstreamError::Decode(format!("timestamp out of range: {}", self.dt)))?;

        Ok(DayForecast {
            temp_max: self.temp.max,
            temp_min: self.temp.min,
            date,
        })
    }
}

/// Format a Unix timestamp as the `dd-mm-yyyy` calendar date it falls on in `tz`.
///
/// Returns `None` for timestamps chrono cannot represent.
pub fn format_forecast_date<Tz>(timestamp: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    DateTime::from_timestamp(timestamp, 0)
        .map(|utc| utc.with_timezone(tz).format(DATE_FORMAT).to_string())
}

/// Provides daily forecasts for a coordinate
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Daily forecast entries for `(lat, lon)` in provider order
    async fn daily_forecast(&self, lat: f64, lon: f64) -> Result<Vec<DailyEntry>, UpstreamError>;
}

/// [`WeatherProvider`] backed by the OpenWeatherMap one-call API
pub struct OpenWeatherProvider {
    client: UpstreamClient,
    endpoint: Url,
    api_key: String,
}

impl OpenWeatherProvider {
    /// Create a provider for `base_url` (e.g. `https://api.openweathermap.org/data/2.5`)
    pub fn new(
        client: UpstreamClient,
        base_url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(&format!("{}/onecall", base_url.trim_end_matches('/')))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    fn forecast_url(&self, lat: f64, lon: f64) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lon.to_string())
            .append_pair("exclude", EXCLUDED_PARTS)
            .append_pair("units", "metric")
            .append_pair("appid", &self.api_key);
        url
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn daily_forecast(&self, lat: f64, lon: f64) -> Result<Vec<DailyEntry>, UpstreamError> {
        let forecast: OneCallResponse = self.client.get_json(&self.forecast_url(lat, lon)).await?;

        Ok(forecast.daily)
    }
}
