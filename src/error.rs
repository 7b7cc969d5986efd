//! Error types for the forecast service and their HTTP mapping.

use crate::{models::ErrorResponse, services::upstream_client::UpstreamError};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

/// Message returned when the requested city name is too short
pub const CITY_TOO_SHORT: &str = "City name too short. Must be 3 characters or more (10)";

/// Pipeline stage at which an upstream call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStage {
    PlaceResolution,
    WeatherFetch,
}

impl UpstreamStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamStage::PlaceResolution => "place-resolution",
            UpstreamStage::WeatherFetch => "weather-fetch",
        }
    }
}

impl fmt::Display for UpstreamStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by [`crate::services::ForecastAggregator`]
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    /// The request was rejected before any upstream call
    #[error("validation error: {message}")]
    Validation { message: String },

    /// An upstream call failed; the whole request is aborted
    #[error("{stage} failed: {source}")]
    Upstream {
        stage: UpstreamStage,
        #[source]
        source: UpstreamError,
    },
}

impl ForecastError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn upstream(stage: UpstreamStage, source: UpstreamError) -> Self {
        Self::Upstream { stage, source }
    }

    /// Client-facing description.
    ///
    /// Each upstream failure point has its own numbered message so responses
    /// and logs can tell them apart without exposing upstream payloads.
    pub fn detail(&self) -> String {
        match self {
            ForecastError::Validation { message } => message.clone(),
            ForecastError::Upstream { stage, source } => {
                let code = match (stage, source) {
                    (UpstreamStage::PlaceResolution, UpstreamError::Status(_)) => 1,
                    (UpstreamStage::PlaceResolution, UpstreamError::Decode(_)) => 5,
                    (UpstreamStage::PlaceResolution, _) => 2,
                    (UpstreamStage::WeatherFetch, UpstreamError::Status(_)) => 3,
                    (UpstreamStage::WeatherFetch, UpstreamError::Decode(_)) => 6,
                    (UpstreamStage::WeatherFetch, _) => 4,
                };
                match stage {
                    UpstreamStage::PlaceResolution => format!("Error fetching city data ({code})"),
                    UpstreamStage::WeatherFetch => format!("Error fetching weather data ({code})"),
                }
            }
        }
    }
}

impl ResponseError for ForecastError {
    fn status_code(&self) -> StatusCode {
        match self {
            ForecastError::Validation { .. } => StatusCode::BAD_REQUEST,
            ForecastError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            detail: self.detail(),
        })
    }
}

/// Errors raised while loading configuration at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ERROR: No weather api key found. Please provide one in the {0} environment variable.")]
    MissingVar(&'static str),

    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}
