//! Mexico City Forecast API - daily forecasts for Mexican cities
//!
//! An Actix Web + Paperclip service that answers `GET /weather/{city}` by:
//! - searching a place directory for the city name
//! - keeping only the results that are cities in Mexico
//! - fetching a daily forecast for each of them concurrently
//! - returning `{id, slug, state, lat, long, weather}` records in search order
//!
//! Around that sit health and version endpoints, Prometheus metrics,
//! security headers, request IDs, structured logging and an OpenAPI document.
//!
//! ## Architecture
//!
//! - `models/` - Response bodies and forecast records
//! - `handlers/` - HTTP request handlers and the app factory
//! - `middleware/` - Security headers, request IDs and request metrics
//! - `services/` - Forecast aggregation, upstream providers and metrics
//! - `utils/` - Client identification and route extraction
//! - `config/` - Environment-driven configuration
//! - `error` - Error types and their HTTP mapping
//! - `telemetry` - Tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```no_run
//! use actix_web::{HttpServer, web};
//! use mx_forecast_api::{
//!     AppMetrics, ForecastAggregator, ForecastConfig, UpstreamClient, UpstreamClientConfig,
//!     create_base_app,
//! };
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = ForecastConfig::with_api_key("my-key");
//!     let metrics = web::Data::new(AppMetrics::new().map_err(std::io::Error::other)?);
//!     let client = UpstreamClient::new(UpstreamClientConfig::default(), None)
//!         .map_err(std::io::Error::other)?;
//!     let aggregator = web::Data::new(
//!         ForecastAggregator::from_config(&config, client).map_err(std::io::Error::other)?,
//!     );
//!
//!     HttpServer::new(move || create_base_app(aggregator.clone(), metrics.clone()))
//!         .bind("127.0.0.1:8080")?
//!         .run()
//!         .await
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;

pub use config::{
    ForecastConfig, LoggingConfig, MetricsConfig, SecurityHeadersConfig, ServerConfig,
};
pub use error::{ConfigError, ForecastError, UpstreamStage};
pub use handlers::{
    create_base_app, create_openapi_spec, get_metrics, health, index, version, weather,
};
pub use middleware::{RequestIdMiddleware, security_headers, track_request_metrics};
pub use models::{CityForecast, DayForecast, ErrorResponse, HealthResponse, VersionResponse};
pub use services::{
    AppMetrics, ForecastAggregator, OpenWeatherProvider, PlaceResolver, ReservamosPlaces,
    UpstreamClient, UpstreamClientConfig, UpstreamClientMetrics, UpstreamError, WeatherProvider,
};
pub use telemetry::init_tracing;
pub use utils::{extract_client_ip, extract_route_pattern, extract_user_agent};
