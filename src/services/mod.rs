//! Business logic and service layer modules.
//!
//! The forecast aggregator and its two upstream collaborators (place search
//! and weather), the shared upstream HTTP client, and metrics collection.

pub mod forecast;
pub mod metrics;
pub mod places;
pub mod upstream_client;
pub mod weather;

pub use forecast::*;
pub use metrics::*;
pub use places::{MEXICO_COUNTRY_LABEL, PlaceCandidate, PlaceResolver, ReservamosPlaces};
pub use upstream_client::{
    UpstreamClient, UpstreamClientConfig, UpstreamClientMetrics, UpstreamError,
};
pub use weather::{DailyEntry, OpenWeatherProvider, WeatherProvider, format_forecast_date};
