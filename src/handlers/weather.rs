//! City forecast endpoint handler.

use crate::{
    error::ForecastError,
    models::CityForecast,
    services::ForecastAggregator,
};
use actix_web::{Error, Result, web};
use paperclip::actix::api_v2_operation;

/// City forecast endpoint
///
/// Resolves `city` to Mexican cities and returns the daily min/max
/// temperature forecast of each one, in the order the place search ranked
/// them.
#[api_v2_operation(
    summary = "City Forecast Endpoint",
    description = "Get the daily temperature forecast for every city in Mexico matching the given name. Dates are formatted dd-mm-yyyy.",
    tags("Weather", "Cities"),
    responses(
        (status = 200, description = "Successful response"),
        (status = 400, description = "City name too short. Must be 3 characters or more (10)", body = ErrorResponse),
        (status = 500, description = "Error fetching city data (1, 2, 5) or weather data (3, 4, 6)", body = ErrorResponse)
    )
)]
pub async fn weather(
    aggregator: web::Data<ForecastAggregator>,
    city: web::Path<String>,
) -> Result<web::Json<Vec<CityForecast>>, Error> {
    let city = city.into_inner();

    let forecasts = aggregator.get_forecast(&city).await.map_err(|e| {
        match &e {
            ForecastError::Validation { message } => {
                tracing::debug!(city = %city, reason = %message, "Rejected forecast request");
            }
            ForecastError::Upstream { stage, source } => {
                tracing::error!(
                    city = %city,
                    stage = %stage,
                    error_kind = source.kind(),
                    error = %source,
                    detail = %e.detail(),
                    "Forecast request failed"
                );
            }
        }
        e
    })?;

    tracing::debug!(city = %city, cities = forecasts.len(), "Returning city forecasts");
    Ok(web::Json(forecasts))
}
