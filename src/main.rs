use actix_web::{HttpServer, web};
use mx_forecast_api::{
    AppMetrics, ForecastAggregator, ForecastConfig, LoggingConfig, ServerConfig, UpstreamClient,
    UpstreamClientConfig, create_base_app, init_tracing,
};
use std::io;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing(&LoggingConfig::from_env());

    // A missing API key stops startup before the port is bound
    let forecast_config = ForecastConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid forecast configuration");
        io::Error::other(e)
    })?;

    let metrics = AppMetrics::new().map_err(io::Error::other)?;
    let client = UpstreamClient::new(
        UpstreamClientConfig::from_env(),
        Some(metrics.upstream.clone()),
    )
    .map_err(io::Error::other)?;
    let aggregator = ForecastAggregator::from_config(&forecast_config, client).map_err(|e| {
        error!(error = %e, "Invalid upstream endpoint");
        io::Error::other(e)
    })?;

    let metrics = web::Data::new(metrics);
    let aggregator = web::Data::new(aggregator);
    let server_config = ServerConfig::from_env();

    info!(
        bind_address = %server_config.bind_address,
        places_url = %forecast_config.places_url,
        country_label = %forecast_config.country_label,
        weather_fetch_concurrency = forecast_config.weather_fetch_concurrency,
        "Server starting"
    );

    HttpServer::new(move || create_base_app(aggregator.clone(), metrics.clone()))
        .bind(&server_config.bind_address)?
        .run()
        .await
}
