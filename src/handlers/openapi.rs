//! OpenAPI specification generation and app factory.

use crate::{
    config::{MetricsConfig, SecurityHeadersConfig},
    handlers::{get_metrics, health, version, weather},
    middleware::{RequestIdMiddleware, security_headers, track_request_metrics},
    services::{AppMetrics, ForecastAggregator},
};
use actix_web::{App, HttpResponse, middleware::from_fn};
use paperclip::actix::{OpenApiExt, api_v2_operation, web};
use paperclip::v2::models::{DefaultApiRaw, Info};

/// Path the OpenAPI v2 document is served at
pub const SPEC_PATH: &str = "/api/spec/v2";

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Mexico City Forecast API - OpenAPI Spec</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 0; background: #f5f5f5; color: #333; }
        .container { max-width: 800px; margin: 40px auto; padding: 20px; background: #fff;
                     box-shadow: 0 2px 8px rgba(0,0,0,0.1); border-radius: 8px; }
        h1 { text-align: center; }
        pre { background: #eee; padding: 20px; border-radius: 4px; overflow-x: auto; }
    </style>
</head>
<body>
    <div class="container">
        <h1>Mexico City Forecast API</h1>
        <p>Try <code>GET /weather/monterrey</code>.</p>
        <pre id="openapi">Loading...</pre>
    </div>
    <script>
        fetch('/api/spec/v2')
            .then(response => response.json())
            .then(data => {
                document.getElementById('openapi').textContent = JSON.stringify(data, null, 2);
            })
            .catch(error => {
                document.getElementById('openapi').textContent = 'Error loading spec: ' + error;
            });
    </script>
</body>
</html>"#;

/// Landing page rendering the OpenAPI document
#[api_v2_operation(
    summary = "API Landing Page",
    description = "Returns an HTML page that renders the OpenAPI specification.",
    tags("Docs"),
    responses(
        (status = 200, description = "Successful response", content_type = "text/html")
    )
)]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

/// Creates the shared OpenAPI specification for the API
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Mexico City Forecast API".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "Daily temperature forecasts for cities in Mexico.\n\n\
                ## Forecast lookup\n\
                `GET /weather/{city}` searches the place directory for `city`, keeps the results \
                that are cities in Mexico, and returns the daily minimum and maximum temperature \
                (Celsius) of each one, dated `dd-mm-yyyy`.\n\
                \n\
                **Errors** carry a `detail` field:\n\
                - `400` when the city name is shorter than 3 characters\n\
                - `500` with `Error fetching city data (n)` when the place search fails\n\
                - `500` with `Error fetching weather data (n)` when any forecast lookup fails; \
                no partial results are returned\n\
                \n\
                Every response carries an `X-Request-ID` header; send one to correlate logs."
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Creates the app with every route and the shared middleware stack
///
/// This factory wires:
/// - the forecast, health, version, and metrics endpoints
/// - the OpenAPI specification and its landing page
/// - security headers, request IDs, and request metrics
///
/// `main` calls it once per worker; tests call it with mock upstreams.
pub fn create_base_app(
    aggregator: web::Data<ForecastAggregator>,
    metrics: web::Data<AppMetrics>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let security_config = SecurityHeadersConfig::from_env();
    let metrics_config = MetricsConfig::from_env();

    App::new()
        .wrap(security_headers(&security_config))
        .wrap(RequestIdMiddleware)
        .wrap(from_fn(track_request_metrics))
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(aggregator)
        .app_data(metrics)
        .app_data(web::Data::new(metrics_config))
        .service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/weather/{city}").route(web::get().to(weather)))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .with_json_spec_at(SPEC_PATH)
        .build()
}
