//! Request metrics middleware.

use crate::{services::AppMetrics, utils::route::extract_route_pattern};
use actix_web::{
    Error,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};
use std::time::Instant;

/// Records request count and duration per method, route pattern and status.
///
/// Install with `actix_web::middleware::from_fn(track_request_metrics)`.
/// Requests are counted only when [`AppMetrics`] is registered as app data.
pub async fn track_request_metrics(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let start_time = Instant::now();
    let method = req.method().clone();

    let res = next.call(req).await?;

    if let Some(metrics) = res.request().app_data::<web::Data<AppMetrics>>() {
        let route = extract_route_pattern(res.request());
        metrics.record_request(
            method.as_str(),
            &route,
            res.status().as_u16(),
            start_time.elapsed(),
        );
        metrics.update_uptime();
    }

    Ok(res)
}
