//! Route pattern extraction utilities.

use actix_web::HttpRequest;

/// Label used for requests that match no registered resource
pub const UNMATCHED_ROUTE: &str = "/unknown";

/// Registered resource pattern the request matches, e.g. `/weather/{city}`.
///
/// Using the pattern instead of the raw path keeps one metrics series per
/// endpoint no matter which city is requested.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}
