//! Middleware wrapped around every route: request IDs, security headers,
//! and request metrics.

pub mod metrics;
pub mod request_id;
pub mod security;

pub use metrics::track_request_metrics;
pub use request_id::*;
pub use security::security_headers;
