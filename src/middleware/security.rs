//! Security headers middleware.

use crate::config::SecurityHeadersConfig;
use actix_web::middleware::DefaultHeaders;

/// Middleware adding the configured security headers to every response.
///
/// Headers a handler already set are left as they are.
pub fn security_headers(config: &SecurityHeadersConfig) -> DefaultHeaders {
    config
        .headers()
        .into_iter()
        .fold(DefaultHeaders::new(), |headers, pair| headers.add(pair))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn test_headers_added_without_overriding_handler() {
        let config = SecurityHeadersConfig {
            hsts_enabled: false,
            ..SecurityHeadersConfig::default()
        };
        let app = test::init_service(
            App::new().wrap(security_headers(&config)).route(
                "/framed",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .insert_header(("x-frame-options", "SAMEORIGIN"))
                        .finish()
                }),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/framed").to_request();
        let resp = test::call_service(&app, req).await;
        let headers = resp.headers();

        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
        assert_eq!(headers.get("x-frame-options").unwrap(), "SAMEORIGIN");
        assert_eq!(headers.get("referrer-policy").unwrap(), "no-referrer");
        assert!(!headers.contains_key("strict-transport-security"));
    }
}
