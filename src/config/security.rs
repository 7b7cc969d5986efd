//! Security headers configuration.

use super::env_flag;
use actix_web::http::header::{HeaderName, HeaderValue};
use std::env;

/// Configuration for security headers middleware
#[derive(Clone)]
pub struct SecurityHeadersConfig {
    pub csp_enabled: bool,
    pub csp_directives: String,
    pub hsts_enabled: bool,
    pub hsts_max_age: u32,
    pub frame_options: String,
    pub content_type_options: bool,
    pub xss_protection: bool,
    pub referrer_policy: String,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            csp_enabled: true,
            csp_directives: "default-src 'none'; frame-ancestors 'none'".to_string(),
            hsts_enabled: true,
            hsts_max_age: 31536000, // 1 year
            frame_options: "DENY".to_string(),
            content_type_options: true,
            xss_protection: true,
            referrer_policy: "no-referrer".to_string(),
        }
    }
}

impl SecurityHeadersConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            csp_enabled: env_flag("SECURITY_CSP_ENABLED", defaults.csp_enabled),
            csp_directives: env::var("CSP_DIRECTIVES").unwrap_or(defaults.csp_directives),
            hsts_enabled: env_flag("HSTS_ENABLED", defaults.hsts_enabled),
            hsts_max_age: env::var("HSTS_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.hsts_max_age),
            frame_options: env::var("X_FRAME_OPTIONS").unwrap_or(defaults.frame_options),
            content_type_options: env_flag("X_CONTENT_TYPE_OPTIONS", defaults.content_type_options),
            xss_protection: env_flag("X_XSS_PROTECTION", defaults.xss_protection),
            referrer_policy: env::var("REFERRER_POLICY").unwrap_or(defaults.referrer_policy),
        }
    }

    /// Headers to add to every response.
    ///
    /// Values that are not valid header values are skipped.
    pub fn headers(&self) -> Vec<(HeaderName, HeaderValue)> {
        let mut headers = Vec::new();

        if self.content_type_options {
            headers.push((
                HeaderName::from_static("x-content-type-options"),
                HeaderValue::from_static("nosniff"),
            ));
        }

        if let Ok(value) = HeaderValue::from_str(&self.frame_options) {
            headers.push((HeaderName::from_static("x-frame-options"), value));
        }

        if self.xss_protection {
            headers.push((
                HeaderName::from_static("x-xss-protection"),
                HeaderValue::from_static("1; mode=block"),
            ));
        }

        if let Ok(value) = HeaderValue::from_str(&self.referrer_policy) {
            headers.push((HeaderName::from_static("referrer-policy"), value));
        }

        if self.csp_enabled
            && let Ok(value) = HeaderValue::from_str(&self.csp_directives)
        {
            headers.push((HeaderName::from_static("content-security-policy"), value));
        }

        if self.hsts_enabled
            && let Ok(value) = HeaderValue::from_str(&format!("max-age={}", self.hsts_max_age))
        {
            headers.push((HeaderName::from_static("strict-transport-security"), value));
        }

        headers
    }
}
