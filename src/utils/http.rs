//! HTTP utility functions for extracting request information.

use actix_web::HttpRequest;

/// Proxy headers carrying the original client address, in order of preference
const CLIENT_IP_HEADERS: [&str; 3] = ["X-Forwarded-For", "X-Real-IP", "CF-Connecting-IP"];

/// Extract client IP address from request headers
///
/// Proxy headers are preferred (first hop of `X-Forwarded-For`, then
/// `X-Real-IP`, `CF-Connecting-IP`, then the `for=` parameter of `Forwarded`),
/// falling back to the connection peer address.
pub fn extract_client_ip(req: &HttpRequest) -> String {
    let from_proxy = CLIENT_IP_HEADERS
        .iter()
        .filter_map(|name| header_str(req, name))
        .filter_map(|value| value.split(',').next())
        .map(str::trim)
        .find(|ip| !ip.is_empty())
        .or_else(|| header_str(req, "Forwarded").and_then(forwarded_for));

    match from_proxy {
        Some(ip) => ip.to_string(),
        None => req
            .connection_info()
            .peer_addr()
            .unwrap_or("unknown")
            .to_string(),
    }
}

fn header_str<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|h| h.to_str().ok())
}

/// First `for=` value of an RFC 7239 `Forwarded` header
fn forwarded_for(value: &str) -> Option<&str> {
    value
        .split([';', ','])
        .map(str::trim)
        .find_map(|pair| {
            let (key, ip) = pair.split_once('=')?;
            key.eq_ignore_ascii_case("for").then(|| ip.trim_matches('"'))
        })
        .filter(|ip| !ip.is_empty())
}

/// Extract user agent from request headers
pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}
