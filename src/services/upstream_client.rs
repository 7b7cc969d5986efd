//! Shared HTTP client for the upstream place-search and weather providers.
//!
//! Every outbound call goes through [`UpstreamClient::get`], which:
//! - applies the configured connect and request timeouts
//! - sends the fixed identifying `User-Agent`
//! - classifies failures as status, transport, or timeout errors
//! - records per-destination Prometheus metrics
//!
//! Calls are never retried; the first failure is returned to the caller.

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use url::Url;

/// Configuration for the upstream HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamClientConfig {
    /// Timeout for a whole request, including reading the body (in seconds)
    pub request_timeout_seconds: u64,

    /// Connection timeout (in seconds)
    pub connect_timeout_seconds: u64,

    /// `User-Agent` header sent to every upstream
    pub user_agent: String,

    /// Log every completed call at info level
    pub enable_detailed_logging: bool,
}

impl Default for UpstreamClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 10,
            connect_timeout_seconds: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            enable_detailed_logging: true,
        }
    }
}

/// Identifying client header expected by the place-search provider
pub const DEFAULT_USER_AGENT: &str = "WeatherAgent/1.0";

/// Metrics for upstream HTTP calls
#[derive(Clone)]
pub struct UpstreamClientMetrics {
    /// Requests by destination host and outcome
    pub http_requests_total: CounterVec,

    /// Request duration by destination host
    pub http_request_duration_seconds: HistogramVec,

    /// Timeouts by destination host
    pub timeouts_total: CounterVec,
}

impl UpstreamClientMetrics {
    /// Create the collectors and register them in `registry`
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let http_requests_total = CounterVec::new(
            Opts::new(
                "upstream_http_requests_total",
                "Total upstream HTTP requests by destination and outcome",
            ),
            &["destination", "outcome"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "upstream_http_request_duration_seconds",
                "Duration of upstream HTTP requests",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["destination"],
        )?;

        let timeouts_total = CounterVec::new(
            Opts::new(
                "upstream_http_timeouts_total",
                "Total upstream HTTP timeouts by destination",
            ),
            &["destination"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(timeouts_total.clone()))?;

        Ok(Self {
            http_requests_total,
            http_request_duration_seconds,
            timeouts_total,
        })
    }
}

/// Errors returned by upstream calls
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("upstream request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode upstream payload: {0}")]
    Decode(String),
}

impl UpstreamError {
    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Status(_) => "status",
            UpstreamError::Timeout => "timeout",
            UpstreamError::Transport(_) => "network_error",
            UpstreamError::Decode(_) => "decode_error",
        }
    }
}

/// HTTP client shared by all upstream collaborators.
///
/// Cheap to clone; clones share the connection pool and metrics.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    config: UpstreamClientConfig,
    metrics: Option<UpstreamClientMetrics>,
}

impl UpstreamClient {
    /// Create a new upstream client
    pub fn new(
        config: UpstreamClientConfig,
        metrics: Option<UpstreamClientMetrics>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            config,
            metrics,
        })
    }

    /// Issue a GET request and decode its JSON body into `T`.
    ///
    /// Transport failures, including ones while the body is read, surface as
    /// [`UpstreamError::Transport`] or [`UpstreamError::Timeout`]; only a body
    /// that arrived whole but does not parse is [`UpstreamError::Decode`].
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, UpstreamError> {
        let body = self.get(url).await?;
        serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }

    /// Issue a GET request and return the full body if its status is a success.
    ///
    /// The request timeout covers both sending the request and reading the body.
    pub async fn get(&self, url: &Url) -> Result<Vec<u8>, UpstreamError> {
        let destination = extract_destination(url);
        let timeout = Duration::from_secs(self.config.request_timeout_seconds);
        let start = Instant::now();

        let result = tokio::time::timeout(timeout, self.fetch(url))
            .await
            .unwrap_or(Err(UpstreamError::Timeout));

        let duration = start.elapsed();
        // only host and path are logged
        let path = url.path();

        match &result {
            Ok(body) => {
                if self.config.enable_detailed_logging {
                    info!(
                        destination = %destination,
                        path = %path,
                        bytes = body.len(),
                        duration_ms = duration.as_millis(),
                        "Upstream request completed"
                    );
                }
                self.record(&destination, "success", duration);
            }
            Err(err) => {
                warn!(
                    destination = %destination,
                    path = %path,
                    error_kind = err.kind(),
                    error = %err,
                    duration_ms = duration.as_millis(),
                    "Upstream request failed"
                );
                self.record(&destination, err.kind(), duration);
                if matches!(err, UpstreamError::Timeout) {
                    self.record_timeout(&destination);
                }
            }
        }

        result
    }

    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, UpstreamError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(classify_transport)?;
        Ok(body.to_vec())
    }

    fn record(&self, destination: &str, outcome: &str, duration: Duration) {
        if let Some(metrics) = &self.metrics {
            metrics
                .http_requests_total
                .with_label_values(&[destination, outcome])
                .inc();
            metrics
                .http_request_duration_seconds
                .with_label_values(&[destination])
                .observe(duration.as_secs_f64());
        }
    }

    fn record_timeout(&self, destination: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.timeouts_total.with_label_values(&[destination]).inc();
        }
    }
}

/// Split reqwest failures into timeouts and other transport errors.
///
/// The URL is dropped from the error: it may carry the weather API key.
fn classify_transport(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Transport(err.without_url())
    }
}

/// Destination label (host) for metrics and logs
fn extract_destination(url: &Url) -> String {
    url.host_str().unwrap_or("unknown").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_config_defaults() {
        let config = UpstreamClientConfig::default();
        assert_eq!(config.request_timeout_seconds, 10);
        assert_eq!(config.connect_timeout_seconds, 3);
        assert_eq!(config.user_agent, "WeatherAgent/1.0");
        assert!(config.enable_detailed_logging);
    }

    #[test]
    fn test_extract_destination() {
        let url = Url::parse("https://api.example.com/path?appid=secret").unwrap();
        assert_eq!(extract_destination(&url), "api.example.com");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(UpstreamError::Status(503).kind(), "status");
        assert_eq!(UpstreamError::Timeout.kind(), "timeout");
        assert_eq!(UpstreamError::Decode("x".into()).kind(), "decode_error");
    }

    #[tokio::test]
    async fn test_get_sends_user_agent_and_records_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .and(header("User-Agent", "WeatherAgent/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let registry = Registry::new();
        let metrics = UpstreamClientMetrics::new(&registry).unwrap();
        let client =
            UpstreamClient::new(UpstreamClientConfig::default(), Some(metrics.clone())).unwrap();

        let url = Url::parse(&format!("{}/ok", mock_server.uri())).unwrap();
        let body = client.get(&url).await.unwrap();
        assert_eq!(body, b"[]");

        let destination = extract_destination(&url);
        assert_eq!(
            metrics
                .http_requests_total
                .with_label_values(&[destination.as_str(), "success"])
                .get(),
            1.0
        );
    }

    #[tokio::test]
    async fn test_get_classifies_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = UpstreamClient::new(UpstreamClientConfig::default(), None).unwrap();
        let url = Url::parse(&format!("{}/down", mock_server.uri())).unwrap();

        let err = client.get(&url).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status(503)));
    }

    #[tokio::test]
    async fn test_get_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&mock_server)
            .await;

        let config = UpstreamClientConfig {
            request_timeout_seconds: 1,
            ..UpstreamClientConfig::default()
        };
        let client = UpstreamClient::new(config, None).unwrap();
        let url = Url::parse(&format!("{}/slow", mock_server.uri())).unwrap();

        let err = client.get(&url).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Timeout));
    }

    /// Raw server that answers `200` with a body shorter than its
    /// `Content-Length`, then either closes or goes silent.
    async fn short_body_server(stall: Option<Duration>) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                          content-length: 1000\r\n\r\n[{\"id",
                    )
                    .await;
                if let Some(stall) = stall {
                    tokio::time::sleep(stall).await;
                }
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}/places")
    }

    #[tokio::test]
    async fn test_connection_closed_mid_body_is_transport_error() {
        let registry = Registry::new();
        let metrics = UpstreamClientMetrics::new(&registry).unwrap();
        let client =
            UpstreamClient::new(UpstreamClientConfig::default(), Some(metrics.clone())).unwrap();
        let url = Url::parse(&short_body_server(None).await).unwrap();

        let err = client.get_json::<serde_json::Value>(&url).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Transport(_)), "got {err:?}");
        assert_eq!(
            metrics
                .http_requests_total
                .with_label_values(&["127.0.0.1", "network_error"])
                .get(),
            1.0
        );
    }

    #[tokio::test]
    async fn test_stalled_body_times_out() {
        let registry = Registry::new();
        let metrics = UpstreamClientMetrics::new(&registry).unwrap();
        let config = UpstreamClientConfig {
            request_timeout_seconds: 1,
            ..UpstreamClientConfig::default()
        };
        let client = UpstreamClient::new(config, Some(metrics.clone())).unwrap();
        let url = Url::parse(&short_body_server(Some(Duration::from_secs(5))).await).unwrap();

        let err = client.get(&url).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Timeout), "got {err:?}");
        assert_eq!(
            metrics.timeouts_total.with_label_values(&["127.0.0.1"]).get(),
            1.0
        );
    }

    #[tokio::test]
    async fn test_get_json_decode_error_only_for_complete_bodies() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&mock_server)
            .await;

        let client = UpstreamClient::new(UpstreamClientConfig::default(), None).unwrap();
        let url = Url::parse(&format!("{}/html", mock_server.uri())).unwrap();

        let err = client.get_json::<serde_json::Value>(&url).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
    }
}
