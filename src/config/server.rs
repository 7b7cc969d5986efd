//! HTTP server configuration.

use std::{env, path::Path};

/// Listen address outside containers
pub const LOCAL_BIND_ADDRESS: &str = "127.0.0.1:8080";

/// Listen address inside Docker or Kubernetes
pub const CONTAINER_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Configuration for the HTTP listener
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl ServerConfig {
    /// Load configuration from the environment.
    ///
    /// `BIND_ADDRESS` wins; otherwise the address depends on whether the
    /// process runs in a container.
    pub fn from_env() -> Self {
        let in_container = is_container_environment(
            env::var("KUBERNETES_SERVICE_HOST").ok().as_deref(),
            env::var("DOCKER_CONTAINER").ok().as_deref(),
            Path::new("/.dockerenv").exists(),
        );

        Self {
            bind_address: resolve_bind_address(env::var("BIND_ADDRESS").ok(), in_container),
        }
    }
}

fn is_container_environment(
    k8s_service_host: Option<&str>,
    docker_container: Option<&str>,
    dockerenv_exists: bool,
) -> bool {
    k8s_service_host.is_some() || docker_container.is_some() || dockerenv_exists
}

fn resolve_bind_address(bind_override: Option<String>, in_container: bool) -> String {
    match bind_override.filter(|b| !b.trim().is_empty()) {
        Some(bind) => bind,
        None if in_container => CONTAINER_BIND_ADDRESS.to_string(),
        None => LOCAL_BIND_ADDRESS.to_string(),
    }
}
