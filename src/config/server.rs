//! HTTP settings for the model API
//!
//! Binding address plus the settings `server::router` turns into its
//! middleware stack.

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Requests served at once across all routes. Uploads and inference
    /// calls beyond this wait for a slot (clamped to at least 1).
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,

    /// Send CORS headers, for browser dashboards served from another origin
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (empty = all). Entries that are not valid header
    /// values are skipped with a warning.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Trace every request through `tower_http::trace`
    #[serde(default = "default_true")]
    pub request_logging: bool,

    /// Request body limit in bytes, enforced by `DefaultBodyLimit`. This caps
    /// the size of an uploaded model; larger multipart bodies are rejected
    /// with 400 before any bytes reach the loader.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_max_concurrent() -> usize {
    64
}

fn default_true() -> bool {
    true
}

fn default_max_body_size() -> usize {
    64 * 1024 * 1024 // 64 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            max_concurrent_requests: default_max_concurrent(),
            cors_enabled: true,
            cors_origins: Vec::new(),
            request_logging: true,
            max_body_size: default_max_body_size(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
