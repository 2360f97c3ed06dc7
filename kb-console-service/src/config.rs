//! Static configuration loaded at startup from `config.*` files and
//! `KB_CONSOLE__`-prefixed environment variables. Changing any of these
//! settings requires a restart.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct StaticConfig {
    #[serde(default = "default_server")]
    pub server: ServerConfig,

    #[serde(default = "default_backend")]
    pub backend: BackendConfig,

    #[serde(default = "default_limits")]
    pub limits: LimitsConfig,

    #[serde(default = "default_cors")]
    pub cors: CorsConfig,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            backend: default_backend(),
            limits: default_limits(),
            cors: default_cors(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Knowledge-base backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the knowledge-base service hosting the
    /// `/admin/update-knowledge` and `/retrieve/` endpoints.
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Request limits
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum accepted upload body size. Documents are buffered whole
    /// before extraction, so this bounds peak memory per request.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Cross-origin configuration, shared by the HTTP API and the
/// WebSocket origin allowlist.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

// ==================== Default Value Functions ====================

pub(crate) fn default_server() -> ServerConfig {
    ServerConfig {
        host: default_host(),
        port: default_port(),
    }
}

pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    8080
}

pub(crate) fn default_backend() -> BackendConfig {
    BackendConfig {
        base_url: default_backend_url(),
        request_timeout_secs: default_request_timeout_secs(),
    }
}

pub(crate) fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

pub(crate) fn default_request_timeout_secs() -> u64 {
    30
}

pub(crate) fn default_limits() -> LimitsConfig {
    LimitsConfig {
        max_upload_bytes: default_max_upload_bytes(),
    }
}

pub(crate) fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

pub(crate) fn default_cors() -> CorsConfig {
    CorsConfig {
        allowed_origins: default_allowed_origins(),
    }
}

pub(crate) fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}
