use serde::{Deserialize, Serialize};

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_owned()
}

fn default_base_path() -> String {
    "/auth-admin".to_owned()
}

fn default_session_cookie() -> String {
    console_security::constants::DEFAULT_SESSION_COOKIE.to_owned()
}

fn default_trusted_origins() -> Vec<String> {
    vec!["https://auth.localhost.test".to_owned()]
}

fn default_body_limit_bytes() -> usize {
    1024 * 1024
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// HTTP host configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiGatewayConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Prefix of every console route, e.g. `/auth-admin`.
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Name of the identity provider's session cookie.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,

    /// Origins accepted for state-changing requests besides the request's own.
    #[serde(default = "default_trusted_origins")]
    pub trusted_origins: Vec<String>,

    /// Global defaults
    #[serde(default)]
    pub defaults: Defaults,
}

impl Default for ApiGatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            base_path: default_base_path(),
            session_cookie: default_session_cookie(),
            trusted_origins: default_trusted_origins(),
            defaults: Defaults::default(),
        }
    }
}

impl ApiGatewayConfig {
    /// Base path with a leading slash and without a trailing one; empty for `/`.
    #[must_use]
    pub fn normalized_base_path(&self) -> String {
        let trimmed = self.base_path.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else if trimmed.starts_with('/') {
            trimmed.to_owned()
        } else {
            format!("/{trimmed}")
        }
    }

    /// The only path that bypasses the session gate.
    #[must_use]
    pub fn health_path(&self) -> String {
        format!("{}/health", self.normalized_base_path())
    }

    #[must_use]
    pub fn api_path(&self) -> String {
        format!("{}/api", self.normalized_base_path())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct Defaults {
    /// Global request body size limit in bytes
    pub body_limit_bytes: usize,
    /// Whole-request timeout; answered with 504
    pub request_timeout_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            body_limit_bytes: default_body_limit_bytes(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
