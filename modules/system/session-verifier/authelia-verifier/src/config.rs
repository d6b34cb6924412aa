//! Configuration for the Authelia session verifier.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_domain() -> String {
    "auth.localhost.test".to_owned()
}

fn default_scheme() -> String {
    "https".to_owned()
}

fn default_timeout_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AutheliaVerifierConfig {
    /// Host (optionally `host:port`) serving Authelia.
    #[serde(default = "default_domain")]
    pub domain: String,

    /// `https` in production; `http` only for lab setups.
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Upper bound for the whole state call, body included.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for AutheliaVerifierConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            scheme: default_scheme(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AutheliaVerifierConfig {
    #[must_use]
    pub fn state_url(&self) -> String {
        format!("{}://{}/api/state", self.scheme, self.domain)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }
}
