//! Application configuration.
//!
//! Layers, lowest precedence first: built-in defaults, the optional YAML file
//! given with `--config`, `AUTHELIA_ADMIN__*` environment variables and
//! finally the environment variables of the legacy container image
//! (`AUTHELIA_DOMAIN`, `ALLOWED_USERS`, `TRUSTED_ORIGINS`,
//! `AUTHELIA_CONFIG_PATH`).

use std::path::{Path, PathBuf};

use access_policy::AccessPolicyConfig;
use anyhow::Context;
use api_gateway::ApiGatewayConfig;
use authelia_config::DEFAULT_AUTHELIA_CONFIG_PATH;
use authelia_verifier::AutheliaVerifierConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "AUTHELIA_ADMIN__";

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_authelia_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_AUTHELIA_CONFIG_PATH)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` overrides it.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Where Authelia's own configuration lives.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AutheliaFileConfig {
    #[serde(default = "default_authelia_config_path")]
    pub config_path: PathBuf,
}

impl Default for AutheliaFileConfig {
    fn default() -> Self {
        Self {
            config_path: default_authelia_config_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub server: ApiGatewayConfig,
    #[serde(default)]
    pub verifier: AutheliaVerifierConfig,
    #[serde(default)]
    pub access: AccessPolicyConfig,
    #[serde(default)]
    pub authelia: AutheliaFileConfig,
}

impl AppConfig {
    /// Load the configuration from every layer.
    ///
    /// # Errors
    /// Fails when the file is missing or malformed, or a value has the wrong type.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            anyhow::ensure!(
                path.is_file(),
                "configuration file {} does not exist",
                path.display()
            );
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let mut config = Self::from_figment(&figment)?;
        config.apply_legacy_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// # Errors
    /// Fails when the merged layers do not describe a valid configuration.
    pub fn from_figment(figment: &Figment) -> anyhow::Result<Self> {
        figment.extract().context("invalid configuration")
    }

    /// Overlay the environment variables understood by the legacy container image.
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(domain) = get("AUTHELIA_DOMAIN") {
            self.verifier.domain = domain.trim().to_owned();
        }
        if let Some(users) = get("ALLOWED_USERS") {
            self.access.allowed_users = split_list(&users);
        }
        if let Some(origins) = get("TRUSTED_ORIGINS") {
            self.server.trusted_origins = split_list(&origins);
        }
        if let Some(path) = get("AUTHELIA_CONFIG_PATH") {
            self.authelia.config_path = PathBuf::from(path.trim());
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
