use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::ConfigError;

/// Location of the Authelia configuration inside the official container image.
pub const DEFAULT_AUTHELIA_CONFIG_PATH: &str = "/config/configuration.yml";

/// Storage backend declared in Authelia's `storage` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// `storage.local.path` - the `SQLite` file shared with Authelia.
    Sqlite { path: PathBuf },
    /// `storage.postgres` - recognised, but the console has no adapter for it.
    Postgres { address: String },
}

impl StorageBackend {
    /// Short backend name used in operator-facing messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sqlite { .. } => "sqlite",
            Self::Postgres { .. } => "postgres",
        }
    }
}

/// Attribute mapping of `authentication_backend.ldap.attributes`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LdapAttributes {
    pub username: String,
    pub display_name: String,
    pub mail: String,
    pub member_of: String,
    pub group_name: String,
}

impl Default for LdapAttributes {
    fn default() -> Self {
        Self {
            username: "uid".to_owned(),
            display_name: "displayName".to_owned(),
            mail: "mail".to_owned(),
            member_of: "memberOf".to_owned(),
            group_name: "cn".to_owned(),
        }
    }
}

/// Connection and layout settings of the LDAP authentication backend.
#[derive(Debug)]
pub struct LdapSettings {
    pub address: String,
    pub base_dn: String,
    pub additional_users_dn: Option<String>,
    pub additional_groups_dn: Option<String>,
    /// Authelia's user search filter, placeholders unexpanded.
    pub users_filter: Option<String>,
    /// Authelia's group search filter, placeholders unexpanded.
    pub groups_filter: Option<String>,
    pub bind_user: String,
    pub bind_password: SecretString,
    pub attributes: LdapAttributes,
}

impl LdapSettings {
    /// Search base for user entries: `{additional_users_dn},{base_dn}`.
    #[must_use]
    pub fn users_base(&self) -> String {
        join_dn(self.additional_users_dn.as_deref(), &self.base_dn)
    }

    /// Search base for group entries: `{additional_groups_dn},{base_dn}`.
    #[must_use]
    pub fn groups_base(&self) -> String {
        join_dn(self.additional_groups_dn.as_deref(), &self.base_dn)
    }
}

fn join_dn(prefix: Option<&str>, base_dn: &str) -> String {
    match prefix.map(str::trim).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{prefix},{base_dn}"),
        None => base_dn.to_owned(),
    }
}

/// `notifier.filesystem` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemNotifierSettings {
    /// Target file; `None` when the section exists without a filename.
    pub filename: Option<PathBuf>,
}

/// The parts of Authelia's configuration consumed by the console.
///
/// Loaded once at startup and handed to the modules that need it.
#[derive(Debug, Default)]
pub struct AutheliaSettings {
    pub storage: Option<StorageBackend>,
    pub ldap: Option<LdapSettings>,
    pub filesystem_notifier: Option<FilesystemNotifierSettings>,
}

impl AutheliaSettings {
    /// Read and parse the configuration file at `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid YAML of the expected shape.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Load the configuration, falling back to an empty view when it is
    /// missing or invalid.
    ///
    /// The console keeps serving its gate and health probe without Authelia's
    /// file; the affected pages then report the missing configuration.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                tracing::info!(
                    path = %path.display(),
                    storage = settings.storage.as_ref().map_or("none", StorageBackend::kind),
                    ldap = settings.ldap.is_some(),
                    filesystem_notifier = settings.filesystem_notifier.is_some(),
                    "Loaded Authelia configuration"
                );
                settings
            }
            Err(e) => {
                tracing::warn!(error = %e, "Authelia configuration unavailable; continuing without it");
                Self::default()
            }
        }
    }

    /// Parse the YAML content of an Authelia configuration file.
    ///
    /// # Errors
    /// Returns the parser message when the document cannot be deserialized.
    pub fn from_yaml_str(content: &str) -> Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfiguration = serde_saphyr::from_str(content).map_err(|e| e.to_string())?;
        Ok(raw.into())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfiguration {
    storage: Option<RawStorage>,
    authentication_backend: Option<RawAuthenticationBackend>,
    notifier: Option<RawNotifier>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStorage {
    local: Option<RawLocalStorage>,
    postgres: Option<RawPostgresStorage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLocalStorage {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPostgresStorage {
    address: Option<String>,
    host: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAuthenticationBackend {
    ldap: Option<RawLdap>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLdap {
    #[serde(alias = "url")]
    address: Option<String>,
    base_dn: Option<String>,
    additional_users_dn: Option<String>,
    additional_groups_dn: Option<String>,
    users_filter: Option<String>,
    groups_filter: Option<String>,
    user: Option<String>,
    password: Option<String>,
    attributes: LdapAttributes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawNotifier {
    filesystem: Option<RawFilesystemNotifier>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFilesystemNotifier {
    filename: Option<String>,
}

impl From<RawConfiguration> for AutheliaSettings {
    fn from(raw: RawConfiguration) -> Self {
        let storage = raw.storage.and_then(|storage| {
            let local_path = storage
                .local
                .and_then(|local| local.path)
                .filter(|p| !p.is_empty());
            match (local_path, storage.postgres) {
                (Some(path), _) => Some(StorageBackend::Sqlite {
                    path: PathBuf::from(path),
                }),
                (None, Some(pg)) => Some(StorageBackend::Postgres {
                    address: pg.address.or(pg.host).unwrap_or_default(),
                }),
                (None, None) => None,
            }
        });

        let ldap = raw
            .authentication_backend
            .and_then(|backend| backend.ldap)
            .map(|ldap| LdapSettings {
                address: ldap.address.unwrap_or_default(),
                base_dn: ldap.base_dn.unwrap_or_default(),
                additional_users_dn: ldap.additional_users_dn,
                additional_groups_dn: ldap.additional_groups_dn,
                users_filter: ldap.users_filter.filter(|f| !f.trim().is_empty()),
                groups_filter: ldap.groups_filter.filter(|f| !f.trim().is_empty()),
                bind_user: ldap.user.unwrap_or_default(),
                bind_password: SecretString::from(ldap.password.unwrap_or_default()),
                attributes: ldap.attributes,
            });

        let filesystem_notifier = raw
            .notifier
            .and_then(|notifier| notifier.filesystem)
            .map(|fs| FilesystemNotifierSettings {
                filename: fs.filename.filter(|f| !f.is_empty()).map(PathBuf::from),
            });

        Self {
            storage,
            ldap,
            filesystem_notifier,
        }
    }
}
