//! Read-once view of Authelia's `configuration.yml`.
//!
//! Only the sections the console consumes are modelled: `storage`,
//! `authentication_backend.ldap` and `notifier.filesystem`. Everything else in
//! the file is ignored.

pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::{
    AutheliaSettings, DEFAULT_AUTHELIA_CONFIG_PATH, FilesystemNotifierSettings, LdapAttributes,
    LdapSettings, StorageBackend,
};
