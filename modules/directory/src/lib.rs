//! LDAP directory module: users and groups of Authelia's LDAP backend.
//!
//! The directory is reached through the injectable [`domain::client::DirectoryClient`];
//! [`infra::ldap_client::LdapDirectoryClient`] is the production implementation.

pub mod api;
pub mod domain;
pub mod infra;

pub use domain::client::DirectoryClient;
pub use domain::service::DirectoryService;
pub use infra::ldap_client::LdapDirectoryClient;
