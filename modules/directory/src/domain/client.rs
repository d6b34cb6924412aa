use async_trait::async_trait;

use super::error::DirectoryError;
use super::models::{DirectoryGroup, DirectoryUser, UserChanges};

/// Access to the LDAP directory behind Authelia.
///
/// Constructed once at startup and shared as `Arc<dyn DirectoryClient>`.
/// Every method reports backend failures as [`DirectoryError`].
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// All `person` entries of the users subtree.
    ///
    /// # Errors
    /// Returns [`DirectoryError`] if the directory cannot be queried.
    async fn list_users(&self) -> Result<Vec<DirectoryUser>, DirectoryError>;

    /// Look up one user by its username attribute.
    ///
    /// # Errors
    /// Returns [`DirectoryError`] if the directory cannot be queried.
    async fn get_user(&self, uid: &str) -> Result<Option<DirectoryUser>, DirectoryError>;

    /// Replace the attributes set in `changes`.
    ///
    /// # Errors
    /// Returns [`DirectoryError`] if the modification is rejected.
    async fn update_user(&self, uid: &str, changes: &UserChanges) -> Result<(), DirectoryError>;

    /// Replace `userPassword`.
    ///
    /// # Errors
    /// Returns [`DirectoryError`] if the modification is rejected.
    async fn change_password(&self, uid: &str, new_password: &str) -> Result<(), DirectoryError>;

    /// All `groupOfNames` entries of the groups subtree.
    ///
    /// # Errors
    /// Returns [`DirectoryError`] if the directory cannot be queried.
    async fn list_groups(&self) -> Result<Vec<DirectoryGroup>, DirectoryError>;

    /// Address of the directory server, for display.
    fn server_address(&self) -> &str;
}
