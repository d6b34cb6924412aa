use async_trait::async_trait;

use super::error::StorageError;
use super::models::{Ban, BanTarget, NewBan, TotpConfiguration, TotpHistoryEntry};

/// Row access to Authelia's storage tables.
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// # Errors
    /// Returns [`StorageError`] when the database cannot be reached or queried.
    async fn list_totp_configurations(&self) -> Result<Vec<TotpConfiguration>, StorageError>;

    /// Returns `false` when no row matched `id`.
    ///
    /// # Errors
    /// Returns [`StorageError`] when the database cannot be reached or queried.
    async fn delete_totp_configuration(&self, id: i64) -> Result<bool, StorageError>;

    /// Newest `limit` history entries.
    ///
    /// # Errors
    /// Returns [`StorageError`] when the database cannot be reached or queried.
    async fn totp_history(&self, limit: u64) -> Result<Vec<TotpHistoryEntry>, StorageError>;

    /// # Errors
    /// Returns [`StorageError`] when the database cannot be reached or queried.
    async fn list_bans(&self, target: BanTarget) -> Result<Vec<Ban>, StorageError>;

    /// Insert a ban and return the stored row.
    ///
    /// # Errors
    /// Returns [`StorageError`] when the database cannot be reached or queried.
    async fn insert_ban(&self, target: BanTarget, ban: NewBan) -> Result<Ban, StorageError>;

    /// Returns `false` when no row matched `id`.
    ///
    /// # Errors
    /// Returns [`StorageError`] when the database cannot be reached or queried.
    async fn delete_ban(&self, target: BanTarget, id: i64) -> Result<bool, StorageError>;

    /// # Errors
    /// Returns [`StorageError`] when the database does not answer a trivial query.
    async fn ping(&self) -> Result<(), StorageError>;
}
