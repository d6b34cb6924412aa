use thiserror::Error;

/// Failures talking to the storage database.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to open storage database: {0}")]
    Connection(String),

    #[error("storage query failed: {0}")]
    Query(String),
}

impl From<sea_orm::DbErr> for StorageError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Query(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Database configuration not found in Authelia config")]
    NotConfigured,

    #[error("Database type \"{0}\" is not yet supported")]
    UnsupportedBackend(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DomainError {
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
