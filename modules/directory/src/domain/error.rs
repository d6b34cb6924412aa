use thiserror::Error;

/// Failures of a directory backend.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to connect to directory server: {0}")]
    Connection(String),

    #[error("directory bind rejected: {0}")]
    Bind(String),

    #[error("directory operation failed: {0}")]
    Operation(String),
}

impl From<ldap3::LdapError> for DirectoryError {
    fn from(e: ldap3::LdapError) -> Self {
        Self::Operation(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("LDAP configuration not found in Authelia config")]
    NotConfigured,

    #[error("User \"{0}\" not found")]
    UserNotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl DomainError {
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
