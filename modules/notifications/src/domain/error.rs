use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Filesystem notifier is not configured in Authelia")]
    NotConfigured,

    #[error("Notification file path not specified in configuration")]
    MissingFilename,

    #[error("failed to read notification file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
