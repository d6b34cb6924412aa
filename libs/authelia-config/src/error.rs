use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the Authelia configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read Authelia configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse Authelia configuration '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}
