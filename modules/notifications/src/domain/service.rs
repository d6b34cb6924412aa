use std::io::ErrorKind;
use std::path::PathBuf;

use authelia_config::FilesystemNotifierSettings;

use super::error::NotificationError;

/// Shown when the notifier has not written its file yet.
pub const NO_NOTIFICATIONS_YET: &str = "No notifications have been sent yet.";

/// Contents of the notifier file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationFile {
    pub filename: PathBuf,
    pub content: String,
}

/// Reads the filesystem notifier's output on demand.
pub struct NotificationLog {
    settings: Option<FilesystemNotifierSettings>,
}

impl NotificationLog {
    #[must_use]
    pub fn new(settings: Option<FilesystemNotifierSettings>) -> Self {
        Self { settings }
    }

    /// Read the whole notification file.
    ///
    /// A file that does not exist yet is reported with a placeholder text.
    ///
    /// # Errors
    /// Returns [`NotificationError::NotConfigured`] without a
    /// `notifier.filesystem` section, [`NotificationError::MissingFilename`]
    /// when it has no filename, and [`NotificationError::Read`] for any other
    /// I/O failure.
    pub async fn read(&self) -> Result<NotificationFile, NotificationError> {
        let settings = self
            .settings
            .as_ref()
            .ok_or(NotificationError::NotConfigured)?;
        let filename = settings
            .filename
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(NotificationError::MissingFilename)?;

        let content = match tokio::fs::read_to_string(&filename).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => NO_NOTIFICATIONS_YET.to_owned(),
            Err(source) => {
                return Err(NotificationError::Read {
                    path: filename,
                    source,
                });
            }
        };

        Ok(NotificationFile { filename, content })
    }
}
