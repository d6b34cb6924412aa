use console_api::Problem;

use crate::domain::error::NotificationError;

impl From<NotificationError> for Problem {
    fn from(e: NotificationError) -> Self {
        match e {
            NotificationError::NotConfigured | NotificationError::MissingFilename => {
                Problem::internal(e.to_string())
            }
            NotificationError::Read { .. } => {
                tracing::error!(error = %e, "Failed to read notification file");
                Problem::internal("Failed to read notification file")
            }
        }
    }
}
