use serde::Serialize;

use crate::domain::service::NotificationFile;

#[derive(Debug, Serialize)]
pub struct NotificationFileDto {
    pub filename: String,
    pub notifications: String,
}

impl From<NotificationFile> for NotificationFileDto {
    fn from(f: NotificationFile) -> Self {
        Self {
            filename: f.filename.display().to_string(),
            notifications: f.content,
        }
    }
}
