use console_api::Problem;

use crate::domain::error::DomainError;

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        let detail = e.to_string();
        match e {
            DomainError::NotConfigured => Problem::internal(detail),
            DomainError::UserNotFound(_) => Problem::not_found(detail),
            DomainError::Validation(_) => Problem::bad_request(detail),
            DomainError::Directory(err) => {
                tracing::error!(error = %err, "Directory operation failed");
                Problem::bad_gateway("Directory service request failed")
            }
        }
    }
}
