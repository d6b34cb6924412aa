use console_api::Problem;

use crate::domain::error::DomainError;

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        let detail = e.to_string();
        match e {
            DomainError::NotConfigured => Problem::internal(detail),
            DomainError::UnsupportedBackend(_) => Problem::not_implemented(detail),
            DomainError::NotFound(_) => Problem::not_found(detail),
            DomainError::Validation(_) => Problem::bad_request(detail),
            DomainError::Storage(err) => {
                tracing::error!(error = %err, "Storage operation failed");
                Problem::bad_gateway("Storage request failed")
            }
        }
    }
}
