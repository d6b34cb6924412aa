//! Error types for session verification.

use thiserror::Error;

/// Failures talking to the identity provider.
///
/// Every variant means the session state is unknown; callers must deny.
#[derive(Debug, Error)]
pub enum VerifierError {
    /// The provider could not be reached (DNS, TLS, connection refused).
    #[error("identity provider unreachable: {0}")]
    Unreachable(String),

    /// The call did not complete within the configured timeout.
    #[error("identity provider did not answer within {0:?}")]
    Timeout(std::time::Duration),

    /// The response body could not be read.
    #[error("failed to read identity provider response: {0}")]
    Body(String),

    /// The verifier failed before issuing the call.
    #[error("internal verifier error: {0}")]
    Internal(String),
}
