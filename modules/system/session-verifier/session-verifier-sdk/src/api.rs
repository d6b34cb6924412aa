//! Public API trait for session verification.

use async_trait::async_trait;

use crate::models::{SessionCredentials, VerificationResult};

/// Verifies an inbound session against the identity provider.
///
/// Implementations perform at most one outbound call per invocation and never
/// cache results: session validity, revocation and logout are owned by the
/// provider. Failures are reported inside [`VerificationResult`] rather than
/// as `Err`, so callers cannot mistake an error for an anonymous session.
///
/// ```ignore
/// let verifier: Arc<dyn SessionVerifier> = Arc::new(AutheliaVerifier::new(&cfg)?);
/// match verifier.verify(&credentials).await {
///     VerificationResult::Authenticated(state) => { /* ... */ }
///     _ => { /* deny */ }
/// }
/// ```
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Verify the session carried by `credentials`.
    ///
    /// Returns [`VerificationResult::Unauthenticated`] without any outbound
    /// call when no session token is present.
    async fn verify(&self, credentials: &SessionCredentials) -> VerificationResult;
}
