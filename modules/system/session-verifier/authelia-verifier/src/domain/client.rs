//! `SessionVerifier` implementation calling Authelia over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, header, redirect};
use session_verifier_sdk::{
    SessionCredentials, SessionVerifier, UnauthenticatedReason, VerificationResult, VerifierError,
};

use super::state::classify_body;
use crate::config::AutheliaVerifierConfig;

/// Verifies sessions with one `GET {scheme}://{domain}/api/state` per call.
///
/// The underlying client pools connections; nothing else is shared between
/// verifications.
pub struct AutheliaVerifier {
    client: reqwest::Client,
    state_url: String,
    timeout: Duration,
}

impl AutheliaVerifier {
    /// Build a verifier from configuration.
    ///
    /// # Errors
    /// Returns [`VerifierError::Internal`] if the HTTP client cannot be built.
    pub fn new(cfg: &AutheliaVerifierConfig) -> Result<Self, VerifierError> {
        let timeout = cfg.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| VerifierError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            state_url: cfg.state_url(),
            timeout,
        })
    }

    #[must_use]
    pub fn state_url(&self) -> &str {
        &self.state_url
    }

    fn transport_error(&self, e: &reqwest::Error) -> VerifierError {
        if e.is_timeout() {
            VerifierError::Timeout(self.timeout)
        } else if e.is_body() || e.is_decode() {
            VerifierError::Body(e.to_string())
        } else {
            VerifierError::Unreachable(e.to_string())
        }
    }
}

#[async_trait]
impl SessionVerifier for AutheliaVerifier {
    async fn verify(&self, credentials: &SessionCredentials) -> VerificationResult {
        if !credentials.has_token() {
            return VerificationResult::Unauthenticated(UnauthenticatedReason::NoSession);
        }

        let response = match self
            .client
            .get(&self.state_url)
            .header(header::COOKIE, credentials.cookie_header())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return VerificationResult::Error(self.transport_error(&e)),
        };

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(status = status.as_u16(), "Authelia rejected the session");
            return VerificationResult::Unauthenticated(UnauthenticatedReason::Rejected {
                status: status.as_u16(),
            });
        }

        match response.text().await {
            Ok(body) => classify_body(&body),
            Err(e) => VerificationResult::Error(self.transport_error(&e)),
        }
    }
}
