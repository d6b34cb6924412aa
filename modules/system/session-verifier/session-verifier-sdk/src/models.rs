//! Models exchanged between the gate and session verifiers.

use secrecy::{ExposeSecret, SecretString};

use crate::error::VerifierError;

/// Session material extracted from one inbound request.
///
/// Both values are opaque: they are forwarded to the provider verbatim and
/// never parsed or logged.
#[derive(Debug)]
pub struct SessionCredentials {
    has_token: bool,
    cookie_header: SecretString,
}

impl SessionCredentials {
    /// Build credentials from the session cookie value (if any) and the full
    /// `Cookie` header of the request.
    ///
    /// An empty token is treated as absent.
    #[must_use]
    pub fn new(token: Option<String>, cookie_header: String) -> Self {
        Self {
            has_token: token.is_some_and(|t| !t.is_empty()),
            cookie_header: SecretString::from(cookie_header),
        }
    }

    /// Whether the session cookie was present with a non-empty value.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.has_token
    }

    /// The complete `Cookie` header to forward.
    #[must_use]
    pub fn cookie_header(&self) -> &str {
        self.cookie_header.expose_secret()
    }
}

/// Session state reported by the provider for an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub username: String,
    pub authentication_level: i64,
}

/// Why a session is not authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    /// The request carried no session cookie.
    NoSession,
    /// The provider knows the session but no user is logged in.
    AnonymousSession,
    /// The provider answered with a non-200 status.
    Rejected { status: u16 },
    /// The provider answered 200 with a body that does not match the schema.
    MalformedResponse,
}

/// Outcome of one verification; derived fresh for every request.
#[derive(Debug)]
pub enum VerificationResult {
    Unauthenticated(UnauthenticatedReason),
    Authenticated(SessionState),
    Error(VerifierError),
}
