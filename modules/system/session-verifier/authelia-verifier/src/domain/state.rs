//! Strict parsing of Authelia's `/api/state` response.
//!
//! Authelia answers `{"status":"OK","data":{"username":"..","authentication_level":N}}`.
//! Any deviation from that shape is classified as a malformed response; no
//! partial extraction is attempted.

use serde::Deserialize;
use session_verifier_sdk::{SessionState, UnauthenticatedReason, VerificationResult};

const STATUS_OK: &str = "OK";

/// Longest body excerpt written to the logs.
const LOGGED_BODY_CHARS: usize = 512;

#[derive(Debug, Deserialize)]
struct StateResponse {
    status: String,
    data: StateData,
}

#[derive(Debug, Deserialize)]
struct StateData {
    username: String,
    authentication_level: i64,
}

/// Classify the body of a 200 response.
///
/// The body excerpt is only logged at debug; the gate reports the denial.
pub(crate) fn classify_body(body: &str) -> VerificationResult {
    let parsed: StateResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(
                error = %e,
                body = %excerpt(body),
                "Authelia state response does not match the expected schema"
            );
            return VerificationResult::Unauthenticated(UnauthenticatedReason::MalformedResponse);
        }
    };

    if parsed.status != STATUS_OK {
        tracing::debug!(
            status = %parsed.status,
            body = %excerpt(body),
            "Authelia state response reported a non-OK status"
        );
        return VerificationResult::Unauthenticated(UnauthenticatedReason::MalformedResponse);
    }

    // Authelia reports sessions without a logged-in user with an empty username
    if parsed.data.username.is_empty() {
        return VerificationResult::Unauthenticated(UnauthenticatedReason::AnonymousSession);
    }

    VerificationResult::Authenticated(SessionState {
        username: parsed.data.username,
        authentication_level: parsed.data.authentication_level,
    })
}

fn excerpt(body: &str) -> String {
    body.chars().take(LOGGED_BODY_CHARS).collect()
}
