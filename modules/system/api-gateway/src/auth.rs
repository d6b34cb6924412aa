use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use access_policy::{AccessPolicy, Decision, DenialKind, DenyReason};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use console_api::Problem;
use futures::FutureExt;
use http::{HeaderMap, header};
use session_verifier_sdk::{
    SessionCredentials, SessionVerifier, UnauthenticatedReason, VerificationResult,
};

use crate::middleware::request_id::XRequestId;

/// Shared state for the session gate.
#[derive(Clone)]
pub struct GateState {
    pub verifier: Arc<dyn SessionVerifier>,
    pub policy: Arc<AccessPolicy>,
    pub session_cookie: Arc<str>,
    /// Exact path answered without authentication.
    pub exempt_path: Arc<str>,
}

/// Session gate: every request except the exempt path must carry a session
/// the identity provider confirms and the access policy accepts.
///
/// For each request:
/// 1. Forwards the exempt path untouched (exact match, before anything else)
/// 2. Extracts the session cookie and the full `Cookie` header
/// 3. Verifies the session (one outbound call)
/// 4. Evaluates the access policy
/// 5. Inserts the `Identity` and forwards, or answers 403
///
/// Any fault inside steps 3-4, panics included, ends in 403.
pub async fn session_gate(
    State(state): State<GateState>,
    mut req: Request,
    next: Next,
) -> Response {
    if req.uri().path() == &*state.exempt_path {
        return next.run(req).await;
    }

    let credentials = extract_credentials(req.headers(), &state.session_cookie);
    let request_id = req
        .extensions()
        .get::<XRequestId>()
        .map_or("n/a", |rid| rid.0.as_str())
        .to_owned();

    let evaluated = AssertUnwindSafe(async {
        let result = state.verifier.verify(&credentials).await;
        let decision = state.policy.evaluate(&result);
        (result, decision)
    })
    .catch_unwind()
    .await;

    let Ok((result, decision)) = evaluated else {
        tracing::error!(
            path = %req.uri().path(),
            %request_id,
            reason = %DenyReason::UpstreamUnavailable,
            "Session gate fault; request denied"
        );
        return deny_response(DenialKind::NotAuthenticated);
    };

    match decision {
        Decision::Allow(identity) => {
            tracing::info!(
                %request_id,
                username = %identity.username(),
                authentication_level = identity.authentication_level(),
                "Access granted"
            );
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Decision::Deny(reason) => {
            log_denial(reason, &result, req.uri().path(), &request_id);
            deny_response(reason.kind())
        }
    }
}

/// Log a denial with its diagnostic reason.
///
/// Cognitive complexity is inflated by tracing macro expansion.
#[allow(clippy::cognitive_complexity)]
fn log_denial(reason: DenyReason, result: &VerificationResult, path: &str, request_id: &str) {
    match (reason, result) {
        (DenyReason::UpstreamUnavailable, VerificationResult::Error(err)) => {
            tracing::error!(%path, %request_id, %reason, error = %err, "Access denied");
        }
        (_, VerificationResult::Unauthenticated(UnauthenticatedReason::Rejected { status })) => {
            tracing::warn!(
                %path,
                %request_id,
                %reason,
                upstream_status = *status,
                "Access denied"
            );
        }
        (DenyReason::NotAuthorized | DenyReason::InsufficientFactor, VerificationResult::Authenticated(state)) => {
            tracing::warn!(
                %path,
                %request_id,
                %reason,
                username = %state.username,
                authentication_level = state.authentication_level,
                "Access denied"
            );
        }
        _ => tracing::warn!(%path, %request_id, %reason, "Access denied"),
    }
}

fn deny_response(kind: DenialKind) -> Response {
    let detail = match kind {
        DenialKind::NotAuthenticated => "Authentication required",
        DenialKind::NotAuthorized => "Access denied",
    };
    Problem::forbidden(detail).into_response()
}

/// Collect the session token and the complete `Cookie` header.
///
/// Multiple `Cookie` headers are joined with `"; "`; values that are not
/// valid UTF-8 are skipped.
#[must_use]
pub fn extract_credentials(headers: &HeaderMap, cookie_name: &str) -> SessionCredentials {
    let cookie_header = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");

    let token = find_cookie(&cookie_header, cookie_name).map(str::to_owned);
    SessionCredentials::new(token, cookie_header)
}

fn find_cookie<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for c in cookies {
            map.append(header::COOKIE, HeaderValue::from_str(c).unwrap());
        }
        map
    }

    #[test]
    fn finds_session_cookie_among_others() {
        let creds = extract_credentials(
            &headers(&["theme=dark; authelia_session=abc123; lang=en"]),
            "authelia_session",
        );

        assert!(creds.has_token());
        assert_eq!(creds.cookie_header(), "theme=dark; authelia_session=abc123; lang=en");
    }

    #[test]
    fn joins_multiple_cookie_headers() {
        let creds = extract_credentials(
            &headers(&["theme=dark", "authelia_session=abc123"]),
            "authelia_session",
        );

        assert!(creds.has_token());
        assert_eq!(creds.cookie_header(), "theme=dark; authelia_session=abc123");
    }

    #[test]
    fn missing_cookie_is_absent_not_an_error() {
        let creds = extract_credentials(&headers(&["theme=dark"]), "authelia_session");
        assert!(!creds.has_token());

        let creds = extract_credentials(&HeaderMap::new(), "authelia_session");
        assert!(!creds.has_token());
        assert_eq!(creds.cookie_header(), "");
    }

    #[test]
    fn empty_session_cookie_counts_as_absent() {
        let creds = extract_credentials(&headers(&["authelia_session="]), "authelia_session");
        assert!(!creds.has_token());
    }

    #[test]
    fn cookie_name_must_match_exactly() {
        assert_eq!(find_cookie("authelia_session_old=x", "authelia_session"), None);
        assert_eq!(find_cookie("my_authelia_session=x", "authelia_session"), None);
        assert_eq!(find_cookie("authelia_session=\"x\"", "authelia_session"), Some("x"));
    }

    #[test]
    fn first_occurrence_wins() {
        assert_eq!(
            find_cookie("authelia_session=first; authelia_session=second", "authelia_session"),
            Some("first")
        );
    }
}
