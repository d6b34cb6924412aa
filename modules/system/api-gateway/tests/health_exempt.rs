#![allow(clippy::unwrap_used, clippy::expect_used)]

//! The health probe is the only route that bypasses the session gate.

mod common;

use api_gateway::ApiGatewayConfig;
use axum::http::StatusCode;
use common::{FakeVerifier, Scenario, body_text, get_with_cookie, test_app, test_app_with};
use tower::ServiceExt;

#[tokio::test]
async fn health_answers_without_session_or_verifier() {
    // A panicking verifier proves the gate never runs for this path
    let verifier = FakeVerifier::new(Scenario::Panic);
    let (app, _) = test_app(verifier.clone());

    let response = app
        .oneshot(get_with_cookie("/auth-admin/health", Some("authelia_session=abc123")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
    assert_eq!(verifier.calls(), 0);
}

#[tokio::test]
async fn health_answers_for_anonymous_callers() {
    let verifier = FakeVerifier::new(Scenario::Unreachable);
    let (app, _) = test_app(verifier);

    let response = app
        .oneshot(get_with_cookie("/auth-admin/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn exemption_is_an_exact_path_match() {
    let verifier = FakeVerifier::new(Scenario::Authenticated("admin", 2));
    let (app, _) = test_app(verifier);

    for path in [
        "/auth-admin/health/",
        "/auth-admin/health/details",
        "/auth-admin/healthz",
        "/health",
    ] {
        let response = app
            .clone()
            .oneshot(get_with_cookie(path, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{path} must be gated");
    }
}

#[tokio::test]
async fn health_follows_configured_base_path() {
    let verifier = FakeVerifier::new(Scenario::Unreachable);
    let config = ApiGatewayConfig {
        base_path: "/console/".to_owned(),
        ..ApiGatewayConfig::default()
    };
    let (app, _) = test_app_with(verifier, config);

    let response = app
        .clone()
        .oneshot(get_with_cookie("/console/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_with_cookie("/auth-admin/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
