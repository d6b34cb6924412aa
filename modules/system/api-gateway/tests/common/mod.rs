#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use access_policy::{AccessPolicy, AccessPolicyConfig};
use api_gateway::{ApiGateway, ApiGatewayConfig};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
    routing::get,
};
use session_verifier_sdk::{
    SessionCredentials, SessionState, SessionVerifier, UnauthenticatedReason, VerificationResult,
    VerifierError,
};

/// Canned provider answer for the fake verifier.
#[derive(Debug, Clone)]
pub enum Scenario {
    Authenticated(&'static str, i64),
    Rejected(u16),
    Malformed,
    Unreachable,
    Panic,
    /// Never answers; the flag is raised once the pending call is dropped.
    Hang(Arc<AtomicBool>),
}

/// Raises its flag when dropped.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Verifier double that mimics the Authelia adapter's short-circuit and
/// records what it was asked to verify.
pub struct FakeVerifier {
    scenario: Scenario,
    pub upstream_calls: AtomicUsize,
    pub forwarded_cookies: Mutex<Vec<String>>,
}

impl FakeVerifier {
    pub fn new(scenario: Scenario) -> Arc<Self> {
        Arc::new(Self {
            scenario,
            upstream_calls: AtomicUsize::new(0),
            forwarded_cookies: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.upstream_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionVerifier for FakeVerifier {
    async fn verify(&self, credentials: &SessionCredentials) -> VerificationResult {
        if !credentials.has_token() {
            return VerificationResult::Unauthenticated(UnauthenticatedReason::NoSession);
        }
        self.upstream_calls.fetch_add(1, Ordering::SeqCst);
        self.forwarded_cookies
            .lock()
            .unwrap()
            .push(credentials.cookie_header().to_owned());

        match &self.scenario {
            Scenario::Authenticated(username, level) => {
                VerificationResult::Authenticated(SessionState {
                    username: (*username).to_owned(),
                    authentication_level: *level,
                })
            }
            Scenario::Rejected(status) => VerificationResult::Unauthenticated(
                UnauthenticatedReason::Rejected { status: *status },
            ),
            Scenario::Malformed => {
                VerificationResult::Unauthenticated(UnauthenticatedReason::MalformedResponse)
            }
            Scenario::Unreachable => VerificationResult::Error(VerifierError::Timeout(
                std::time::Duration::from_secs(5),
            )),
            Scenario::Panic => panic!("verifier blew up"),
            Scenario::Hang(dropped) => {
                let _flag = DropFlag(Arc::clone(dropped));
                std::future::pending().await
            }
        }
    }
}

/// Counts how often the downstream handler actually ran.
#[derive(Clone, Default)]
pub struct HandlerHits(pub Arc<AtomicUsize>);

impl HandlerHits {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn test_app(verifier: Arc<FakeVerifier>) -> (Router, HandlerHits) {
    test_app_with(verifier, ApiGatewayConfig::default())
}

pub fn test_app_with(verifier: Arc<FakeVerifier>, config: ApiGatewayConfig) -> (Router, HandlerHits) {
    let policy = AccessPolicy::from_config(&AccessPolicyConfig {
        allowed_users: vec!["admin".to_owned()],
    });
    let gateway = ApiGateway::new(config, verifier, Arc::new(policy));

    let hits = HandlerHits::default();
    let get_hits = hits.clone();
    let post_hits = hits.clone();
    let api = Router::new().route(
        "/guarded",
        get(move || {
            let hits = get_hits.clone();
            async move {
                hits.0.fetch_add(1, Ordering::SeqCst);
                "reached"
            }
        })
        .post(move || {
            let hits = post_hits.clone();
            async move {
                hits.0.fetch_add(1, Ordering::SeqCst);
                "changed"
            }
        }),
    );

    (gateway.build_router(api), hits)
}

pub fn get_with_cookie(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
