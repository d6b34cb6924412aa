use axum::Json;
use console_api::{Authz, Problem};
use console_security::Identity;

/// Liveness probe; mounted on the gate's exempt path.
pub async fn health_check() -> &'static str {
    "ok"
}

/// The caller's identity as established by the session gate.
#[tracing::instrument(skip_all)]
pub async fn whoami(Authz(identity): Authz) -> Json<Identity> {
    Json(identity)
}

/// Fallback for unknown routes; reachable only through the gate.
pub async fn not_found() -> Problem {
    Problem::not_found("Resource not found")
}
