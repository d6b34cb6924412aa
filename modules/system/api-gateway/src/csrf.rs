//! Origin check for state-changing requests.
//!
//! Browsers attach `Origin` to cross-site `POST`s; a request whose origin is
//! neither the console's own nor explicitly trusted is rejected before the
//! session gate sees it. Requests without `Origin` are non-browser clients
//! and pass.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use console_api::Problem;
use http::{HeaderMap, Method, header};

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

#[derive(Debug, Clone)]
pub struct OriginCheckState {
    trusted_origins: Arc<HashSet<String>>,
}

impl OriginCheckState {
    #[must_use]
    pub fn new(trusted_origins: &[String]) -> Self {
        let trusted_origins = trusted_origins
            .iter()
            .map(|o| normalize_origin(o))
            .filter(|o| !o.is_empty())
            .collect();
        Self {
            trusted_origins: Arc::new(trusted_origins),
        }
    }

    fn is_trusted(&self, origin: &str) -> bool {
        self.trusted_origins.contains(origin)
    }
}

pub async fn origin_check(
    State(state): State<OriginCheckState>,
    req: Request,
    next: Next,
) -> Response {
    if !is_state_changing(req.method()) {
        return next.run(req).await;
    }
    let Some(origin) = req.headers().get(header::ORIGIN) else {
        return next.run(req).await;
    };

    let origin = origin.to_str().map(normalize_origin).unwrap_or_default();
    let own_origin = request_origin(req.headers());

    if !origin.is_empty() && (own_origin.as_deref() == Some(origin.as_str()) || state.is_trusted(&origin)) {
        return next.run(req).await;
    }

    tracing::warn!(
        method = %req.method(),
        path = %req.uri().path(),
        %origin,
        "Cross-site request rejected"
    );
    Problem::forbidden("Cross-site request forbidden").into_response()
}

fn is_state_changing(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// `{scheme}://{host}` of the request as the browser addressed it.
fn request_origin(headers: &HeaderMap) -> Option<String> {
    let host = headers.get(header::HOST)?.to_str().ok()?.trim();
    if host.is_empty() {
        return None;
    }
    let scheme = headers
        .get(X_FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");
    Some(normalize_origin(&format!("{scheme}://{host}")))
}

fn normalize_origin(origin: &str) -> String {
    origin.trim().trim_end_matches('/').to_ascii_lowercase()
}
