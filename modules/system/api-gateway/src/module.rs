//! `ApiGateway` - assembles the console router and serves it.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use access_policy::AccessPolicy;
use anyhow::Result;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::{Router, extract::DefaultBodyLimit, routing::get};
use session_verifier_sdk::SessionVerifier;
use tokio_util::sync::CancellationToken;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

use crate::auth::{self, GateState};
use crate::config::ApiGatewayConfig;
use crate::csrf::{self, OriginCheckState};
use crate::middleware;
use crate::web;

/// Owns the HTTP host: the exempt health route, the gated API and the
/// middleware stack around both.
pub struct ApiGateway {
    config: ApiGatewayConfig,
    verifier: Arc<dyn SessionVerifier>,
    policy: Arc<AccessPolicy>,
}

impl ApiGateway {
    #[must_use]
    pub fn new(
        config: ApiGatewayConfig,
        verifier: Arc<dyn SessionVerifier>,
        policy: Arc<AccessPolicy>,
    ) -> Self {
        Self {
            config,
            verifier,
            policy,
        }
    }

    /// Build the complete application router.
    ///
    /// `api` holds the module routes; it is mounted under `{base_path}/api`
    /// next to `GET /me`. Every route, the fallback included, sits behind
    /// the session gate except `{base_path}/health`.
    #[must_use]
    pub fn build_router(&self, api: Router) -> Router {
        let api = api.route("/me", get(web::whoami));

        let router = Router::new()
            .route(&self.config.health_path(), get(web::health_check))
            .nest(&self.config.api_path(), api)
            .fallback(web::not_found);

        self.apply_middleware_stack(router)
    }

    /// Apply all middleware layers to a router (request ID, tracing, timeout, body limit, origin check, session gate)
    pub(crate) fn apply_middleware_stack(&self, mut router: Router) -> Router {
        // IMPORTANT: `axum::Router::layer(...)` behaves like Tower layers: the **last** added layer
        // becomes the **outermost** layer and therefore runs **first** on the request path.
        //
        // Desired request execution order (outermost -> innermost):
        // SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions
        // -> Timeout -> BodyLimit -> OriginCheck -> SessionGate -> Router
        //
        // Therefore we must add layers in the reverse order (innermost -> outermost) below.

        // 6) Session gate
        let gate_state = GateState {
            verifier: Arc::clone(&self.verifier),
            policy: Arc::clone(&self.policy),
            session_cookie: Arc::from(self.config.session_cookie.as_str()),
            exempt_path: Arc::from(self.config.health_path()),
        };
        router = router.layer(from_fn_with_state(gate_state, auth::session_gate));

        // 5) Origin check (outer to the gate so forged requests never reach the provider)
        router = router.layer(from_fn_with_state(
            OriginCheckState::new(&self.config.trusted_origins),
            csrf::origin_check,
        ));

        // 4) Body limit
        router = router.layer(RequestBodyLimitLayer::new(self.config.defaults.body_limit_bytes));
        router = router.layer(DefaultBodyLimit::max(self.config.defaults.body_limit_bytes));

        // 3) Timeout
        router = router.layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::GATEWAY_TIMEOUT,
            Duration::from_secs(self.config.defaults.request_timeout_secs.max(1)),
        ));

        // 2b) Record request_id into span + extensions (requires span to exist first => must be inner to Trace)
        router = router.layer(from_fn(middleware::request_id::push_req_id_to_extensions));

        // 2a) Trace (outer to push_req_id_to_extensions)
        router = router.layer({
            use tower_http::trace::TraceLayer;
            use tracing::field::Empty;

            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<axum::body::Body>| {
                    let hdr = middleware::request_id::header();
                    let rid = req
                        .headers()
                        .get(&hdr)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("n/a");

                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri().path(),
                        version = ?req.version(),
                        request_id = %rid,
                        status = Empty,
                        latency_ms = Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<axum::body::Body>,
                     latency: Duration,
                     span: &tracing::Span| {
                        span.record("status", res.status().as_u16());
                        span.record("latency_ms", latency.as_millis());
                    },
                )
        });

        // 1) Request ID handling
        let x_request_id = middleware::request_id::header();
        // If missing, generate x-request-id first; then propagate it to the response.
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
        router = router.layer(SetRequestIdLayer::new(
            x_request_id,
            middleware::request_id::MakeReqId,
        ));

        router
    }

    /// Parse bind address from configuration string.
    fn parse_bind_address(bind_addr: &str) -> Result<SocketAddr> {
        bind_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address '{bind_addr}': {e}"))
    }

    /// Bind and serve `router` until `cancel` fires, then drain in-flight requests.
    ///
    /// # Errors
    /// Returns an error if the bind address is invalid, binding fails or the
    /// server stops abnormally.
    pub async fn serve(&self, router: Router, cancel: CancellationToken) -> Result<()> {
        let addr = Self::parse_bind_address(&self.config.bind_addr)?;

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(
            %addr,
            base_path = %self.config.normalized_base_path(),
            "HTTP server bound"
        );

        // Graceful shutdown on cancel
        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}
