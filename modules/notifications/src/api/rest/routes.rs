use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::NotificationLog;

/// Mount the notification routes (relative to the console API prefix).
pub fn register_routes(router: Router, log: Arc<NotificationLog>) -> Router {
    let routes = Router::new()
        .route("/notifications/file", get(handlers::notification_file))
        .layer(Extension(log));

    router.merge(routes)
}
