use std::sync::Arc;

use axum::routing::{delete, get};
use axum::{Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::StorageService;

/// Mount the storage routes (relative to the console API prefix).
pub fn register_routes(router: Router, service: Arc<StorageService>) -> Router {
    let routes = Router::new()
        .route("/totp/configurations", get(handlers::list_totp_configurations))
        .route(
            "/totp/configurations/{id}",
            delete(handlers::delete_totp_configuration),
        )
        .route("/totp/history", get(handlers::totp_history))
        .route(
            "/banned/users",
            get(handlers::list_banned_users).post(handlers::ban_user),
        )
        .route("/banned/users/{id}", delete(handlers::unban_user))
        .route(
            "/banned/ips",
            get(handlers::list_banned_ips).post(handlers::ban_ip),
        )
        .route("/banned/ips/{id}", delete(handlers::unban_ip))
        .route("/storage/health", get(handlers::storage_health))
        .layer(Extension(service));

    router.merge(routes)
}
