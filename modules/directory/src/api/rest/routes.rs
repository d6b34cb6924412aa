use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::DirectoryService;

/// Mount the directory routes (relative to the console API prefix).
pub fn register_routes(router: Router, service: Arc<DirectoryService>) -> Router {
    let routes = Router::new()
        .route("/users", get(handlers::list_users))
        .route(
            "/users/{uid}",
            get(handlers::get_user).put(handlers::update_user),
        )
        .route("/users/{uid}/password", post(handlers::change_password))
        .route("/groups", get(handlers::list_groups))
        .layer(Extension(service));

    router.merge(routes)
}
