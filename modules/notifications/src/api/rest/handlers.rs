use std::sync::Arc;

use axum::{Extension, Json};
use console_api::{ApiResult, Authz};

use super::dto::NotificationFileDto;
use crate::domain::service::NotificationLog;

#[tracing::instrument(skip_all)]
pub async fn notification_file(
    Authz(_identity): Authz,
    Extension(log): Extension<Arc<NotificationLog>>,
) -> ApiResult<Json<NotificationFileDto>> {
    let file = log.read().await?;
    Ok(Json(file.into()))
}
