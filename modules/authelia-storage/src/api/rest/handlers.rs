use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Extension, Json};
use console_api::{ApiJson, ApiPath, ApiQuery, ApiResult, Authz};

use super::dto::{
    BanIpRequest, BanUserRequest, BannedIpDto, BannedIpListDto, BannedUserDto, BannedUserListDto,
    HistoryQuery, MessageDto, StorageHealthDto, TotpConfigurationListDto, TotpHistoryDto,
};
use crate::domain::models::BanTarget;
use crate::domain::service::StorageService;

#[tracing::instrument(skip_all)]
pub async fn list_totp_configurations(
    Authz(_identity): Authz,
    Extension(svc): Extension<Arc<StorageService>>,
) -> ApiResult<Json<TotpConfigurationListDto>> {
    let configurations = svc.list_totp_configurations().await?;
    Ok(Json(TotpConfigurationListDto {
        configurations: configurations.into_iter().map(Into::into).collect(),
    }))
}

#[tracing::instrument(skip_all, fields(id = id, actor = %identity.username()))]
pub async fn delete_totp_configuration(
    Authz(identity): Authz,
    Extension(svc): Extension<Arc<StorageService>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MessageDto>> {
    svc.delete_totp_configuration(id).await?;
    Ok(Json(MessageDto {
        message: "TOTP configuration deleted",
    }))
}

#[tracing::instrument(skip_all)]
pub async fn totp_history(
    Authz(_identity): Authz,
    Extension(svc): Extension<Arc<StorageService>>,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> ApiResult<Json<TotpHistoryDto>> {
    let report = svc.totp_history(query.limit).await?;
    Ok(Json(report.into()))
}

#[tracing::instrument(skip_all)]
pub async fn list_banned_users(
    Authz(_identity): Authz,
    Extension(svc): Extension<Arc<StorageService>>,
) -> ApiResult<Json<BannedUserListDto>> {
    let bans = svc.list_bans(BanTarget::User).await?;
    Ok(Json(BannedUserListDto {
        banned_users: bans.into_iter().map(Into::into).collect(),
    }))
}

#[tracing::instrument(skip_all, fields(actor = %identity.username()))]
pub async fn ban_user(
    Authz(identity): Authz,
    Extension(svc): Extension<Arc<StorageService>>,
    ApiJson(req): ApiJson<BanUserRequest>,
) -> ApiResult<(StatusCode, Json<BannedUserDto>)> {
    let ban = svc.ban(BanTarget::User, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ban.into())))
}

#[tracing::instrument(skip_all, fields(id = id, actor = %identity.username()))]
pub async fn unban_user(
    Authz(identity): Authz,
    Extension(svc): Extension<Arc<StorageService>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MessageDto>> {
    svc.unban(BanTarget::User, id).await?;
    Ok(Json(MessageDto {
        message: "User ban removed",
    }))
}

#[tracing::instrument(skip_all)]
pub async fn list_banned_ips(
    Authz(_identity): Authz,
    Extension(svc): Extension<Arc<StorageService>>,
) -> ApiResult<Json<BannedIpListDto>> {
    let bans = svc.list_bans(BanTarget::Ip).await?;
    Ok(Json(BannedIpListDto {
        banned_ips: bans.into_iter().map(Into::into).collect(),
    }))
}

#[tracing::instrument(skip_all, fields(actor = %identity.username()))]
pub async fn ban_ip(
    Authz(identity): Authz,
    Extension(svc): Extension<Arc<StorageService>>,
    ApiJson(req): ApiJson<BanIpRequest>,
) -> ApiResult<(StatusCode, Json<BannedIpDto>)> {
    let ban = svc.ban(BanTarget::Ip, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ban.into())))
}

#[tracing::instrument(skip_all, fields(id = id, actor = %identity.username()))]
pub async fn unban_ip(
    Authz(identity): Authz,
    Extension(svc): Extension<Arc<StorageService>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MessageDto>> {
    svc.unban(BanTarget::Ip, id).await?;
    Ok(Json(MessageDto {
        message: "IP ban removed",
    }))
}

#[tracing::instrument(skip_all)]
pub async fn storage_health(
    Authz(_identity): Authz,
    Extension(svc): Extension<Arc<StorageService>>,
) -> ApiResult<Json<StorageHealthDto>> {
    let storage_type = svc.health().await?;
    Ok(Json(StorageHealthDto {
        status: "ok",
        storage_type,
    }))
}
