use std::sync::Arc;

use axum::{Extension, Json};
use console_api::{ApiJson, ApiPath, ApiResult, Authz};

use super::dto::{
    ChangePasswordRequest, GroupDto, GroupListDto, MessageDto, UpdateUserRequest, UserDto,
    UserListDto,
};
use crate::domain::service::DirectoryService;

#[tracing::instrument(skip_all)]
pub async fn list_users(
    Authz(_identity): Authz,
    Extension(svc): Extension<Arc<DirectoryService>>,
) -> ApiResult<Json<UserListDto>> {
    let users = svc.list_users().await?;
    Ok(Json(UserListDto {
        users: users.into_iter().map(UserDto::from).collect(),
        ldap_server: svc.server_address(),
    }))
}

#[tracing::instrument(skip_all, fields(uid = %uid))]
pub async fn get_user(
    Authz(_identity): Authz,
    Extension(svc): Extension<Arc<DirectoryService>>,
    ApiPath(uid): ApiPath<String>,
) -> ApiResult<Json<UserDto>> {
    let user = svc.get_user(&uid).await?;
    Ok(Json(user.into()))
}

#[tracing::instrument(skip_all, fields(uid = %uid, actor = %identity.username()))]
pub async fn update_user(
    Authz(identity): Authz,
    Extension(svc): Extension<Arc<DirectoryService>>,
    ApiPath(uid): ApiPath<String>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<UserDto>> {
    let user = svc.update_user(&uid, req.into()).await?;
    Ok(Json(user.into()))
}

#[tracing::instrument(skip_all, fields(uid = %uid, actor = %identity.username()))]
pub async fn change_password(
    Authz(identity): Authz,
    Extension(svc): Extension<Arc<DirectoryService>>,
    ApiPath(uid): ApiPath<String>,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> ApiResult<Json<MessageDto>> {
    svc.change_password(&uid, &req.new_password, &req.repeat_password)
        .await?;
    Ok(Json(MessageDto {
        message: "Password changed successfully",
    }))
}

#[tracing::instrument(skip_all)]
pub async fn list_groups(
    Authz(_identity): Authz,
    Extension(svc): Extension<Arc<DirectoryService>>,
) -> ApiResult<Json<GroupListDto>> {
    let groups = svc.list_groups().await?;
    Ok(Json(GroupListDto {
        groups: groups.into_iter().map(GroupDto::from).collect(),
        ldap_server: svc.server_address(),
    }))
}
