use std::sync::Arc;

use axum::{http::StatusCode, response::Json, Extension};
use tracing::{error, info, warn};

use crate::api::rest::dto::{CreateUserReq, ListUsersQuery, UpdateUserReq, UserDto, UserListDto};
use crate::api::rest::error::{id_mismatch, map_domain_error, user_not_found};
use crate::api::rest::extract::{ApiJson, ApiPath, ApiQuery, ProblemContext};
use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::contract::model::UserId;
use crate::domain::service::Service;

/// List users, optionally filtered by `?isActive=true|false`
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users ordered by surname, then forename", body = UserListDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
    ApiQuery(query): ApiQuery<ListUsersQuery>,
    ctx: ProblemContext,
) -> Result<Json<UserListDto>, ProblemResponse> {
    info!("Listing users with query: {:?}", query);

    match svc.list_users(query.is_active).await {
        Ok(users) => Ok(Json(UserListDto {
            items: users.into_iter().map(UserDto::from).collect(),
        })),
        Err(e) => {
            error!("Failed to list users: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Get a specific user by id
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    ApiPath(id): ApiPath<UserId>,
    ctx: ProblemContext,
) -> Result<Json<UserDto>, ProblemResponse> {
    info!("Getting user with id: {}", id);

    match svc.get_user(id).await {
        Ok(Some(user)) => Ok(Json(UserDto::from(user))),
        Ok(None) => Err(user_not_found(id, &ctx)),
        Err(e) => {
            error!("Failed to get user {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserReq,
    responses(
        (status = 201, description = "Created user", body = UserDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 409, description = "Email already in use", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn create_user(
    ctx: ProblemContext,
    Extension(svc): Extension<Arc<Service>>,
    ApiJson(req_body): ApiJson<CreateUserReq>,
) -> Result<(StatusCode, Json<UserDto>), ProblemResponse> {
    info!("Creating user with email: {}", req_body.email);

    match svc.create_user(req_body.into()).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(UserDto::from(user)))),
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Replace the editable fields of an existing user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserReq,
    responses(
        (status = 204, description = "User updated"),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 409, description = "Email already in use", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn update_user(
    ctx: ProblemContext,
    Extension(svc): Extension<Arc<Service>>,
    ApiPath(id): ApiPath<UserId>,
    ApiJson(req_body): ApiJson<UpdateUserReq>,
) -> Result<StatusCode, ProblemResponse> {
    info!("Updating user {}", id);

    if req_body.id != id {
        warn!("Rejecting update: path id {} != body id {}", id, req_body.id);
        return Err(id_mismatch(id, req_body.id, &ctx));
    }

    match svc.update_user(req_body.into()).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(user_not_found(id, &ctx)),
        Err(e) => {
            error!("Failed to update user {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Delete a user by id
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn delete_user(
    Extension(svc): Extension<Arc<Service>>,
    ApiPath(id): ApiPath<UserId>,
    ctx: ProblemContext,
) -> Result<StatusCode, ProblemResponse> {
    info!("Deleting user: {}", id);

    match svc.delete_user(id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(user_not_found(id, &ctx)),
        Err(e) => {
            error!("Failed to delete user {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}
