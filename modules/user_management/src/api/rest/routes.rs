use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers, problem};
use crate::domain::service::Service;

/// OpenAPI description of the users endpoints.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_users,
        handlers::get_user,
        handlers::create_user,
        handlers::update_user,
        handlers::delete_user,
    ),
    components(schemas(
        dto::UserDto,
        dto::CreateUserReq,
        dto::UpdateUserReq,
        dto::UserListDto,
        problem::Problem,
    )),
    tags((name = "users", description = "User management"))
)]
pub struct UsersApiDoc;

pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        // GET /users, POST /users
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        // GET, PUT, DELETE /users/{id}
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .layer(Extension(service))
}
