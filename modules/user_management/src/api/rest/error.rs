use axum::http::StatusCode;

use crate::api::rest::extract::ProblemContext;
use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::contract::model::UserId;
use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    ctx: &ProblemContext,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_code(code)
        .with_instance(ctx.instance.clone());

    let problem = match &ctx.request_id {
        Some(id) => problem.with_request_id(id.clone()),
        None => problem,
    };

    ProblemResponse(problem)
}

pub fn user_not_found(id: UserId, ctx: &ProblemContext) -> ProblemResponse {
    from_parts(
        StatusCode::NOT_FOUND,
        "USERS_NOT_FOUND",
        "User not found",
        format!("User with id {} was not found", id),
        ctx,
    )
}

pub fn id_mismatch(path_id: UserId, body_id: UserId, ctx: &ProblemContext) -> ProblemResponse {
    from_parts(
        StatusCode::BAD_REQUEST,
        "USERS_ID_MISMATCH",
        "Bad request",
        format!("Path id {} does not match body id {}", path_id, body_id),
        ctx,
    )
}

/// Malformed path, query or body rejected before reaching a handler.
pub fn invalid_request(
    status: StatusCode,
    detail: impl Into<String>,
    ctx: &ProblemContext,
) -> ProblemResponse {
    // Well-formed JSON with bad data is 422 in axum; treated as any other bad input
    let status = if status == StatusCode::UNPROCESSABLE_ENTITY {
        StatusCode::BAD_REQUEST
    } else {
        status
    };
    from_parts(status, "USERS_VALIDATION", "Invalid request", detail, ctx)
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, ctx: &ProblemContext) -> ProblemResponse {
    match e {
        DomainError::EmailAlreadyExists { email } => from_parts(
            StatusCode::CONFLICT,
            "USERS_EMAIL_CONFLICT",
            "Email already exists",
            format!("Email '{}' is already in use", email),
            ctx,
        ),
        DomainError::Validation { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "USERS_VALIDATION",
            "Validation error",
            format!("{}", e),
            ctx,
        ),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                ctx,
            )
        }
    }
}
