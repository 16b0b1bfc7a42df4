use std::sync::Arc;

use axum::{
    extract::{Extension, OriginalUri},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use crate::request_id::XRequestId;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Serves the pre-rendered OpenAPI document.
pub async fn openapi_json(Extension(doc): Extension<Arc<Value>>) -> Response {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json((*doc).clone()),
    )
        .into_response()
}

pub async fn serve_docs() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>User Management API</title>
  <script src="https://unpkg.com/@stoplight/elements@latest/web-components.min.js"></script>
  <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements@latest/styles.min.css">
</head>
<body>
  <elements-api apiDescriptionUrl="/openapi.json" router="hash" layout="sidebar"></elements-api>
</body>
</html>"#,
    )
}

/// Problem response for routes nobody registered.
pub async fn not_found(
    OriginalUri(uri): OriginalUri,
    rid: Option<Extension<XRequestId>>,
) -> Response {
    let mut body = json!({
        "type": "about:blank",
        "title": "Not Found",
        "status": 404,
        "detail": format!("No route for {}", uri.path()),
        "instance": uri.path(),
    });
    if let Some(Extension(XRequestId(id))) = rid {
        body["request_id"] = Value::String(id);
    }

    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "application/problem+json")],
        body.to_string(),
    )
        .into_response()
}
