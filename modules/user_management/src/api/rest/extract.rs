//! Extractors whose rejections render as Problem Details instead of axum's
//! plain-text errors.

use std::convert::Infallible;

use axum::{
    extract::{FromRequest, FromRequestParts, OriginalUri, Path, Query, Request},
    http::{request::Parts, HeaderMap, Uri},
    Json,
};
use serde::de::DeserializeOwned;

use crate::api::rest::error::invalid_request;
use crate::api::rest::problem::ProblemResponse;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request path and, when the ingress assigned one, the `x-request-id` of the
/// current request. Carried into every problem the handlers produce.
#[derive(Debug, Clone, Default)]
pub struct ProblemContext {
    pub instance: String,
    pub request_id: Option<String>,
}

impl ProblemContext {
    fn new(original: Option<&OriginalUri>, uri: &Uri, headers: &HeaderMap) -> Self {
        let path = original.map(|o| o.0.path()).unwrap_or_else(|| uri.path());
        let request_id = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        Self {
            instance: path.to_string(),
            request_id,
        }
    }

    fn from_parts(parts: &Parts) -> Self {
        Self::new(parts.extensions.get(), &parts.uri, &parts.headers)
    }

    fn from_request(req: &Request) -> Self {
        Self::new(req.extensions().get(), req.uri(), req.headers())
    }
}

impl<S> FromRequestParts<S> for ProblemContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

/// `axum::Json` with a Problem Details rejection.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = ProblemContext::from_request(&req);
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(invalid_request(
                rejection.status(),
                rejection.body_text(),
                &ctx,
            )),
        }
    }
}

/// `axum::extract::Query` with a Problem Details rejection.
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(invalid_request(
                rejection.status(),
                rejection.body_text(),
                &ProblemContext::from_parts(parts),
            )),
        }
    }
}

/// `axum::extract::Path` with a Problem Details rejection.
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(invalid_request(
                rejection.status(),
                rejection.body_text(),
                &ProblemContext::from_parts(parts),
            )),
        }
    }
}
