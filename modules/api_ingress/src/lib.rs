//! HTTP host for the server: owns the listener, the global middleware stack
//! and the merged OpenAPI document. Feature modules contribute routes and
//! their `utoipa` documents; this crate wires and serves them.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{middleware::from_fn, routing::get, Extension, Router};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

/// Module name used as the key of its section in the `modules` config bag.
pub const MODULE_NAME: &str = "api_ingress";

/// Owns the HTTP server and the OpenAPI document merged from all modules.
pub struct ApiIngress {
    config: ApiIngressConfig,
    openapi: OpenApi,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        let openapi = OpenApiBuilder::new()
            .info(
                InfoBuilder::new()
                    .title("User Management API")
                    .version(env!("CARGO_PKG_VERSION"))
                    .description(Some("CRUD API over the users store"))
                    .build(),
            )
            .build();
        Self { config, openapi }
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Merge a module's OpenAPI document into the served one.
    pub fn register_openapi(&mut self, doc: OpenApi) {
        let path_count = doc.paths.paths.len();
        self.openapi.merge(doc);
        tracing::debug!(path_count, "Merged module OpenAPI document");
    }

    pub fn openapi(&self) -> &OpenApi {
        &self.openapi
    }

    /// Wrap module routes with host endpoints and the global middleware stack.
    pub fn build_router(&self, api: Router) -> Result<Router> {
        let mut router = api
            .route("/health", get(web::health_check))
            .fallback(web::not_found);

        if self.config.enable_docs {
            let doc = Arc::new(serde_json::to_value(&self.openapi)?);
            tracing::info!(
                "Serving OpenAPI with {} paths",
                self.openapi.paths.paths.len()
            );
            router = router
                .route("/openapi.json", get(web::openapi_json))
                .route("/docs", get(web::serve_docs))
                .layer(Extension(doc));
        }

        // Each `.layer` wraps the previous ones, so layers are added innermost
        // first. Request flow (outermost to innermost):
        // SetRequestId -> PropagateRequestId -> Trace -> push_req_id -> Timeout -> CORS -> BodyLimit
        let x_request_id = request_id::header();

        // 1. Body limit
        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));
        // 2. CORS layer (if enabled)
        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        // 3. Handler timeout
        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            self.config.request_timeout_sec,
        )));
        // 4. Put request_id into extensions and the request span
        router = router.layer(from_fn(request_id::push_req_id_to_extensions));
        // 5. Trace with request_id/status/latency
        router = router.layer(request_id::create_trace_layer());
        // 6. Copy x-request-id onto the response
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
        // 7. Generate x-request-id when the client sent none
        router = router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId));

        Ok(router)
    }

    /// Bind `addr` and serve `router` until `shutdown` resolves, then drain
    /// in-flight requests.
    pub async fn serve<F>(&self, addr: &str, router: Router, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", addr, e))?;

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server bound on {}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("HTTP server shutting down gracefully");
            })
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}
