//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with one route per directory operation
//! - Wire up middleware (request ID, tracing, metrics, deadline)
//! - Serve on a listener until shutdown is signalled

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderName, Request as HttpRequest},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ListenerConfig;
use crate::directory::EmployeeDirectory;
use crate::http::response::deadline_exceeded;
use crate::http::{employees, RequestId, X_REQUEST_ID};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<EmployeeDirectory>,
}

/// HTTP server for the employee directory.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(directory: Arc<EmployeeDirectory>, config: &ListenerConfig) -> Self {
        let state = AppState { directory };
        let router = Self::build_router(state, Duration::from_secs(config.request_timeout_secs));
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route("/api/v1", get(employees::list_all).post(employees::create))
            .route("/api/v1/", get(employees::list_all).post(employees::create))
            .route("/api/v1/search/{term}", get(employees::search_by_name))
            .route("/api/v1/highestSalary", get(employees::highest_salary))
            .route(
                "/api/v1/topTenHighestEarningEmployeeNames",
                get(employees::top_ten_earners),
            )
            .route(
                "/api/v1/{id}",
                get(employees::get_by_id).delete(employees::delete_by_id),
            )
            .route("/health", get(health))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &HttpRequest<Body>| {
                        let request_id = request
                            .headers()
                            .get(X_REQUEST_ID)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("-");
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id,
                        )
                    }))
                    .layer(PropagateRequestIdLayer::new(request_id))
                    .layer(middleware::from_fn(track_metrics))
                    .layer(middleware::from_fn_with_state(request_timeout, enforce_deadline)),
            )
    }

    /// The router, for serving elsewhere or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut signal = shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = signal.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Cut off a request that outlives `limit`, answering with an error body
/// that quotes the request id.
async fn enforce_deadline(
    State(limit): State<Duration>,
    request_id: RequestId,
    request: Request,
    next: Next,
) -> Response {
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => deadline_exceeded(&request_id, limit),
    }
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), start);
    response
}
