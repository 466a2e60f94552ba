//! HTTP server whose requests each run in their own correlation scope.

use crate::config::ServerSettings;
use crate::middleware::correlation_scope;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::HeaderName,
    http::header::InvalidHeaderName,
    middleware,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use structured_logger::{StructuredLogger, metadata};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Server error types
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid correlation header name: {0}")]
    InvalidHeader(#[from] InvalidHeaderName),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared handler state
#[derive(Clone)]
struct AppState {
    logger: StructuredLogger,
}

/// HTTP server for correlated request handling
pub struct CorrelationServer {
    /// Logger handed to handlers
    logger: StructuredLogger,
    /// Listener and header settings
    settings: ServerSettings,
}

impl CorrelationServer {
    /// Create a new server
    pub fn new(logger: StructuredLogger, settings: ServerSettings) -> Self {
        Self { logger, settings }
    }

    /// Build the application router
    pub fn router(&self) -> Result<Router, ServerError> {
        let header = HeaderName::try_from(self.settings.correlation_header.as_str())?;
        Ok(router(self.logger.clone(), header))
    }

    /// Run the HTTP server
    pub async fn run(self) -> Result<(), ServerError> {
        let app = self.router()?;
        let listen_addr = self.settings.listen_addr.trim();

        let listener = TcpListener::bind(listen_addr).await?;
        info!(listen_addr = %listen_addr, "Correlation server listening");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Build the router with the correlation middleware outermost.
///
/// The trace layer sits inside the scope so its request events carry the
/// correlation id too.
pub fn router(logger: StructuredLogger, header: HeaderName) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/work", get(work_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .layer(middleware::from_fn_with_state(header, correlation_scope))
        .with_state(AppState {
            logger: logger.with_context("WorkHandler"),
        })
}

/// Handler for /health endpoint
async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct WorkParams {
    #[serde(default = "default_delay_ms")]
    delay_ms: u64,
}

fn default_delay_ms() -> u64 {
    10
}

/// Handler for /work endpoint
///
/// Logs, suspends, and hands part of the work to a spawned subtask, all
/// without passing the correlation id around.
async fn work_handler(
    State(state): State<AppState>,
    Query(params): Query<WorkParams>,
) -> Json<Value> {
    let logger = state.logger;
    report(logger.info(
        "work started",
        None,
        Some(metadata(json!({ "delayMs": params.delay_ms }))),
    ));

    tokio::time::sleep(Duration::from_millis(params.delay_ms)).await;

    let audit_logger = logger.clone();
    let audit = request_context::spawn(async move {
        report(audit_logger.verbose("audit recorded", Some("Audit"), None));
        request_context::correlation_id()
    });
    let audited_as = match audit.await {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "Audit subtask failed");
            None
        }
    };

    report(logger.info(
        "work finished",
        None,
        Some(metadata(json!({ "auditedAs": audited_as }))),
    ));

    Json(json!({ "correlationId": request_context::correlation_id() }))
}

fn report(result: common::Result<()>) {
    if let Err(e) = result {
        warn!(error = %e, "Failed to write log record");
    }
}
