//! HTTP Server for the matrix API.
//!
//! # API Endpoints
//!
//! | Method | Path                          | Description                        |
//! |--------|-------------------------------|------------------------------------|
//! | GET    | `/`, `/matrix`                | Available operations and a sample  |
//! | GET    | `/matrix/{operation}?file=…`  | Run an operation on a CSV file     |
//! | GET    | `/health`                     | Health check                       |

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

use super::types::{status_for, text_response, HealthResponse, MatrixQuery};
use crate::config::ServerConfig;
use crate::context::RequestContext;
use crate::error::{MatrixError, ServerError, ServerResult};
use crate::transform::pipeline::MatrixService;

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: MatrixService,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// State backed by the filesystem provider described by `config`.
    pub fn new(config: ServerConfig) -> Self {
        let service = MatrixService::new(Arc::new(config.content_provider()));
        Self::with_service(config, service)
    }

    pub fn with_service(config: ServerConfig, service: MatrixService) -> Self {
        Self {
            service,
            config: Arc::new(config),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::ACCEPT]);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        info_span!(
            "http_request",
            request_id = %Uuid::new_v4(),
            method = %request.method(),
            uri = %request.uri()
        )
    });

    Router::new()
        .route("/", get(list_operations))
        .route("/matrix", get(list_operations))
        .route("/matrix/", get(process_without_operation))
        .route("/matrix/{operation}", get(process_matrix))
        .route("/health", get(health))
        .layer(trace)
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server and block until it has shut down.
pub async fn start_server(config: ServerConfig) -> ServerResult<()> {
    let addr = config.bind_addr();
    let shutdown_timeout = config.shutdown_timeout();
    let app = router(AppState::new(config.clone()));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        address = %addr,
        url = %config.public_url(),
        data_dir = %config.data_dir.display(),
        request_timeout_secs = config.request_timeout_secs,
        "starting HTTP server"
    );

    let shutdown = CancellationToken::new();
    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown.clone().cancelled_owned());
    let mut handle = tokio::spawn(async move { server.await });

    tokio::select! {
        result = &mut handle => return join_result(result),
        _ = shutdown_signal() => {}
    }

    info!(timeout_secs = shutdown_timeout.as_secs(), "gracefully shutting down server");
    shutdown.cancel();

    match tokio::time::timeout(shutdown_timeout, &mut handle).await {
        Ok(result) => {
            join_result(result)?;
            info!("server stopped gracefully");
            Ok(())
        }
        Err(_) => {
            handle.abort();
            warn!("graceful shutdown timed out, aborting in-flight requests");
            Ok(())
        }
    }
}

fn join_result(result: Result<std::io::Result<()>, JoinError>) -> ServerResult<()> {
    result
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(ServerError::from)
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(signal = "SIGINT", "shutdown signal received"),
        _ = terminate => info!(signal = "SIGTERM", "shutdown signal received"),
    }
}

/// Operations banner
async fn list_operations(State(state): State<AppState>) -> Response {
    let banner = state.service.operations_banner(&state.config.public_url());
    text_response(StatusCode::OK, banner)
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "league-matrix".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        operations: state
            .service
            .list_operations()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

async fn process_matrix(
    State(state): State<AppState>,
    Path(operation): Path<String>,
    Query(query): Query<MatrixQuery>,
) -> Response {
    run_pipeline(&state, &operation, &query.file).await
}

/// `/matrix/` with nothing after the slash.
async fn process_without_operation(
    State(state): State<AppState>,
    Query(query): Query<MatrixQuery>,
) -> Response {
    run_pipeline(&state, "", &query.file).await
}

async fn run_pipeline(state: &AppState, operation: &str, file_path: &str) -> Response {
    let timeout = state.config.request_timeout();
    let ctx = RequestContext::with_timeout(timeout);

    let result = tokio::time::timeout(
        timeout,
        state.service.process_matrix(&ctx, operation, file_path),
    )
    .await
    .unwrap_or_else(|_| Err(MatrixError::DeadlineExceeded));

    match result {
        Ok(body) => {
            info!(operation, file_path, "matrix operation completed");
            text_response(StatusCode::OK, body)
        }
        Err(e) if e.is_cancelled() => {
            info!(operation, file_path, "request cancelled by client");
            e.into_response()
        }
        Err(e) if e.is_deadline_exceeded() => {
            error!(operation, file_path, "request timeout");
            e.into_response()
        }
        Err(e) => {
            error!(
                operation,
                file_path,
                error = %e,
                status_code = status_for(&e).as_u16(),
                "matrix operation failed"
            );
            e.into_response()
        }
    }
}
