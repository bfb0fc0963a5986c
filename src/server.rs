//! HTTP front end
//!
//! Adapts axum requests to [`ProxyRequest`] and hands them to the handler.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{Method, Request, Uri},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span};
use uuid::Uuid;

use crate::client::ExecutorProvider;
use crate::handler::serve_request;
use crate::response::{response_headers, ProxyRequest, ProxyResponse, STATUS_OK, TEXT_PLAIN};

#[derive(Clone)]
pub struct AppState {
    provider: Arc<dyn ExecutorProvider>,
}

impl AppState {
    pub fn new(provider: impl ExecutorProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }
}

/// Create the router: the query endpoint at `path` plus `/health`
pub fn create_router(state: AppState, path: &str) -> Router {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    Router::new()
        .route("/health", get(health_check))
        .route(&path, get(query).post(query).options(preflight))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                info_span!(
                    "request",
                    id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}

/// Serve until Ctrl-C or SIGTERM
pub async fn serve(state: AppState, addr: SocketAddr, path: &str) -> Result<()> {
    let app = create_router(state, path);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("XDW query proxy listening on {} at {}", addr, path);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("XDW query proxy shutting down");
    Ok(())
}

async fn health_check() -> &'static str {
    "ok"
}

async fn query(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> ProxyResponse {
    let request = ProxyRequest {
        http_method: method.to_string(),
        path: uri.path().to_string(),
        query_string_parameters: params,
    };
    serve_request(state.provider.as_ref(), &request).await
}

async fn preflight() -> ProxyResponse {
    ProxyResponse {
        status_code: STATUS_OK,
        headers: response_headers(TEXT_PLAIN),
        body: String::new(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
