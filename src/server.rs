//! HTTP surface.
//!
//! A single route, `GET /{*path}`, backed by [`RenditionService`]. The
//! handler does the cheap, non-blocking steps itself (route match, query
//! parsing) and hands the rest to tokio's blocking pool, because decoding,
//! resizing and file I/O all block.

use crate::config::ServerConfig;
use crate::imaging::CONTENT_TYPE;
use crate::request::{is_servable_path, parse_dimensions};
use crate::service::{Rendition, RenditionService, ServeError};
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderName, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use std::io;
use std::sync::Arc;

/// Response header reporting how the body was produced.
pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub service: Arc<RenditionService>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let service = RenditionService::from_config(&config);
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }
}

/// Build the router for `config`.
pub fn router(config: ServerConfig) -> Router {
    Router::new()
        .route("/{*path}", get(serve_image))
        .with_state(AppState::new(config))
}

async fn serve_image(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let path = path.trim_start_matches('/').to_string();
    if !is_servable_path(&path, &state.config.extensions) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let size = match parse_dimensions(&query) {
        Ok(size) => size,
        Err(e) => return ServeError::from(e).into_response(),
    };

    let service = Arc::clone(&state.service);
    let task_path = path.clone();
    let result = tokio::task::spawn_blocking(move || service.render(&task_path, size)).await;

    match result {
        Ok(Ok(rendition)) => {
            tracing::debug!(path, %size, cache = %rendition.cache, "served");
            rendition_response(rendition)
        }
        Ok(Err(e)) => {
            if !e.is_client_error() {
                tracing::error!(path, %size, error = %e, "request failed");
            }
            e.into_response()
        }
        Err(e) => {
            tracing::error!(path, %size, error = %e, "render task failed");
            internal_error()
        }
    }
}

fn rendition_response(rendition: Rendition) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, CONTENT_TYPE.to_string()),
            (X_CACHE, rendition.cache.to_string()),
        ],
        rendition.body,
    )
        .into_response()
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let status = if !self.is_client_error() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else if matches!(self.kind(), crate::service::ErrorKind::NotFound) {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::BAD_REQUEST
        };
        (status, self.public_message()).into_response()
    }
}

/// Bind and serve until Ctrl+C.
pub async fn run(config: ServerConfig) -> io::Result<()> {
    let addr = config.socket_addr().map_err(io::Error::other)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    match config.cache_root() {
        Some(root) => tracing::info!(
            %addr,
            images = %config.images_path.display(),
            cache = %root.display(),
            "listening"
        ),
        None => tracing::info!(
            %addr,
            images = %config.images_path.display(),
            "listening (cache disabled)"
        ),
    }

    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
