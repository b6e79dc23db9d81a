//! HTTP control surface
//!
//! - `GET  /health`
//! - `GET  /api/status`
//! - `POST /api/manipulate_star` with `{"action": ..., "parameters": {...}}`
//! - `POST /api/reset`
//!
//! Every route answers cross-origin requests, so a browser page can drive the star.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tower_http::cors::CorsLayer;

use crate::command::{Command, CommandError};
use crate::store::{StarStore, StatusSnapshot};

pub const SERVICE_NAME: &str = "googly-star";

/// Loosely typed so that a wrong-typed `action` or a null `parameters`
/// reaches command validation instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ManipulateRequest {
    pub action: Option<Value>,
    pub parameters: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ManipulateResponse {
    pub status: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub running: bool,
}

/// Consistent JSON error payload
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Anything that turns a manipulation request into a 400
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("malformed request body: {0}")]
    Body(#[from] JsonRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub fn router(store: StarStore) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/api/manipulate_star", post(manipulate_star))
        .route("/api/reset", post(reset))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

/// Serve the control surface until `shutdown` resolves
pub async fn serve(
    listener: tokio::net::TcpListener,
    store: StarStore,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let address = listener.local_addr()?;
    info!("API server listening on {address}");
    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await
        .inspect_err(|e| log::error!("API server error: {e}"))
}

/// Serve like [`serve`], then raise `stop` however the server ended so the
/// frame loop does not outlive the control surface
pub async fn serve_with_stop(
    listener: tokio::net::TcpListener,
    store: StarStore,
    shutdown: impl Future<Output = ()> + Send + 'static,
    stop: Arc<AtomicBool>,
) -> std::io::Result<()> {
    let served = serve(listener, store, shutdown).await;
    stop.store(true, Ordering::Release);
    served
}

async fn health(State(store): State<StarStore>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        running: store.health().running,
    })
}

async fn status(State(store): State<StarStore>) -> Json<StatusSnapshot> {
    Json(store.status())
}

async fn manipulate_star(
    State(store): State<StarStore>,
    payload: Result<Json<ManipulateRequest>, JsonRejection>,
) -> Result<Json<ManipulateResponse>, ApiError> {
    let (command, parameters) =
        parse_request(payload).inspect_err(|e| warn!("Rejected manipulation: {e}"))?;
    store.manipulate(&command);
    Ok(Json(ManipulateResponse {
        status: "ok".to_string(),
        action: command.action().to_string(),
        parameters: Some(parameters),
    }))
}

fn parse_request(
    payload: Result<Json<ManipulateRequest>, JsonRejection>,
) -> Result<(Command, Map<String, Value>), ApiError> {
    let Json(request) = payload?;
    let action = match request.action {
        None | Some(Value::Null) => return Err(CommandError::MissingAction.into()),
        Some(Value::String(action)) if action.is_empty() => {
            return Err(CommandError::MissingAction.into());
        }
        Some(Value::String(action)) => action,
        Some(other) => return Err(CommandError::UnknownAction(other.to_string()).into()),
    };
    let parameters = request.parameters.unwrap_or_default();
    let command = Command::parse(&action, &parameters)?;
    Ok((command, parameters))
}

async fn reset(State(store): State<StarStore>) -> Json<ManipulateResponse> {
    store.manipulate(&Command::Reset);
    Json(ManipulateResponse {
        status: "ok".to_string(),
        action: "reset".to_string(),
        parameters: None,
    })
}
