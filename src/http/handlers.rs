//! Axum HTTP handlers for the web server
//!
//! Provides the primary Model Context Protocol endpoint, and general metadata endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_LENGTH, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::mcp::rpc::{json_rpc_result, Envelope};
use crate::mcp::server::dispatch;
use crate::AppState;

pub const MCP_ENDPOINT: &str = "/";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub mcp_endpoint: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn discovery() -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        mcp_endpoint: MCP_ENDPOINT,
    })
}

pub async fn mcp_endpoint(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let declared_length = content_length(&headers)?;
    if body.len() != declared_length {
        return Err(AppError::transport(format!(
            "Content-Length declared {declared_length} bytes but body has {}",
            body.len()
        )));
    }

    let payload: Value =
        serde_json::from_slice(&body).map_err(|err| AppError::transport(err.to_string()))?;
    let envelope = Envelope::from_value(payload)?;

    let result = dispatch(&state, &envelope.method, &envelope.params).await;

    Ok((StatusCode::OK, Json(json_rpc_result(envelope.id, result))).into_response())
}

fn content_length(headers: &HeaderMap) -> Result<usize, AppError> {
    let value = headers
        .get(CONTENT_LENGTH)
        .ok_or_else(|| AppError::transport("missing Content-Length header"))?;

    value
        .to_str()
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .ok_or_else(|| AppError::transport("invalid Content-Length header"))
}
