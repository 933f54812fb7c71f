use std::time::Instant;

use axum::{
    extract::Request,
    http::{header::CONTENT_LENGTH, HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crate::http::handlers::MCP_ENDPOINT;

const DEFAULT_FILTER: &str = "info";

pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Names the surface a request hit, for the summary line.
pub fn route_kind(method: &Method, path: &str) -> &'static str {
    match path {
        MCP_ENDPOINT if *method == Method::OPTIONS => "preflight",
        MCP_ENDPOINT => "json-rpc",
        "/health" => "health",
        "/.well-known/mcp" => "discovery",
        _ => "other",
    }
}

/// The body size the client declared, if it sent a readable header.
pub fn declared_body_bytes(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let route = route_kind(&method, &path);
    let declared_bytes = declared_body_bytes(request.headers());
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started_at.elapsed().as_millis();

    info!(
        method = %method,
        path = %path,
        route,
        request_bytes = ?declared_bytes,
        status = status.as_u16(),
        duration_ms = elapsed_ms,
        "request summary"
    );

    if route == "json-rpc" && status.is_server_error() {
        warn!(
            request_bytes = ?declared_bytes,
            status = status.as_u16(),
            "json-rpc request failed at transport level"
        );
    }

    response
}
