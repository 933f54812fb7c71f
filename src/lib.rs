use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

pub mod backend;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;

use backend::TalentBackend;
use domain::registry::Registry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub backend: Arc<dyn TalentBackend>,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, backend: Arc<dyn TalentBackend>) -> Self {
        Self { registry, backend }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route(
            http::handlers::MCP_ENDPOINT,
            post(http::handlers::mcp_endpoint).options(http::cors::preflight),
        )
        .route("/health", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn(http::cors::allow_any_origin))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::backend::MockTalentBackend;

    use super::*;

    fn app() -> Router {
        let state = AppState::new(
            Arc::new(Registry::standard().expect("standard registry")),
            Arc::new(MockTalentBackend::new()),
        );
        build_app(state)
    }

    fn rpc_request(body: &str) -> Request<Body> {
        Request::builder()
            .uri("/")
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body.to_string()))
            .expect("request build")
    }

    async fn send(request: Request<Body>) -> Response {
        app().oneshot(request).await.expect("request execution")
    }

    async fn body_bytes(response: Response) -> axum::body::Bytes {
        response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes()
    }

    async fn rpc(body: Value) -> Value {
        let response = send(rpc_request(&body.to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let body = body_bytes(response).await;
        serde_json::from_slice(&body).expect("valid json response")
    }

    fn tool_text(response: &Value) -> Value {
        let text = response["result"]["content"][0]["text"]
            .as_str()
            .expect("text block");
        serde_json::from_str(text).expect("json text block")
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = send(
            Request::builder()
                .uri("/health")
                .method("GET")
                .body(Body::empty())
                .expect("request build"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, "{\"status\":\"ok\"}");
    }

    #[tokio::test]
    async fn discovery_points_at_root() {
        let response = send(
            Request::builder()
                .uri("/.well-known/mcp")
                .method("GET")
                .body(Body::empty())
                .expect("request build"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value =
            serde_json::from_slice(&body_bytes(response).await).expect("valid json response");
        assert_eq!(body["name"], "ava-mcp-server");
        assert_eq!(body["mcp_endpoint"], "/");
    }

    #[tokio::test]
    async fn root_get_is_not_allowed() {
        let response = send(
            Request::builder()
                .uri("/")
                .method("GET")
                .body(Body::empty())
                .expect("request build"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn preflight_returns_cors_headers_and_empty_body() {
        let response = send(
            Request::builder()
                .uri("/")
                .method("OPTIONS")
                .header(header::ORIGIN, "https://agent.example.com")
                .body(Body::empty())
                .expect("request build"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn initialize_returns_fixed_identity() {
        let response = rpc(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": { "name": "test-client", "version": "1.0.0" }
            }
        }))
        .await;

        assert_eq!(response["jsonrpc"], "2.0");
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(response["result"]["serverInfo"]["name"], "ava-mcp-server");
        assert_eq!(
            response["result"]["capabilities"]["prompts"]["listChanged"],
            json!(true)
        );
    }

    #[tokio::test]
    async fn response_id_echoes_request_id() {
        for id in [json!(42), json!("req-7"), json!(null)] {
            let response = rpc(json!({
                "jsonrpc": "2.0",
                "id": id.clone(),
                "method": "tools/list",
                "params": {}
            }))
            .await;
            assert_eq!(response["id"], id);
        }

        let response = rpc(json!({ "jsonrpc": "2.0", "method": "prompts/list" })).await;
        assert!(response["id"].is_null());
        assert_eq!(response["result"]["prompts"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn tools_list_matches_registry() {
        let response = rpc(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/list",
            "params": { "unexpected": true }
        }))
        .await;

        let names: Vec<_> = response["result"]["tools"]
            .as_array()
            .expect("tools array")
            .iter()
            .map(|tool| tool["name"].as_str().expect("tool name"))
            .collect();
        assert_eq!(names, ["schedule_call", "get_call_logs", "setup_twilio"]);
        assert_eq!(
            response["result"]["tools"][0]["inputSchema"]["properties"]["time_zone"]["default"],
            "America/New_York"
        );
        assert!(response["result"]["tools"][1]["inputSchema"]
            .get("required")
            .is_none());
    }

    #[tokio::test]
    async fn schedule_call_round_trip() {
        let response = rpc(json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {
                "name": "schedule_call",
                "arguments": {
                    "candidate_name": "John Doe",
                    "candidate_email": "john@example.com",
                    "candidate_phone": "+1234567890"
                }
            }
        }))
        .await;

        let body = tool_text(&response);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["booking"]["booking_uid"], "booking_123456");
        assert_eq!(body["booking"]["candidate_email"], "john@example.com");
    }

    #[tokio::test]
    async fn schedule_call_missing_fields_is_error_result() {
        let response = rpc(json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": { "name": "schedule_call", "arguments": { "candidate_name": "John" } }
        }))
        .await;

        assert_eq!(response["result"]["isError"], json!(true));
        let text = response["result"]["content"][0]["text"]
            .as_str()
            .expect("text block");
        assert!(text.contains("candidate_name"));
        assert!(text.contains("candidate_email"));
    }

    #[tokio::test]
    async fn get_call_logs_by_sid() {
        let response = rpc(json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "tools/call",
            "params": { "name": "get_call_logs", "arguments": { "call_sid": "CA123456789" } }
        }))
        .await;

        let logs = tool_text(&response);
        assert_eq!(logs.as_array().map(Vec::len), Some(1));
        assert_eq!(logs[0]["call_sid"], "CA123456789");
    }

    #[tokio::test]
    async fn read_knowledge_base() {
        let response = rpc(json!({
            "jsonrpc": "2.0",
            "id": 6,
            "method": "resources/read",
            "params": { "uri": "knowledge://base" }
        }))
        .await;

        let text = response["result"]["contents"][0]["text"]
            .as_str()
            .expect("resource text");
        let document: Value = serde_json::from_str(text).expect("json resource");
        assert_eq!(document["company_info"]["name"], "TechCorp");
    }

    #[tokio::test]
    async fn read_unknown_resource_is_soft_not_found() {
        let response = rpc(json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "resources/read",
            "params": { "uri": "bookings://data" }
        }))
        .await;

        assert_eq!(response["result"]["contents"][0]["text"], "Resource not found");
        assert_eq!(response["result"]["contents"][0]["mimeType"], "text/plain");
    }

    #[tokio::test]
    async fn prompts_get_renders_template() {
        let response = rpc(json!({
            "jsonrpc": "2.0",
            "id": 8,
            "method": "prompts/get",
            "params": {
                "name": "candidate_screening",
                "arguments": { "position": "Product Manager" }
            }
        }))
        .await;

        let text = response["result"]["messages"][0]["content"]["text"]
            .as_str()
            .expect("prompt text");
        assert!(text.ends_with("\nPosition: Product Manager"));
        assert!(!text.contains("Candidate Background:"));
    }

    #[tokio::test]
    async fn unknown_method_is_nested_in_result() {
        let response = rpc(json!({
            "jsonrpc": "2.0",
            "id": 9,
            "method": "foo/bar",
            "params": {}
        }))
        .await;

        assert_eq!(response["id"], 9);
        assert!(response.get("error").is_none());
        assert_eq!(
            response["result"],
            json!({ "error": { "code": -32601, "message": "Method not found: foo/bar" } })
        );
    }

    #[tokio::test]
    async fn malformed_json_is_transport_failure() {
        let response = send(rpc_request("{\"jsonrpc\": \"2.0\", \"method\": ")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let body = body_bytes(response).await;
        assert!(!body.is_empty());
    }

    #[tokio::test]
    async fn missing_content_length_is_transport_failure() {
        let response = send(
            Request::builder()
                .uri("/")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#))
                .expect("request build"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_bytes(response).await, "missing Content-Length header");
    }

    #[tokio::test]
    async fn invalid_content_length_is_transport_failure() {
        let response = send(
            Request::builder()
                .uri("/")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::CONTENT_LENGTH, "abc")
                .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#))
                .expect("request build"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(body_bytes(response).await, "invalid Content-Length header");
    }

    #[tokio::test]
    async fn content_length_mismatch_is_transport_failure() {
        let body = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
        let response = send(
            Request::builder()
                .uri("/")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::CONTENT_LENGTH, "5")
                .body(Body::from(body))
                .expect("request build"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let expected = format!(
            "Content-Length declared 5 bytes but body has {}",
            body.len()
        );
        assert_eq!(body_bytes(response).await, expected.as_str());
    }

    #[tokio::test]
    async fn oversized_request_is_not_capped() {
        let transcript = "Candidate: tell me more about the role. ".repeat(80_000);
        let request = json!({
            "jsonrpc": "2.0",
            "id": 10,
            "method": "prompts/get",
            "params": {
                "name": "call_summary",
                "arguments": { "transcript": transcript.as_str() }
            }
        })
        .to_string();
        assert!(request.len() > 3 * 1024 * 1024);

        let response = send(rpc_request(&request)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value =
            serde_json::from_slice(&body_bytes(response).await).expect("valid json response");
        let text = body["result"]["messages"][0]["content"]["text"]
            .as_str()
            .expect("prompt text");
        assert!(text.contains(&transcript));
    }

    #[tokio::test]
    async fn non_object_body_is_transport_failure() {
        let response = send(rpc_request("[1, 2, 3]")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_bytes(response).await,
            "request body must be a JSON object"
        );
    }
}
