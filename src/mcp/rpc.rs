//! JSON-RPC protocol representations and formatting utilities
//!
//! Decodes the request envelope and wraps handler output in a result envelope
//! that echoes the caller's id.

use rust_mcp_sdk::schema::{JsonrpcResultResponse, RequestId, Result as McpResult};
use serde_json::{json, Map, Value};

use crate::errors::AppError;

pub const METHOD_NOT_FOUND: i64 = -32601;

/// A decoded JSON-RPC request. `id` and `method` are kept as raw JSON so an
/// absent or oddly typed value can still be echoed back.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub id: Option<Value>,
    pub method: Value,
    pub params: Map<String, Value>,
}

impl Envelope {
    pub fn from_value(payload: Value) -> Result<Self, AppError> {
        let Value::Object(mut object) = payload else {
            return Err(AppError::transport("request body must be a JSON object"));
        };

        let params = match object.remove("params") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(params)) => params,
            Some(_) => return Err(AppError::transport("params must be a JSON object")),
        };

        Ok(Self {
            id: object.remove("id"),
            method: object.remove("method").unwrap_or(Value::Null),
            params,
        })
    }
}

/// The not-found error travels inside `result`, not as a JSON-RPC `error`
/// member; existing clients read it from there.
pub fn method_not_found(method: &Value) -> Value {
    let method = match method {
        Value::String(method) => method.clone(),
        other => other.to_string(),
    };

    json!({
        "error": {
            "code": METHOD_NOT_FOUND,
            "message": format!("Method not found: {method}")
        }
    })
}

pub fn is_method_error(result: &Value) -> bool {
    result.get("error").is_some() || result.get("isError") == Some(&Value::Bool(true))
}

pub fn json_rpc_result(id: Option<Value>, result: Value) -> Value {
    if let Some(request_id) = id.as_ref().and_then(value_to_request_id) {
        let extra = result.as_object().cloned();
        let response = JsonrpcResultResponse::new(request_id, McpResult { meta: None, extra });
        return serde_json::to_value(response).expect("jsonrpc result response serialization");
    }

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

pub fn value_to_request_id(value: &Value) -> Option<RequestId> {
    if let Some(string_id) = value.as_str() {
        return Some(RequestId::String(string_id.to_string()));
    }

    value.as_i64().map(RequestId::Integer)
}
