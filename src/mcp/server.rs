//! The central Model Context Protocol engine
//!
//! Maps JSON-RPC method names onto the handlers, answers `initialize`, and
//! writes one audit line per dispatched call.

use rust_mcp_sdk::schema::{
    Implementation, InitializeResult, ProtocolVersion, ServerCapabilities,
    ServerCapabilitiesPrompts, ServerCapabilitiesResources, ServerCapabilitiesTools,
};
use serde_json::{Map, Value};
use tracing::info;

use crate::domain::{
    prompts::{build_prompts_list, handle_prompts_get},
    resources::{build_resources_list, handle_resources_read},
    tools::{build_tools_list, handle_tools_call},
};
use crate::mcp::rpc::{is_method_error, method_not_found};
use crate::AppState;

pub const SUPPORTED_PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Initialize,
    ToolsList,
    ToolsCall,
    ResourcesList,
    ResourcesRead,
    PromptsList,
    PromptsGet,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::Initialize,
        Method::ToolsList,
        Method::ToolsCall,
        Method::ResourcesList,
        Method::ResourcesRead,
        Method::PromptsList,
        Method::PromptsGet,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Initialize => "initialize",
            Method::ToolsList => "tools/list",
            Method::ToolsCall => "tools/call",
            Method::ResourcesList => "resources/list",
            Method::ResourcesRead => "resources/read",
            Method::PromptsList => "prompts/list",
            Method::PromptsGet => "prompts/get",
        }
    }
}

/// Runs one request and returns the value for the envelope's `result`
/// member. Every call is independent of the ones before it.
pub async fn dispatch(state: &AppState, method: &Value, params: &Map<String, Value>) -> Value {
    let audit_params = redact_audit_params(params);
    let resolved = method.as_str().and_then(Method::from_name);

    let result = match resolved {
        Some(Method::Initialize) => initialize_result(),
        Some(Method::ToolsList) => build_tools_list(&state.registry),
        Some(Method::ToolsCall) => handle_tools_call(state, params).await,
        Some(Method::ResourcesList) => build_resources_list(&state.registry),
        Some(Method::ResourcesRead) => handle_resources_read(params),
        Some(Method::PromptsList) => build_prompts_list(&state.registry),
        Some(Method::PromptsGet) => handle_prompts_get(params),
        None => method_not_found(method),
    };

    info!(
        method = %method,
        params = %audit_params,
        outcome = if is_method_error(&result) { "failure" } else { "success" },
        "mcp action audited"
    );

    result
}

pub fn initialize_result() -> Value {
    let initialize_result = InitializeResult {
        server_info: Implementation {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: None,
            description: Some(env!("CARGO_PKG_DESCRIPTION").to_string()),
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools {
                list_changed: Some(true),
            }),
            resources: Some(ServerCapabilitiesResources {
                subscribe: Some(true),
                list_changed: Some(true),
            }),
            prompts: Some(ServerCapabilitiesPrompts {
                list_changed: Some(true),
            }),
            ..Default::default()
        },
        protocol_version: ProtocolVersion::V2024_11_05.into(),
        instructions: None,
        meta: None,
    };

    serde_json::to_value(initialize_result).expect("initialize result serialization")
}

pub fn redact_audit_params(params: &Map<String, Value>) -> Value {
    redact_audit_value(&Value::Object(params.clone()))
}

pub fn redact_audit_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| {
                    if is_sensitive_key(key) {
                        (key.clone(), Value::String("[REDACTED]".to_string()))
                    } else {
                        (key.clone(), redact_audit_value(item))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_audit_value).collect()),
        _ => value.clone(),
    }
}

pub fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.trim().to_ascii_lowercase();
    matches!(
        normalized.as_str(),
        "authorization" | "bearer" | "api_key" | "apikey" | "auth_token" | "account_sid"
    ) || normalized.contains("token")
        || normalized.contains("secret")
        || normalized.contains("password")
        || normalized.contains("credential")
}
