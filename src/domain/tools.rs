//! Tools exposed via Model Context Protocol
//!
//! `schedule_call`, `get_call_logs` and `setup_twilio`, each delegating the
//! external side effect to the configured `TalentBackend`.

use rust_mcp_sdk::schema::{CallToolResult, ContentBlock, TextContent};
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::backend::{BookingRequest, CallLogEntry, TalentBackend, TrunkRequest};
use crate::domain::arguments::{
    decode, ArgumentError, CallLogsArgs, CallLogsQuery, ScheduleCall, ScheduleCallArgs,
    SetupTwilioArgs, DEFAULT_CALL_LOG_LIMIT, DEFAULT_TIME_ZONE,
};
use crate::domain::registry::{PropertySchema, Registry, ToolDescriptor};
use crate::{errors::AppError, AppState};

pub const SCHEDULE_CALL_TOOL: &str = "schedule_call";
pub const GET_CALL_LOGS_TOOL: &str = "get_call_logs";
pub const SETUP_TWILIO_TOOL: &str = "setup_twilio";

#[derive(Debug, Error)]
enum ToolError {
    #[error(transparent)]
    Arguments(#[from] ArgumentError),
    #[error(transparent)]
    Backend(#[from] AppError),
}

pub fn standard_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            SCHEDULE_CALL_TOOL,
            "Schedule a call with a candidate using Cal.com integration",
        )
        .property(PropertySchema::string("candidate_name", "Name of the candidate"))
        .property(PropertySchema::string("candidate_email", "Email of the candidate"))
        .property(PropertySchema::string("candidate_phone", "Phone number of the candidate"))
        .property(
            PropertySchema::string("time_zone", "Timezone for the call")
                .with_default(DEFAULT_TIME_ZONE),
        )
        .required(&["candidate_name", "candidate_email"]),
        ToolDescriptor::new(GET_CALL_LOGS_TOOL, "Retrieve call logs from the system")
            .property(
                PropertySchema::integer("limit", "Number of logs to retrieve")
                    .with_default(DEFAULT_CALL_LOG_LIMIT),
            )
            .property(PropertySchema::string("call_sid", "Specific call SID to retrieve")),
        ToolDescriptor::new(SETUP_TWILIO_TOOL, "Setup Twilio SIP trunk and phone number")
            .property(PropertySchema::string("friendly_name", "Friendly name for the setup"))
            .property(PropertySchema::string("elevenlabs_domain", "ElevenLabs domain for SIP"))
            .property(PropertySchema::string("voice_webhook_url", "Webhook URL for voice calls"))
            .required(&["friendly_name", "elevenlabs_domain", "voice_webhook_url"]),
    ]
}

pub fn build_tools_list(registry: &Registry) -> Value {
    json!({ "tools": registry.tools() })
}

pub async fn handle_tools_call(state: &AppState, params: &Map<String, Value>) -> Value {
    let name = params.get("name").map(display_name).unwrap_or_default();

    let Some(tool) = state.registry.tool_by_name(&name) else {
        let result = error_result(format!("Tool '{name}' not found"));
        return serde_json::to_value(result).expect("tool call result serialization");
    };

    let arguments = params.get("arguments");
    let result = match execute_tool(state.backend.as_ref(), &tool.name, arguments).await {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!(tool = %tool.name, error = %err, "tool call rejected");
            error_result(err.to_string())
        }
    };

    serde_json::to_value(result).expect("tool call result serialization")
}

async fn execute_tool(
    backend: &dyn TalentBackend,
    name: &str,
    arguments: Option<&Value>,
) -> Result<CallToolResult, ToolError> {
    match name {
        SCHEDULE_CALL_TOOL => {
            let call = decode::<ScheduleCallArgs>(name, arguments_object(name, arguments)?)?
                .validate()?;
            schedule_call(backend, call).await
        }
        GET_CALL_LOGS_TOOL => {
            let query = decode::<CallLogsArgs>(name, arguments_object(name, arguments)?)?
                .into_query();
            get_call_logs(backend, &query).await
        }
        SETUP_TWILIO_TOOL => {
            let args = decode::<SetupTwilioArgs>(name, arguments_object(name, arguments)?)?;
            setup_twilio(backend, args).await
        }
        _ => Ok(text_result(format!("Tool '{name}' executed successfully"))),
    }
}

#[derive(Debug, Serialize)]
struct ScheduledCall<'a> {
    success: bool,
    booking: BookingSummary<'a>,
}

#[derive(Debug, Serialize)]
struct BookingSummary<'a> {
    candidate_name: &'a str,
    candidate_email: &'a str,
    scheduled_time: &'a str,
    meeting_url: &'a str,
    booking_uid: &'a str,
}

async fn schedule_call(
    backend: &dyn TalentBackend,
    call: ScheduleCall,
) -> Result<CallToolResult, ToolError> {
    let request = BookingRequest {
        candidate_name: call.candidate_name,
        candidate_email: call.candidate_email,
        candidate_phone: call.candidate_phone,
        time_zone: call.time_zone,
    };
    let booking = backend.book_call(&request).await?;

    let body = ScheduledCall {
        success: true,
        booking: BookingSummary {
            candidate_name: &request.candidate_name,
            candidate_email: &request.candidate_email,
            scheduled_time: &booking.scheduled_time,
            meeting_url: &booking.meeting_url,
            booking_uid: &booking.booking_uid,
        },
    };

    Ok(text_result(
        serde_json::to_string_pretty(&body).expect("schedule_call result serialization"),
    ))
}

async fn get_call_logs(
    backend: &dyn TalentBackend,
    query: &CallLogsQuery,
) -> Result<CallToolResult, ToolError> {
    let logs = filter_call_logs(backend.list_call_logs().await?, query);

    Ok(text_result(
        serde_json::to_string_pretty(&logs).expect("get_call_logs result serialization"),
    ))
}

pub fn filter_call_logs(logs: Vec<CallLogEntry>, query: &CallLogsQuery) -> Vec<CallLogEntry> {
    logs.into_iter()
        .filter(|log| {
            query
                .call_sid
                .as_deref()
                .map_or(true, |call_sid| log.call_sid == call_sid)
        })
        .take(query.limit)
        .collect()
}

#[derive(Debug, Serialize)]
struct TwilioSetup<'a> {
    success: bool,
    setup: TrunkSummary<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrunkSummary<'a> {
    trunk_sid: &'a str,
    phone_number: &'a str,
    voice_webhook_url: Option<&'a str>,
    eleven_labs_sip_uri: &'a str,
}

/// The domain is interpolated as given, without validation.
pub fn elevenlabs_sip_uri(elevenlabs_domain: Option<&str>) -> String {
    format!("sip:{}.sip.11.ai", elevenlabs_domain.unwrap_or_default())
}

async fn setup_twilio(
    backend: &dyn TalentBackend,
    args: SetupTwilioArgs,
) -> Result<CallToolResult, ToolError> {
    let request = TrunkRequest {
        sip_uri: elevenlabs_sip_uri(args.elevenlabs_domain.as_deref()),
        friendly_name: args.friendly_name,
        voice_webhook_url: args.voice_webhook_url,
    };
    let trunk = backend.provision_trunk(&request).await?;

    let body = TwilioSetup {
        success: true,
        setup: TrunkSummary {
            trunk_sid: &trunk.trunk_sid,
            phone_number: &trunk.phone_number,
            voice_webhook_url: request.voice_webhook_url.as_deref(),
            eleven_labs_sip_uri: &request.sip_uri,
        },
    };

    Ok(text_result(
        serde_json::to_string_pretty(&body).expect("setup_twilio result serialization"),
    ))
}

fn arguments_object(
    name: &str,
    arguments: Option<&Value>,
) -> Result<Map<String, Value>, ArgumentError> {
    match arguments {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(_) => Err(ArgumentError::NotAnObject {
            target: name.to_string(),
        }),
    }
}

pub fn display_name(value: &Value) -> String {
    match value {
        Value::String(name) => name.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn text_result(text: String) -> CallToolResult {
    CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(text, None, None))],
        is_error: None,
        meta: None,
        structured_content: None,
    }
}

pub fn error_result(text: String) -> CallToolResult {
    CallToolResult {
        is_error: Some(true),
        ..text_result(text)
    }
}
