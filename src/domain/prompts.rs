//! Prompt templates for the voice agent
//!
//! `candidate_screening` renders Ava's system prompt and `call_summary` asks
//! for a summary of a transcript. Unknown names render a placeholder message
//! rather than failing.

use rust_mcp_sdk::schema::TextContent;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::domain::arguments::{decode, ArgumentError, CallSummaryArgs, ScreeningPromptArgs};
use crate::domain::registry::{PromptDescriptor, Registry};
use crate::domain::tools::display_name;

pub const CANDIDATE_SCREENING_PROMPT: &str = "candidate_screening";
pub const CALL_SUMMARY_PROMPT: &str = "call_summary";

const SCREENING_TEMPLATE: &str = "You are Ava, an AI talent assistant. Your role is to:
1. Answer candidate questions about the company, culture, and job openings
2. Assess candidate fit and interest level
3. Schedule 15-minute screening calls when appropriate

Be conversational, helpful, and professional. Focus on understanding the candidate's background and motivations.";

pub fn standard_prompts() -> Vec<PromptDescriptor> {
    vec![
        PromptDescriptor::new(
            CANDIDATE_SCREENING_PROMPT,
            "Prompt for screening candidates during voice calls",
        )
        .argument(
            "candidate_background",
            "Background information about the candidate",
            false,
        )
        .argument("position", "Position the candidate is applying for", false),
        PromptDescriptor::new(CALL_SUMMARY_PROMPT, "Generate a summary of a candidate call")
            .argument("transcript", "Call transcript to summarize", true),
    ]
}

pub fn build_prompts_list(registry: &Registry) -> Value {
    json!({ "prompts": registry.prompts() })
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Serialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: TextContent,
}

#[derive(Debug, Serialize)]
pub struct RenderedPrompt {
    pub description: String,
    pub messages: Vec<PromptMessage>,
}

impl RenderedPrompt {
    fn single(description: &str, role: Role, text: String) -> Self {
        Self {
            description: description.to_string(),
            messages: vec![PromptMessage {
                role,
                content: TextContent::new(text, None, None),
            }],
        }
    }
}

pub fn handle_prompts_get(params: &Map<String, Value>) -> Value {
    let name = params.get("name").map(display_name).unwrap_or_default();
    let arguments = match params.get("arguments") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(arguments)) => arguments.clone(),
        Some(_) => {
            let error = ArgumentError::NotAnObject { target: name };
            return to_value(invalid_arguments(&error));
        }
    };

    let rendered = match render_prompt(&name, arguments) {
        Ok(rendered) => rendered,
        Err(err) => {
            tracing::warn!(prompt = %name, error = %err, "prompt arguments rejected");
            invalid_arguments(&err)
        }
    };

    to_value(rendered)
}

pub fn render_prompt(
    name: &str,
    arguments: Map<String, Value>,
) -> Result<RenderedPrompt, ArgumentError> {
    let rendered = match name {
        CANDIDATE_SCREENING_PROMPT => {
            let args: ScreeningPromptArgs = decode(name, arguments)?;
            RenderedPrompt::single(
                "Screening prompt for candidate calls",
                Role::System,
                screening_text(&args),
            )
        }
        CALL_SUMMARY_PROMPT => {
            let args: CallSummaryArgs = decode(name, arguments)?;
            RenderedPrompt::single(
                "Call summary generation",
                Role::User,
                summary_text(args.transcript()),
            )
        }
        _ => RenderedPrompt::single(
            "Prompt not found",
            Role::System,
            "Prompt not available".to_string(),
        ),
    };

    Ok(rendered)
}

fn screening_text(args: &ScreeningPromptArgs) -> String {
    let mut text = SCREENING_TEMPLATE.to_string();
    if let Some(background) = args.candidate_background() {
        text.push_str(&format!("\n\nCandidate Background: {background}"));
    }
    if let Some(position) = args.position() {
        text.push_str(&format!("\nPosition: {position}"));
    }
    text
}

fn summary_text(transcript: &str) -> String {
    format!(
        "Please provide a concise summary of this candidate call transcript:

{transcript}

Include:
- Key points discussed
- Candidate's background and interests
- Next steps or recommendations
- Overall assessment"
    )
}

fn invalid_arguments(error: &ArgumentError) -> RenderedPrompt {
    RenderedPrompt::single("Invalid prompt arguments", Role::System, error.to_string())
}

fn to_value(rendered: RenderedPrompt) -> Value {
    serde_json::to_value(rendered).expect("prompt result serialization")
}
