//! Typed tool and prompt arguments
//!
//! Raw `arguments` objects are decoded into one struct per tool or prompt,
//! then validated into the values the handlers act on.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::{Map, Value};
use thiserror::Error;

pub const DEFAULT_TIME_ZONE: &str = "America/New_York";
pub const DEFAULT_CALL_LOG_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum ArgumentError {
    #[error("Missing required fields: {}", .fields.join(" and "))]
    MissingRequired { fields: &'static [&'static str] },
    #[error("Invalid arguments for '{target}': arguments must be an object")]
    NotAnObject { target: String },
    #[error("Invalid arguments for '{target}': {source}")]
    Invalid {
        target: String,
        #[source]
        source: serde_json::Error,
    },
}

pub fn decode<T: DeserializeOwned>(
    target: &str,
    arguments: Map<String, Value>,
) -> Result<T, ArgumentError> {
    serde_json::from_value(Value::Object(arguments)).map_err(|source| ArgumentError::Invalid {
        target: target.to_string(),
        source,
    })
}

/// Empty strings count as absent, matching how required fields are checked.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct ScheduleCallArgs {
    pub candidate_name: Option<String>,
    pub candidate_email: Option<String>,
    pub candidate_phone: Option<String>,
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleCall {
    pub candidate_name: String,
    pub candidate_email: String,
    pub candidate_phone: Option<String>,
    pub time_zone: String,
}

impl ScheduleCallArgs {
    const REQUIRED: &'static [&'static str] = &["candidate_name", "candidate_email"];

    pub fn validate(self) -> Result<ScheduleCall, ArgumentError> {
        let (Some(candidate_name), Some(candidate_email)) = (
            non_empty(self.candidate_name),
            non_empty(self.candidate_email),
        ) else {
            return Err(ArgumentError::MissingRequired {
                fields: Self::REQUIRED,
            });
        };

        Ok(ScheduleCall {
            candidate_name,
            candidate_email,
            candidate_phone: non_empty(self.candidate_phone),
            time_zone: non_empty(self.time_zone).unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string()),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CallLogsArgs {
    pub limit: Option<usize>,
    pub call_sid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallLogsQuery {
    pub limit: usize,
    pub call_sid: Option<String>,
}

impl CallLogsArgs {
    pub fn into_query(self) -> CallLogsQuery {
        CallLogsQuery {
            limit: self.limit.unwrap_or(DEFAULT_CALL_LOG_LIMIT),
            call_sid: non_empty(self.call_sid),
        }
    }
}

/// Declared as required in the tool schema but accepted as given.
#[derive(Debug, Default, Deserialize)]
pub struct SetupTwilioArgs {
    pub friendly_name: Option<String>,
    pub elevenlabs_domain: Option<String>,
    pub voice_webhook_url: Option<String>,
}

/// Prompt arguments are interpolated into text, so any JSON scalar is
/// accepted and non-string values render as their JSON text.
fn interpolated_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct ScreeningPromptArgs {
    #[serde(default, deserialize_with = "interpolated_text")]
    pub candidate_background: Option<String>,
    #[serde(default, deserialize_with = "interpolated_text")]
    pub position: Option<String>,
}

impl ScreeningPromptArgs {
    pub fn candidate_background(&self) -> Option<&str> {
        self.candidate_background.as_deref().filter(|value| !value.is_empty())
    }

    pub fn position(&self) -> Option<&str> {
        self.position.as_deref().filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CallSummaryArgs {
    #[serde(default, deserialize_with = "interpolated_text")]
    pub transcript: Option<String>,
}

impl CallSummaryArgs {
    pub fn transcript(&self) -> &str {
        self.transcript.as_deref().unwrap_or_default()
    }
}
