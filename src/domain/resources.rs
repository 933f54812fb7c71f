//! Model Context Protocol static resource providers
//!
//! Only the knowledge base has content; every other URI, registered or not,
//! reads back as a plain-text "Resource not found" body without an error flag.

use rust_mcp_sdk::schema::{ReadResourceContent, ReadResourceResult, TextResourceContents};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::domain::registry::{Registry, ResourceDescriptor};

pub const KNOWLEDGE_BASE_URI: &str = "knowledge://base";
pub const CALL_TRANSCRIPTS_URI: &str = "transcripts://calls";
pub const BOOKING_DATA_URI: &str = "bookings://data";

const RESOURCE_NOT_FOUND: &str = "Resource not found";

pub fn standard_resources() -> Vec<ResourceDescriptor> {
    vec![
        resource(
            KNOWLEDGE_BASE_URI,
            "Knowledge Base",
            "Company knowledge base for candidate questions",
            "application/json",
        ),
        resource(
            CALL_TRANSCRIPTS_URI,
            "Call Transcripts",
            "Transcripts from voice calls with candidates",
            "text/plain",
        ),
        resource(
            BOOKING_DATA_URI,
            "Booking Data",
            "Scheduled call booking information",
            "application/json",
        ),
    ]
}

fn resource(uri: &str, name: &str, description: &str, mime_type: &str) -> ResourceDescriptor {
    ResourceDescriptor {
        uri: uri.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        mime_type: mime_type.to_string(),
    }
}

pub fn build_resources_list(registry: &Registry) -> Value {
    json!({ "resources": registry.resources() })
}

#[derive(Debug, Serialize)]
pub struct KnowledgeBase {
    pub company_info: CompanyInfo,
    pub job_openings: Vec<JobOpening>,
}

#[derive(Debug, Serialize)]
pub struct CompanyInfo {
    pub name: &'static str,
    pub culture: &'static str,
    pub perks: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct JobOpening {
    pub title: &'static str,
    pub department: &'static str,
    pub location: &'static str,
}

pub fn knowledge_base() -> KnowledgeBase {
    KnowledgeBase {
        company_info: CompanyInfo {
            name: "TechCorp",
            culture: "Innovation-driven, collaborative environment",
            perks: vec!["Remote work", "Health insurance", "Stock options"],
        },
        job_openings: vec![
            JobOpening {
                title: "Software Engineer",
                department: "Engineering",
                location: "Remote",
            },
            JobOpening {
                title: "Product Manager",
                department: "Product",
                location: "San Francisco",
            },
        ],
    }
}

/// Reads one resource. The requested `uri` is echoed back exactly as sent,
/// including a missing (`null`) or non-string value.
pub fn handle_resources_read(params: &Map<String, Value>) -> Value {
    let requested = params.get("uri").cloned().unwrap_or(Value::Null);
    let uri = requested.as_str().unwrap_or_default();

    let (mime_type, text) = if uri == KNOWLEDGE_BASE_URI {
        (
            "application/json",
            serde_json::to_string_pretty(&knowledge_base())
                .expect("knowledge base serialization"),
        )
    } else {
        tracing::debug!(uri = %requested, "read of unknown resource");
        ("text/plain", RESOURCE_NOT_FOUND.to_string())
    };

    let mut result = serde_json::to_value(ReadResourceResult {
        contents: vec![ReadResourceContent::from(TextResourceContents {
            meta: None,
            mime_type: Some(mime_type.to_string()),
            text,
            uri: uri.to_string(),
        })],
        meta: None,
    })
    .expect("read resource result serialization");

    // `TextResourceContents` only carries string URIs.
    if !requested.is_string() {
        result["contents"][0]["uri"] = requested;
    }

    result
}
