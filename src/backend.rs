//! Scheduling and telephony integrations behind the tools
//!
//! Handlers only talk to a [`TalentBackend`]. The shipped implementation,
//! [`MockTalentBackend`], answers with canned data so the server runs without
//! Cal.com or Twilio credentials.

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub candidate_name: String,
    pub candidate_email: String,
    pub candidate_phone: Option<String>,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub scheduled_time: String,
    pub meeting_url: String,
    pub booking_uid: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CallLogEntry {
    pub id: u64,
    pub call_sid: String,
    pub from_number: String,
    pub to_number: String,
    pub call_status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrunkRequest {
    pub friendly_name: Option<String>,
    pub sip_uri: String,
    pub voice_webhook_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedTrunk {
    pub trunk_sid: String,
    pub phone_number: String,
}

#[async_trait]
pub trait TalentBackend: Send + Sync {
    async fn book_call(&self, request: &BookingRequest) -> Result<Booking, AppError>;

    /// Most recent first.
    async fn list_call_logs(&self) -> Result<Vec<CallLogEntry>, AppError>;

    async fn provision_trunk(&self, request: &TrunkRequest) -> Result<ProvisionedTrunk, AppError>;
}

const MOCK_PHONE_NUMBER: &str = "+447883320201";

#[derive(Debug, Default)]
pub struct MockTalentBackend;

impl MockTalentBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TalentBackend for MockTalentBackend {
    async fn book_call(&self, request: &BookingRequest) -> Result<Booking, AppError> {
        tracing::debug!(
            candidate_email = %request.candidate_email,
            time_zone = %request.time_zone,
            "booking simulated call"
        );

        Ok(Booking {
            scheduled_time: "2024-01-15T10:00:00Z".to_string(),
            meeting_url: "https://cal.com/meeting/abc123".to_string(),
            booking_uid: "booking_123456".to_string(),
        })
    }

    async fn list_call_logs(&self) -> Result<Vec<CallLogEntry>, AppError> {
        Ok(vec![
            CallLogEntry {
                id: 1,
                call_sid: "CA123456789".to_string(),
                from_number: "+1234567890".to_string(),
                to_number: MOCK_PHONE_NUMBER.to_string(),
                call_status: "completed".to_string(),
                created_at: "2024-01-15T09:30:00Z".to_string(),
            },
            CallLogEntry {
                id: 2,
                call_sid: "CA987654321".to_string(),
                from_number: "+1987654321".to_string(),
                to_number: MOCK_PHONE_NUMBER.to_string(),
                call_status: "completed".to_string(),
                created_at: "2024-01-15T08:15:00Z".to_string(),
            },
        ])
    }

    async fn provision_trunk(&self, request: &TrunkRequest) -> Result<ProvisionedTrunk, AppError> {
        tracing::debug!(sip_uri = %request.sip_uri, "provisioning simulated trunk");

        Ok(ProvisionedTrunk {
            trunk_sid: "TK123456789".to_string(),
            phone_number: MOCK_PHONE_NUMBER.to_string(),
        })
    }
}
