use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a help request. `pending` is the initial state, `verified`
/// is terminal; there is no rejected or cancelled state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Verified,
}

impl RequestStatus {
    pub fn from_token(token: &str) -> Option<RequestStatus> {
        match token {
            "pending" => Some(RequestStatus::Pending),
            "verified" => Some(RequestStatus::Verified),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Verified => "verified",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A help request submitted by a recipient. The recipient id is an owner
/// reference, not ownership; requests are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpRequest {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub description: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl HelpRequest {
    pub fn new(recipient_id: Uuid, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_id,
            description: description.into(),
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRequestPayload {
    pub description: String,
}
