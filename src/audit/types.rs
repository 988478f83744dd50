use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single persisted audit event. Append-only; never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    /// Free-text description of the completed action.
    pub action: String,
    /// Assigned when the consumer persists the entry, not when the
    /// producer enqueued it.
    pub timestamp: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn record(action: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            action: action.into(),
            timestamp: Utc::now(),
        }
    }
}
