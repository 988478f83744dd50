use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::geo::CellId;

/// Flat permission tag attached to an actor. There is no hierarchy:
/// admin does not satisfy recipient-only gates, or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Recipient,
    Admin,
    Other,
}

impl Role {
    /// Parse a role token as presented by the transport layer. Unknown
    /// tokens collapse into `Other`, which no gate accepts.
    pub fn from_token(token: &str) -> Role {
        match token {
            "recipient" => Role::Recipient,
            "admin" => Role::Admin,
            _ => Role::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Recipient => "recipient",
            Role::Admin => "admin",
            Role::Other => "other",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// The role is trusted as given; any token outside the known set is kept
// as `Other` rather than rejected, so deserialization never fails.
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Role::from_token(&token))
    }
}

/// A registered user. Immutable after registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    /// Geospatial bucket computed at registration time.
    pub cell: CellId,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, role: Role, cell: CellId) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            role,
            cell,
            created_at: Utc::now(),
        }
    }
}

/// Registration payload. Names are not unique; every registration creates
/// a distinct identity.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub role: Role,
    pub lat: f64,
    pub lon: f64,
}
