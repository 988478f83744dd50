// Core operations behind the HTTP surface
// Transport-agnostic: handlers parse the request, these types own the
// semantics (authorization, mutation, audit event).

pub mod access;
pub mod logs;
pub mod registration;
pub mod stats;
pub mod workflow;

pub use logs::AuditTrail;
pub use registration::RegistrationService;
pub use stats::RegionalStats;
pub use workflow::RequestWorkflow;

use crate::storage::StorageError;

/// Failure taxonomy for core operations
#[derive(Debug)]
pub enum ServiceError {
    /// The presented role does not satisfy the gate. Raised before any
    /// mutation is attempted.
    Forbidden,
    /// A referenced entity does not exist. No mutation occurred.
    NotFound(&'static str),
    /// The durable store rejected the primary mutation.
    Storage(StorageError),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Forbidden => write!(f, "Insufficient permissions"),
            ServiceError::NotFound(resource) => write!(f, "{} not found", resource),
            ServiceError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        ServiceError::Storage(e)
    }
}
