// Durable store abstraction
// Pluggable persistence for users, help requests and the audit trail.

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::audit::AuditLogEntry;
use crate::config::StorageConfig;
use crate::geo::CellId;
use crate::models::{HelpRequest, RequestStatus, User};

/// Storage backend trait. Every operation is transactionally isolated by
/// the backend itself; callers never share a session across operations.
#[async_trait]
pub trait Store: Send + Sync {
    // User operations
    async fn insert_user(&self, user: &User) -> Result<(), StorageError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError>;

    async fn count_users_in_cell(&self, cell: &CellId) -> Result<u64, StorageError>;

    // Help request operations
    async fn insert_help_request(&self, request: &HelpRequest) -> Result<(), StorageError>;

    async fn get_help_request(&self, id: Uuid) -> Result<Option<HelpRequest>, StorageError>;

    async fn set_help_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<(), StorageError>;

    async fn count_help_requests(&self) -> Result<u64, StorageError>;

    // Audit trail operations. Append-only; entries are returned in the
    // order they were appended.
    async fn append_audit_entry(&self, entry: &AuditLogEntry) -> Result<(), StorageError>;

    async fn list_audit_entries(&self) -> Result<Vec<AuditLogEntry>, StorageError>;
}

/// Storage errors
#[derive(Debug, Clone)]
pub enum StorageError {
    NotFound,
    Connection(String),
    InvalidData(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::NotFound => write!(f, "Record not found"),
            StorageError::Connection(msg) => write!(f, "Connection error: {}", msg),
            StorageError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Create the storage backend selected by configuration. The SQLite
/// backend creates its database file and applies migrations on first use.
pub async fn create_store(config: &StorageConfig) -> Result<Arc<dyn Store>, StorageError> {
    match config {
        StorageConfig::Memory => Ok(Arc::new(memory::MemoryStore::new())),
        StorageConfig::Sqlite { path } => {
            Ok(Arc::new(sqlite::SqliteStore::connect(path).await?))
        }
    }
}
