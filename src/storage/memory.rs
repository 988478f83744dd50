// In-memory storage backend
// Uses HashMap with Mutex for thread-safe access; suitable for
// development and testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use super::{StorageError, Store};
use crate::audit::AuditLogEntry;
use crate::geo::CellId;
use crate::models::{HelpRequest, RequestStatus, User};

/// In-memory storage backend
pub struct MemoryStore {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    help_requests: Arc<Mutex<HashMap<Uuid, HelpRequest>>>,
    // Vec keeps append order, which is the audit trail's total order.
    audit_entries: Arc<Mutex<Vec<AuditLogEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            help_requests: Arc::new(Mutex::new(HashMap::new())),
            audit_entries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StorageError> {
        let mut users = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(format!("Lock poisoned: {}", e)))?;

        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        let users = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(format!("Lock poisoned: {}", e)))?;

        Ok(users.get(&id).cloned())
    }

    async fn count_users_in_cell(&self, cell: &CellId) -> Result<u64, StorageError> {
        let users = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(format!("Lock poisoned: {}", e)))?;

        Ok(users.values().filter(|u| &u.cell == cell).count() as u64)
    }

    async fn insert_help_request(&self, request: &HelpRequest) -> Result<(), StorageError> {
        let mut requests = self
            .help_requests
            .lock()
            .map_err(|e| StorageError::Connection(format!("Lock poisoned: {}", e)))?;

        requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn get_help_request(&self, id: Uuid) -> Result<Option<HelpRequest>, StorageError> {
        let requests = self
            .help_requests
            .lock()
            .map_err(|e| StorageError::Connection(format!("Lock poisoned: {}", e)))?;

        Ok(requests.get(&id).cloned())
    }

    async fn set_help_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<(), StorageError> {
        let mut requests = self
            .help_requests
            .lock()
            .map_err(|e| StorageError::Connection(format!("Lock poisoned: {}", e)))?;

        match requests.get_mut(&id) {
            Some(request) => {
                request.status = status;
                Ok(())
            }
            None => Err(StorageError::NotFound),
        }
    }

    async fn count_help_requests(&self) -> Result<u64, StorageError> {
        let requests = self
            .help_requests
            .lock()
            .map_err(|e| StorageError::Connection(format!("Lock poisoned: {}", e)))?;

        Ok(requests.len() as u64)
    }

    async fn append_audit_entry(&self, entry: &AuditLogEntry) -> Result<(), StorageError> {
        let mut entries = self
            .audit_entries
            .lock()
            .map_err(|e| StorageError::Connection(format!("Lock poisoned: {}", e)))?;

        entries.push(entry.clone());
        Ok(())
    }

    async fn list_audit_entries(&self) -> Result<Vec<AuditLogEntry>, StorageError> {
        let entries = self
            .audit_entries
            .lock()
            .map_err(|e| StorageError::Connection(format!("Lock poisoned: {}", e)))?;

        Ok(entries.clone())
    }
}
