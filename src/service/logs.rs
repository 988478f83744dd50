// Admin view of the audit trail

use std::sync::Arc;

use super::{access, ServiceError};
use crate::audit::AuditLogEntry;
use crate::models::Role;
use crate::storage::Store;

/// Admin-gated read of the persisted audit trail, in enqueue order.
#[derive(Clone)]
pub struct AuditTrail {
    store: Arc<dyn Store>,
}

impl AuditTrail {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn view(&self, presented: Option<Role>) -> Result<Vec<AuditLogEntry>, ServiceError> {
        access::authorize(Role::Admin, presented)?;
        Ok(self.store.list_audit_entries().await?)
    }
}
