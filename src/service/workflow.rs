// Help request lifecycle

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::{access, ServiceError};
use crate::audit::AuditPipeline;
use crate::models::{HelpRequest, RequestStatus, Role};
use crate::storage::Store;

/// Two-state lifecycle: requests are created `pending` by recipients and
/// move to `verified` by admins. No other transitions exist.
#[derive(Clone)]
pub struct RequestWorkflow {
    store: Arc<dyn Store>,
    audit: AuditPipeline,
}

impl RequestWorkflow {
    pub fn new(store: Arc<dyn Store>, audit: AuditPipeline) -> Self {
        Self { store, audit }
    }

    /// Submit a new request. Requires the recipient role.
    pub async fn create(
        &self,
        presented: Option<Role>,
        recipient_id: Uuid,
        description: &str,
    ) -> Result<HelpRequest, ServiceError> {
        access::authorize(Role::Recipient, presented)?;

        let request = HelpRequest::new(recipient_id, description);
        self.store.insert_help_request(&request).await?;

        info!(
            "Help request {} submitted by recipient {}",
            request.id, request.recipient_id
        );
        self.audit.enqueue(format!(
            "Help request {} submitted by recipient {}",
            request.id, request.recipient_id
        ));

        Ok(request)
    }

    /// Mark a request verified. Requires the admin role; `NotFound` if no
    /// such request exists, in which case nothing is mutated or audited.
    ///
    /// The write is re-applied unconditionally: verifying an already
    /// verified request rewrites the status and emits another audit
    /// event. The status outcome is idempotent, the audit trail is not.
    pub async fn verify(
        &self,
        presented: Option<Role>,
        request_id: Uuid,
    ) -> Result<(), ServiceError> {
        access::authorize(Role::Admin, presented)?;

        if self.store.get_help_request(request_id).await?.is_none() {
            return Err(ServiceError::NotFound("Help request"));
        }

        self.store
            .set_help_request_status(request_id, RequestStatus::Verified)
            .await?;

        info!("Admin verified request {}", request_id);
        self.audit
            .enqueue(format!("Admin verified request {}", request_id));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;
    use std::time::Duration;

    fn workflow(store: Arc<dyn Store>) -> RequestWorkflow {
        RequestWorkflow::new(store.clone(), AuditPipeline::spawn(store))
    }

    #[tokio::test]
    async fn create_requires_the_recipient_role() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let workflow = workflow(store.clone());

        for presented in [None, Some(Role::Admin), Some(Role::Other)] {
            let result = workflow.create(presented, Uuid::new_v4(), "need water").await;
            assert!(matches!(result, Err(ServiceError::Forbidden)));
        }

        // Nothing was persisted by the rejected attempts.
        assert_eq!(store.count_help_requests().await.unwrap(), 0);

        let request = workflow
            .create(Some(Role::Recipient), Uuid::new_v4(), "need water")
            .await
            .unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(store.count_help_requests().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn verify_requires_the_admin_role() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let workflow = workflow(store.clone());

        let request = workflow
            .create(Some(Role::Recipient), Uuid::new_v4(), "need shelter")
            .await
            .unwrap();

        let result = workflow.verify(Some(Role::Recipient), request.id).await;
        assert!(matches!(result, Err(ServiceError::Forbidden)));

        workflow.verify(Some(Role::Admin), request.id).await.unwrap();
        let stored = store.get_help_request(request.id).await.unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Verified);
    }

    #[tokio::test]
    async fn verify_on_an_unknown_id_is_not_found_and_audits_nothing() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let workflow = workflow(store.clone());

        let result = workflow.verify(Some(Role::Admin), Uuid::new_v4()).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));

        // Give the consumer a moment; the trail must stay empty.
        drop(workflow);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.list_audit_entries().await.unwrap().is_empty());
    }
}
