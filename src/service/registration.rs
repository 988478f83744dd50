// User onboarding with geospatial bucketing

use std::sync::Arc;

use tracing::info;

use super::ServiceError;
use crate::audit::AuditPipeline;
use crate::geo::CellIndexer;
use crate::models::{Role, User};
use crate::storage::Store;

/// Creates users and assigns their geographic cell. Registration is open:
/// no role gate, no name uniqueness.
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn Store>,
    audit: AuditPipeline,
    indexer: Arc<dyn CellIndexer>,
    resolution: u8,
}

impl RegistrationService {
    pub fn new(
        store: Arc<dyn Store>,
        audit: AuditPipeline,
        indexer: Arc<dyn CellIndexer>,
        resolution: u8,
    ) -> Self {
        Self {
            store,
            audit,
            indexer,
            resolution,
        }
    }

    /// Persist a new user and enqueue the corresponding audit event. The
    /// cell is computed before the insert so the stored user already
    /// carries its bucket.
    pub async fn register(
        &self,
        name: &str,
        role: Role,
        lat: f64,
        lon: f64,
    ) -> Result<User, ServiceError> {
        let cell = self.indexer.cell_index(lat, lon, self.resolution);
        let user = User::new(name, role, cell);

        self.store.insert_user(&user).await?;

        info!(
            "Registered user '{}' with role {} in cell {}",
            user.name, user.role, user.cell
        );
        self.audit
            .enqueue(format!("User {} registered with role {}", user.name, user.role));

        Ok(user)
    }
}
