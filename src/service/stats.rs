// Per-cell density read path

use std::sync::Arc;

use super::ServiceError;
use crate::geo::CellId;
use crate::storage::Store;

/// Counts users whose cell exactly matches the queried cell. Publicly
/// queryable: no role gate, no side effects.
#[derive(Clone)]
pub struct RegionalStats {
    store: Arc<dyn Store>,
}

impl RegionalStats {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn count_in_cell(&self, cell: &CellId) -> Result<u64, ServiceError> {
        Ok(self.store.count_users_in_cell(cell).await?)
    }
}
