// Audit trail endpoint

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use super::{presented_role, service_error, ApiError};
use crate::app::AppState;
use crate::audit::AuditLogEntry;

/// GET /system/logs — admin role required. Entries come back in the
/// order the pipeline persisted them, which is enqueue order.
pub async fn view_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<AuditLogEntry>>, ApiError> {
    let entries = state
        .trail
        .view(presented_role(&headers))
        .await
        .map_err(service_error)?;

    Ok(Json(entries))
}
