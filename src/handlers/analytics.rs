// Regional density endpoint

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use super::{service_error, ApiError};
use crate::app::AppState;
use crate::geo::CellId;

/// GET /analytics/region/:cell_id — publicly queryable.
pub async fn regional_stats(
    State(state): State<AppState>,
    Path(cell_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let cell = CellId::new(cell_id);
    let total_users = state
        .stats
        .count_in_cell(&cell)
        .await
        .map_err(service_error)?;

    Ok(Json(json!({
        "cell_id": cell,
        "total_users": total_users
    })))
}
