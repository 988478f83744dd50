// Help request endpoints

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{presented_role, service_error, ApiError};
use crate::app::AppState;
use crate::models::CreateRequestPayload;

// The role header carries no caller identity, so every submitted request
// is attributed to a fixed placeholder recipient.
const PLACEHOLDER_RECIPIENT: Uuid = Uuid::nil();

/// POST /requests/create — recipient role required. The payload carries
/// only the description.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateRequestPayload>,
) -> Result<Json<Value>, ApiError> {
    let request = state
        .workflow
        .create(
            presented_role(&headers),
            PLACEHOLDER_RECIPIENT,
            &payload.description,
        )
        .await
        .map_err(service_error)?;

    Ok(Json(json!({
        "message": "Request submitted",
        "request_id": request.id
    })))
}

/// PATCH /requests/verify/:request_id — admin role required.
pub async fn verify(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    state
        .workflow
        .verify(presented_role(&headers), request_id)
        .await
        .map_err(service_error)?;

    Ok(Json(json!({ "status": "verified" })))
}
