// User registration endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::debug;

use super::{service_error, ApiError};
use crate::app::AppState;
use crate::models::RegisterRequest;

/// POST /users/register — open to anyone; the role is recorded as given.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    debug!("Registration request for '{}'", payload.name);

    let user = state
        .registration
        .register(&payload.name, payload.role, payload.lat, payload.lon)
        .await
        .map_err(service_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "created",
            "user_id": user.id,
            "cell_id": user.cell
        })),
    ))
}
