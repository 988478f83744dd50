// HTTP surface
// Thin handlers: parse the request, delegate to the service types,
// translate ServiceError into a status code plus JSON body.

pub mod analytics;
pub mod health;
pub mod requests;
pub mod system;
pub mod users;

use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::Value;
use tracing::error;

use crate::models::Role;
use crate::service::ServiceError;

/// Standard error response for the API
pub type ApiError = (StatusCode, Json<Value>);

/// Create a standard error response
pub fn error_response(status: StatusCode, error: &str, description: &str) -> ApiError {
    (
        status,
        Json(serde_json::json!({
            "error": error,
            "error_description": description
        })),
    )
}

/// Create a forbidden error response
pub fn forbidden() -> ApiError {
    error_response(
        StatusCode::FORBIDDEN,
        "forbidden",
        "Insufficient permissions",
    )
}

/// Translate a core failure into its HTTP shape
pub fn service_error(err: ServiceError) -> ApiError {
    match err {
        ServiceError::Forbidden => forbidden(),
        ServiceError::NotFound(resource) => error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            &format!("{} not found", resource),
        ),
        ServiceError::Storage(e) => {
            error!("Storage failure: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "The operation could not be completed",
            )
        }
    }
}

/// Extract the role token attached to the request. Parsing the header is
/// the transport's job; the core only ever sees `Option<Role>`.
pub fn presented_role(headers: &HeaderMap) -> Option<Role> {
    headers
        .get("x-user-role")
        .and_then(|h| h.to_str().ok())
        .map(Role::from_token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn role_header_is_parsed_when_present() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-role", HeaderValue::from_static("admin"));
        assert_eq!(presented_role(&headers), Some(Role::Admin));

        headers.insert("x-user-role", HeaderValue::from_static("volunteer"));
        assert_eq!(presented_role(&headers), Some(Role::Other));
    }

    #[test]
    fn missing_role_header_yields_none() {
        let headers = HeaderMap::new();
        assert_eq!(presented_role(&headers), None);
    }
}
