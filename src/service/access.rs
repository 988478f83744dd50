// Request-scoped role authorization

use super::ServiceError;
use crate::models::Role;

/// Exact-match role gate. The permission model is flat: admin does not
/// implicitly satisfy recipient-only gates, and vice versa. An absent
/// role is always rejected. Authorization runs before any mutation.
pub fn authorize(required: Role, presented: Option<Role>) -> Result<(), ServiceError> {
    match presented {
        Some(role) if role == required => Ok(()),
        _ => Err(ServiceError::Forbidden),
    }
}
