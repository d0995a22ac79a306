use crate::types::DbId;

/// Domain-level error taxonomy shared by every operation in the core.
///
/// Each variant carries enough context to render a user-facing message;
/// `Internal` is the only variant whose detail is hidden from callers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// A required field is missing or a value is out of range.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A unique key would be violated (e.g. a duplicate rating insert).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No valid identity was attached to the request.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not the owner and not an admin.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Storage or other unexpected failure; logged in full, opaque to callers.
    #[error("Internal error: {0}")]
    Internal(String),
}
