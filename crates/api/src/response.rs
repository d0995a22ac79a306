//! Shared response envelope types for API handlers.

use serde::Serialize;

/// Standard `{ "data": T }` success envelope.
///
/// Every success payload in the API goes through this wrapper so clients
/// can rely on one shape; errors use the `{ "error", "code" }` shape
/// produced by [`crate::error::AppError`].
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
