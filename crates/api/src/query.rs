//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for capped listings (`?limit=`), e.g. the most-popular
/// books endpoint.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// Default limit for capped listings.
pub const DEFAULT_LIMIT: i64 = 10;
