//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not meet the requirement, so authorization is enforced at the type
//! level in route handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bouquin_core::error::CoreError;
use bouquin_core::roles::{self, ROLE_ADMIN};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires a role that may own books (`writer` or `publisher`). Rejects
/// with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn writers_only(RequireBookCreator(user): RequireBookCreator) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireBookCreator(pub AuthUser);

impl FromRequestParts<AppState> for RequireBookCreator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !roles::can_own_books(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Writer or Publisher role required".into(),
            )));
        }
        Ok(RequireBookCreator(user))
    }
}
