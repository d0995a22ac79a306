//! Registration, login, and current-user handlers.
//!
//! These issue the tokens the rest of the API consumes; the catalog and
//! rating operations only ever see the resolved {user id, role} pair.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use bouquin_core::error::CoreError;
use bouquin_core::roles::{self, REGISTRABLE_ROLES};
use bouquin_db::models::user::{CreateUser, UserResponse};
use bouquin_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    /// One of `reader`, `writer`, `publisher`. Defaults to `reader`.
    pub role: Option<String>,
    pub bio: Option<String>,
    pub institution_name: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Successful register/login payload.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// POST /auth/register
///
/// Create an account and issue a token. Admin accounts cannot be
/// self-registered.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let role = input.role.as_deref().unwrap_or(roles::ROLE_READER);
    if !REGISTRABLE_ROLES.contains(&role) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Cannot register with role '{role}'. Must be one of: {}",
            REGISTRABLE_ROLES.join(", ")
        ))));
    }
    if role == roles::ROLE_PUBLISHER
        && input
            .institution_name
            .as_deref()
            .map_or(true, |name| name.trim().is_empty())
    {
        return Err(AppError::Core(CoreError::Validation(
            "Publisher accounts require an institution name".to_string(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    // A duplicate email violates uq_users_email and surfaces as 409.
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email.clone(),
            password_hash,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            role: role.to_string(),
            bio: input.bio.clone(),
            institution_name: input.institution_name.clone(),
        },
    )
    .await?;

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AuthResponse {
                user: user.into_response(),
                token,
            },
        }),
    ))
}

/// POST /auth/login
///
/// Verify credentials and issue a token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "This account has been deactivated".into(),
        )));
    }

    let verified = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !verified {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(DataResponse {
        data: AuthResponse {
            user: user.into_response(),
            token,
        },
    }))
}

/// GET /auth/me
///
/// The authenticated user's own profile.
pub async fn me(user: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let profile = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "User",
                id: user.user_id,
            })
        })?;
    Ok(Json(DataResponse {
        data: profile.into_response(),
    }))
}
