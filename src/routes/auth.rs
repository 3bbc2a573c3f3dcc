//! Account endpoints
//!
//! - `POST /api/auth/register`
//! - `POST /api/auth/login`
//! - `GET /api/auth/me` (protected)

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{
    auth::password::MIN_PASSWORD_LEN,
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    routes::ApiJson,
    store::{UserProfile, UserRecord},
    AppState,
};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid")
});

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Token plus the account it was issued for
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserProfile,
}

impl RegisterRequest {
    fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty()
        {
            return Err(AppError::BadRequest(
                "name, email and password are required".to_string(),
            ));
        }
        if !EMAIL_PATTERN.is_match(self.email.trim()) {
            return Err(AppError::BadRequest("Invalid email address".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

fn issue_for(state: &AppState, user: &UserRecord) -> AppResult<AuthResponse> {
    let issued = state.sessions.issue(&user.id)?;
    Ok(AuthResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        user: user.profile(),
    })
}

/// Create an account and sign it in
#[instrument(skip_all)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    request.validate()?;

    let password_hash = state.passwords.hash(&request.password).await?;
    let user = UserRecord::new(&request.name, &request.email, password_hash);

    state.library.create_user(&user).await?;
    info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(issue_for(&state, &user)?)))
}

/// Exchange email and password for a session token
///
/// An unknown email and a wrong password give the same 401 after the same
/// bcrypt work.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest(
            "email and password are required".to_string(),
        ));
    }

    let user = state.library.find_user_by_email(&request.email).await?;

    let verified = match user {
        Some(user) => state
            .passwords
            .verify(&request.password, &user.password_hash)
            .await
            .then_some(user),
        None => {
            state.passwords.verify_unknown(&request.password).await;
            None
        }
    };

    let Some(user) = verified else {
        warn!("Login rejected");
        return Err(AppError::InvalidCredential);
    };

    Ok(Json(issue_for(&state, &user)?))
}

/// Profile of the signed-in user
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<UserProfile>> {
    let record = state
        .library
        .find_user_by_id(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(record.profile()))
}
