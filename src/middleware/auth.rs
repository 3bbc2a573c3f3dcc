//! Authentication middleware
//!
//! Verifies session tokens on protected routes.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::{error::AppError, routes::metrics::record_auth_failure, AppState};

/// Authenticated caller, inserted into request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Extract the Authorization header and return the bearer token
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Short fingerprint of a token for logs
pub fn token_fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(&hasher.finalize()[..8])
}

/// Authentication middleware
///
/// A missing header, a non-bearer scheme and a token that fails
/// verification all produce the same 401 response.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token);

    let Some(token) = token else {
        debug!("Missing or malformed authorization header");
        record_auth_failure();
        return Err(AppError::InvalidCredential);
    };

    let user_id = match state.sessions.verify(token) {
        Ok(subject) => subject,
        Err(e) => {
            debug!(token = %token_fingerprint(token), "Session token rejected");
            record_auth_failure();
            return Err(e);
        }
    };

    debug!(user_id = %user_id, "User authenticated");
    request.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(request).await)
}
