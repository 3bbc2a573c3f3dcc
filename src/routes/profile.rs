//! Profile update endpoint

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    routes::ApiJson,
    store::{ProfileUpdate, UserProfile},
    AppState,
};

/// `PATCH /api/user/update` with `{name?, image?}`
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> AppResult<Json<UserProfile>> {
    if update.is_empty() {
        return Err(AppError::BadRequest(
            "Provide a name or an image to update".to_string(),
        ));
    }

    let record = state.library.update_user(&user.user_id, &update).await?;
    Ok(Json(record.profile()))
}
