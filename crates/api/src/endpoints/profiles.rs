//! Profile endpoints.

use axum::{
    Router,
    extract::{Multipart, State},
    routing::put,
};
use traversee_common::{AppError, AppResult, ImageUpload};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Replace the profile picture with the uploaded `photo` file.
async fn update_picture(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<String>> {
    let mut photo = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("photo") {
            continue;
        }

        let content_type = field
            .content_type()
            .map(ToString::to_string)
            .unwrap_or_default();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        photo = Some(ImageUpload {
            content_type,
            data: data.to_vec(),
        });
    }

    let url = state.profile_service.update_photo(&user_id, photo).await?;
    Ok(ApiResponse::ok(url))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/profile-pictures", put(update_picture))
}
