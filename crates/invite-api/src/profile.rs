use axum::{Extension, Json, extract::State};

use invite_types::api::{Claims, LoginResponse, UpdateProfileRequest};
use invite_types::models::Participant;

use crate::auth::{AppState, create_token};
use crate::error::{ApiError, db_call};

const MAX_DISPLAY_NAME: usize = 80;

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Participant>, ApiError> {
    let id = claims.sub.to_string();
    let participant = db_call(&state, move |db| {
        let Some(user) = db.get_user_by_id(&id)? else {
            return Ok(None);
        };
        let rsvp = db.get_rsvp_for_user(&id)?;
        Ok(Some(user.into_participant(rsvp)))
    })
    .await?
    // Deleted by the organizer while the token was still valid.
    .ok_or(ApiError::Unauthorized)?;

    Ok(Json(participant))
}

/// Renames the participant and reissues the token so the new name travels
/// with it.
pub async fn update_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let display_name = req.display_name.trim().to_string();
    if display_name.is_empty() {
        return Err(ApiError::BadRequest("Vui lòng nhập họ tên hiển thị"));
    }
    if display_name.chars().count() > MAX_DISPLAY_NAME {
        return Err(ApiError::BadRequest("Tên hiển thị quá dài"));
    }

    let id = claims.sub.to_string();
    let participant = db_call(&state, move |db| {
        let Some(user) = db.update_display_name(&id, &display_name)? else {
            return Ok(None);
        };
        let rsvp = db.get_rsvp_for_user(&id)?;
        Ok(Some(user.into_participant(rsvp)))
    })
    .await?
    .ok_or(ApiError::Unauthorized)?;

    let token = create_token(&state, &participant)?;
    Ok(Json(LoginResponse { token, participant }))
}
