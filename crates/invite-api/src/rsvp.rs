use axum::{Extension, Json, extract::State};
use tracing::info;
use uuid::Uuid;

use invite_db::models::NewRsvp;
use invite_types::api::{Claims, SubmitRsvpRequest};
use invite_types::models::{Role, Rsvp};

use crate::auth::AppState;
use crate::error::{ApiError, db_call};

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub async fn my_rsvp(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Option<Rsvp>>, ApiError> {
    let id = claims.sub.to_string();
    let rsvp = db_call(&state, move |db| db.get_rsvp_for_user(&id)).await?;
    Ok(Json(rsvp.map(|r| r.into_rsvp())))
}

/// Records the participant's answers, one RSVP per participant. A dinner
/// answer from someone not invited to dinner is stored but never counted.
/// Organizers are not guests and cannot answer.
pub async fn submit_rsvp(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitRsvpRequest>,
) -> Result<Json<Rsvp>, ApiError> {
    if claims.role != Role::User {
        return Err(ApiError::Forbidden);
    }

    let user_id = claims.sub.to_string();
    let phone = non_blank(req.phone);
    let email = non_blank(req.email);
    let will_attend = req.will_attend;
    let will_attend_dinner = req.will_attend_dinner;

    let rsvp = db_call(&state, move |db| {
        let Some(user) = db.get_user_by_id(&user_id)? else {
            return Ok(None);
        };
        let email = email.unwrap_or_else(|| user.email.clone());
        let name = user.into_participant(None).greeting_name();
        let id = Uuid::new_v4().to_string();
        let row = db.upsert_rsvp(&NewRsvp {
            id: &id,
            user_id: &user_id,
            name: &name,
            email: &email,
            phone: phone.as_deref(),
            will_attend,
            will_attend_dinner,
        })?;
        Ok(Some(row.into_rsvp()))
    })
    .await?
    .ok_or(ApiError::Unauthorized)?;

    info!(
        username = %claims.username,
        will_attend = ?rsvp.will_attend,
        will_attend_dinner = ?rsvp.will_attend_dinner,
        "RSVP recorded"
    );
    Ok(Json(rsvp))
}
