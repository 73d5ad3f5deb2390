use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use invite_db::models::ReactionRow;
use invite_engine::{aggregate, build_summary, reaction_session_id, reactions_view};
use invite_types::api::{AddReactionRequest, ReactionsView};
use invite_types::stickers;

use crate::auth::AppState;
use crate::error::{ApiError, db_call};
use crate::middleware::viewer_claims;

const MAX_SESSION_ID_LEN: usize = 128;

#[derive(Debug, Deserialize)]
pub struct ReactionQuery {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub viewer_name: Option<String>,
}

/// Who is looking: the session fingerprint reactions are matched against and
/// the name excluded from the "who reacted" sentence.
struct Viewer {
    fingerprint: String,
    name: String,
}

fn viewer(state: &AppState, bearer: Option<&TypedHeader<Authorization<Bearer>>>, session_id: &str, name: Option<&str>) -> Viewer {
    let claims = viewer_claims(state, bearer);
    let session_id = session_id.trim();
    let fingerprint = if session_id.is_empty() {
        String::new()
    } else {
        reaction_session_id(claims.as_ref().map(|c| c.sub), session_id)
    };
    let name = match claims {
        Some(c) => c.display_name,
        None => name.map(str::trim).unwrap_or_default().to_string(),
    };
    Viewer { fingerprint, name }
}

fn view(rows: Vec<ReactionRow>, viewer: &Viewer) -> ReactionsView {
    let reactions: Vec<_> = rows.into_iter().map(ReactionRow::into_reaction).collect();
    let agg = aggregate(&reactions, &viewer.fingerprint);
    let summary = build_summary(&agg, &viewer.name);
    reactions_view(&agg, &summary)
}

pub async fn get_reactions(
    State(state): State<AppState>,
    Path(wish_id): Path<Uuid>,
    Query(query): Query<ReactionQuery>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<ReactionsView>, ApiError> {
    let viewer = viewer(&state, bearer.as_ref(), &query.session_id, query.viewer_name.as_deref());

    let id = wish_id.to_string();
    let rows = db_call(&state, move |db| {
        if db.get_wish(&id)?.is_none() {
            return Ok(None);
        }
        db.reactions_for_wish(&id).map(Some)
    })
    .await?
    .ok_or(ApiError::NotFound("Không tìm thấy lời chúc"))?;

    Ok(Json(view(rows, &viewer)))
}

enum ReactOutcome {
    MissingWish,
    AlreadyReacted,
    Added(Vec<ReactionRow>),
}

/// Adds one sticker reaction. A session may use each sticker once per wish;
/// the store itself does not enforce this.
pub async fn add_reaction(
    State(state): State<AppState>,
    Path(wish_id): Path<Uuid>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Json(req): Json<AddReactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !stickers::is_known(&req.sticker) {
        return Err(ApiError::BadRequest("Cảm xúc không hợp lệ"));
    }
    let session_id = req.session_id.trim();
    if session_id.is_empty() || session_id.len() > MAX_SESSION_ID_LEN {
        return Err(ApiError::BadRequest("Phiên không hợp lệ"));
    }

    let viewer = viewer(&state, bearer.as_ref(), session_id, req.reactor_name.as_deref());
    let reactor_name = Some(viewer.name.clone()).filter(|n| !n.is_empty());

    let id = wish_id.to_string();
    let fingerprint = viewer.fingerprint.clone();
    let sticker = req.sticker;
    let outcome = db_call(&state, move |db| {
        if db.get_wish(&id)?.is_none() {
            return Ok(ReactOutcome::MissingWish);
        }
        let mine = db.reactions_for_wish_session(&id, &fingerprint)?;
        if mine.iter().any(|r| r.sticker == sticker) {
            return Ok(ReactOutcome::AlreadyReacted);
        }
        db.insert_reaction(
            &Uuid::new_v4().to_string(),
            &id,
            &sticker,
            &fingerprint,
            reactor_name.as_deref(),
        )?;
        info!(wish_id = %id, sticker = %sticker, "Reaction added");
        Ok(ReactOutcome::Added(db.reactions_for_wish(&id)?))
    })
    .await?;

    match outcome {
        ReactOutcome::MissingWish => Err(ApiError::NotFound("Không tìm thấy lời chúc")),
        ReactOutcome::AlreadyReacted => Err(ApiError::Conflict("Bạn đã thả cảm xúc này rồi")),
        ReactOutcome::Added(rows) => Ok((StatusCode::CREATED, Json(view(rows, &viewer)))),
    }
}
