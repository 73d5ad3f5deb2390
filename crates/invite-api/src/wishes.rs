use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use invite_types::api::{Claims, SubmitWishRequest, WishPage};
use invite_types::models::{GUEST_NAME, Wish, WishReaction};

use crate::auth::AppState;
use crate::error::{ApiError, db_call};

const MAX_PAGE_SIZE: u32 = 50;
const MAX_MESSAGE_CHARS: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct WishQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

/// Newest wishes first, each with its raw reactions.
pub async fn list_wishes(
    State(state): State<AppState>,
    Query(query): Query<WishQuery>,
) -> Result<Json<WishPage>, ApiError> {
    let page = query.page.max(1);
    let limit = query.limit.clamp(1, MAX_PAGE_SIZE);

    let (rows, reaction_rows) = db_call(&state, move |db| {
        let rows = db.list_wishes(page, limit)?;
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let reaction_rows = db.reactions_for_wishes(&ids)?;
        Ok((rows, reaction_rows))
    })
    .await?;

    // Group reactions by wish, keeping their stored order
    let mut by_wish: HashMap<Uuid, Vec<WishReaction>> = HashMap::new();
    for row in reaction_rows {
        let reaction = row.into_reaction();
        by_wish.entry(reaction.wish_id).or_default().push(reaction);
    }

    let wishes: Vec<Wish> = rows
        .into_iter()
        .map(|row| {
            let id: Uuid = row.id.parse().unwrap_or_default();
            let reactions = by_wish.remove(&id).unwrap_or_default();
            row.into_wish(reactions)
        })
        .collect();

    Ok(Json(WishPage {
        page,
        limit,
        has_more: wishes.len() == limit as usize,
        wishes,
    }))
}

pub async fn post_wish(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitWishRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = req.message.trim().to_string();
    if message.is_empty() {
        return Err(ApiError::BadRequest("Vui lòng nhập lời chúc"));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::BadRequest("Lời chúc quá dài"));
    }

    let name = match claims.display_name.trim() {
        "" => GUEST_NAME.to_string(),
        n => n.to_string(),
    };
    let user_id = claims.sub.to_string();

    let wish = db_call(&state, move |db| {
        if db.get_user_by_id(&user_id)?.is_none() {
            return Ok(None);
        }
        let id = Uuid::new_v4().to_string();
        let row = db.insert_wish(&id, &user_id, &name, &message)?;
        Ok(Some(row.into_wish(vec![])))
    })
    .await?
    .ok_or(ApiError::Unauthorized)?;

    info!(wish_id = %wish.id, author = %wish.name, "Wish posted");
    Ok((StatusCode::CREATED, Json(wish)))
}

pub async fn delete_wish(
    State(state): State<AppState>,
    Path(wish_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let id = wish_id.to_string();
    let deleted = db_call(&state, move |db| db.delete_wish(&id)).await?;
    if !deleted {
        return Err(ApiError::NotFound("Không tìm thấy lời chúc"));
    }

    info!(wish_id = %wish_id, "Wish deleted by organizer");
    Ok(StatusCode::NO_CONTENT)
}
