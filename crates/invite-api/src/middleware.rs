use axum::{
    Extension,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::debug;

use invite_types::api::Claims;
use invite_types::models::Role;

use crate::auth::{AppState, AppStateInner};
use crate::error::ApiError;

pub fn decode_claims(state: &AppStateInner, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| debug!("Rejected token: {}", e))
    .ok()
    .map(|data| data.claims)
}

/// Claims of an optional bearer token. Routes open to anonymous guests use
/// this; an invalid token simply means "anonymous".
pub fn viewer_claims(state: &AppStateInner, bearer: Option<&TypedHeader<Authorization<Bearer>>>) -> Option<Claims> {
    bearer.and_then(|TypedHeader(Authorization(b))| decode_claims(state, b.token()))
}

/// Extract and validate the JWT from the Authorization header.
pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = viewer_claims(&state, bearer.as_ref()).ok_or(ApiError::Unauthorized)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Must run after `require_auth`.
pub async fn require_admin(Extension(claims): Extension<Claims>, req: Request, next: Next) -> Result<Response, ApiError> {
    if claims.role != Role::Admin {
        return Err(ApiError::Forbidden);
    }
    Ok(next.run(req).await)
}
