use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::info;
use uuid::Uuid;

use invite_db::Database;
use invite_db::models::NewParticipant;
use invite_types::api::{AdminLoginRequest, Claims, LoginRequest, LoginResponse, RegisterRequest};
use invite_types::models::{Participant, Role};

use crate::error::{ApiError, db_call};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub session_days: i64,
}

/// Usernames are matched trimmed and lowercased.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Loads a participant (with RSVP) by username.
fn load_participant(db: &Database, username: &str, role: Role) -> anyhow::Result<Option<Participant>> {
    match db.find_user_by_username(username, role)? {
        Some(user) => {
            let rsvp = db.get_rsvp_for_user(&user.id)?;
            Ok(Some(user.into_participant(rsvp)))
        }
        None => Ok(None),
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = normalize_username(&req.username);
    if username.is_empty() {
        return Err(ApiError::BadRequest("Vui lòng nhập username"));
    }

    let participant = db_call(&state, move |db| load_participant(db, &username, Role::User))
        .await?
        .ok_or(ApiError::NotInvited)?;

    info!(username = %participant.username, "Participant logged in");
    let token = create_token(&state, &participant)?;
    Ok(Json(LoginResponse { token, participant }))
}

/// First-login self-registration. Self-registered guests are never dinner
/// invitees; only the organizer can change that.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = normalize_username(&req.username);
    if username.is_empty() {
        return Err(ApiError::BadRequest("Thiếu username, vui lòng thử lại"));
    }
    if username.chars().count() > 64 {
        return Err(ApiError::BadRequest("Username quá dài"));
    }
    let display_name = req.display_name.trim().to_string();
    if display_name.is_empty() {
        return Err(ApiError::BadRequest("Vui lòng nhập họ tên hiển thị"));
    }
    let salutation = req.salutation.as_deref().map(str::trim).unwrap_or_default().to_string();

    let created = db_call(&state, move |db| {
        let taken = db.find_user_by_username(&username, Role::User)?.is_some()
            || db.find_user_by_username(&username, Role::Admin)?.is_some();
        if taken {
            return Ok(None);
        }
        let row = db.upsert_participant(&NewParticipant {
            id: None,
            username: &username,
            display_name: &display_name,
            salutation: &salutation,
            invited_to_dinner: false,
        })?;
        Ok(Some(row.into_participant(None)))
    })
    .await?;

    let participant = created.ok_or(ApiError::Conflict("Username đã tồn tại"))?;
    info!(username = %participant.username, "Participant self-registered");
    let token = create_token(&state, &participant)?;

    Ok((StatusCode::CREATED, Json(LoginResponse { token, participant })))
}

pub async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = normalize_username(&req.username);

    let user = db_call(&state, move |db| db.find_user_by_username(&username, Role::Admin))
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let stored = user.password.as_deref().ok_or(ApiError::Unauthorized)?;
    let parsed_hash =
        PasswordHash::new(stored).map_err(|e| anyhow::anyhow!("Corrupt password hash for '{}': {}", user.username, e))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized)?;

    let participant = user.into_participant(None);
    info!(username = %participant.username, "Organizer logged in");
    let token = create_token(&state, &participant)?;
    Ok(Json(LoginResponse { token, participant }))
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?
        .to_string();
    Ok(hash)
}

/// Creates the organizer account unless one with this username exists.
/// Returns whether an account was created.
pub fn ensure_admin(db: &Database, username: &str, password: &str) -> anyhow::Result<bool> {
    let username = normalize_username(username);
    if db.find_user_by_username(&username, Role::Admin)?.is_some() {
        return Ok(false);
    }

    let hash = hash_password(password)?;
    db.create_admin(&Uuid::new_v4().to_string(), &username, &username, &hash)?;
    info!(username = %username, "Organizer account created");
    Ok(true)
}

pub fn create_token(state: &AppStateInner, participant: &Participant) -> anyhow::Result<String> {
    let claims = Claims {
        sub: participant.id,
        username: participant.username.clone(),
        display_name: participant.display_name.clone(),
        role: participant.role,
        exp: (chrono::Utc::now() + chrono::Duration::days(state.session_days)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.jwt_secret.as_bytes()),
    )?;

    Ok(token)
}
