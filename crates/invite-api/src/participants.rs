use std::collections::BTreeSet;

use axum::{Json, extract::State};
use tracing::{info, warn};

use invite_db::Database;
use invite_db::models::NewParticipant;
use invite_types::api::{
    DeleteParticipantsRequest, DeleteParticipantsResponse, ImportFailure, ImportReport, ParticipantUpsert,
    RsvpWithParticipant,
};
use invite_types::models::{Participant, Role};

use crate::auth::{AppState, normalize_username};
use crate::error::{ApiError, db_call};

/// Organizer input after trimming: username lowercased, display name
/// defaulting to the username.
struct Normalized {
    id: Option<String>,
    username: String,
    display_name: String,
    salutation: String,
    invited_to_dinner: bool,
}

fn normalize(input: &ParticipantUpsert) -> Result<Normalized, ApiError> {
    let username = normalize_username(&input.username);
    if username.is_empty() {
        return Err(ApiError::BadRequest("Username và tên hiển thị không được để trống"));
    }
    let display_name = match input.display_name.trim() {
        "" => username.clone(),
        name => name.to_string(),
    };

    Ok(Normalized {
        id: input.id.map(|id| id.to_string()),
        username,
        display_name,
        salutation: input.salutation.as_deref().map(str::trim).unwrap_or_default().to_string(),
        invited_to_dinner: input.invited_to_dinner.unwrap_or(false),
    })
}

enum SaveOutcome {
    Saved(Participant),
    UsernameTaken,
}

fn save(db: &Database, p: &Normalized) -> anyhow::Result<SaveOutcome> {
    if db.find_user_by_username(&p.username, Role::Admin)?.is_some() {
        return Ok(SaveOutcome::UsernameTaken);
    }
    // Renaming onto another participant's username.
    if let Some(id) = &p.id {
        if let Some(other) = db.find_user_by_username(&p.username, Role::User)? {
            if &other.id != id {
                return Ok(SaveOutcome::UsernameTaken);
            }
        }
    }

    let row = db.upsert_participant(&NewParticipant {
        id: p.id.as_deref(),
        username: &p.username,
        display_name: &p.display_name,
        salutation: &p.salutation,
        invited_to_dinner: p.invited_to_dinner,
    })?;
    let rsvp = db.get_rsvp_for_user(&row.id)?;
    Ok(SaveOutcome::Saved(row.into_participant(rsvp)))
}

pub async fn list_participants(State(state): State<AppState>) -> Result<Json<Vec<Participant>>, ApiError> {
    let participants: Vec<Participant> = db_call(&state, |db| {
        let rows = db.list_participants()?;
        Ok(rows
            .into_iter()
            .map(|(user, rsvp)| user.into_participant(rsvp))
            .collect())
    })
    .await?;
    Ok(Json(participants))
}

pub async fn upsert_participant(
    State(state): State<AppState>,
    Json(req): Json<ParticipantUpsert>,
) -> Result<Json<Participant>, ApiError> {
    let normalized = normalize(&req)?;

    match db_call(&state, move |db| save(db, &normalized)).await? {
        SaveOutcome::Saved(participant) => {
            info!(username = %participant.username, dinner = participant.invited_to_dinner, "Participant saved");
            Ok(Json(participant))
        }
        SaveOutcome::UsernameTaken => Err(ApiError::Conflict("Username đã tồn tại")),
    }
}

/// Bulk upsert. Each row succeeds or fails on its own.
pub async fn import_participants(
    State(state): State<AppState>,
    Json(rows): Json<Vec<ParticipantUpsert>>,
) -> Result<Json<ImportReport>, ApiError> {
    let report = db_call(&state, move |db| {
        let mut report = ImportReport {
            imported: 0,
            failed: Vec::new(),
        };

        for (index, input) in rows.iter().enumerate() {
            let row = index + 1;
            let failure = match normalize(input) {
                Err(e) => Some(e.to_string()),
                Ok(normalized) => match save(db, &normalized) {
                    Ok(SaveOutcome::Saved(_)) => None,
                    Ok(SaveOutcome::UsernameTaken) => Some(ApiError::Conflict("Username đã tồn tại").to_string()),
                    Err(e) => {
                        warn!(row, "Import row failed: {:#}", e);
                        Some(ApiError::Internal(e).to_string())
                    }
                },
            };

            match failure {
                None => report.imported += 1,
                Some(error) => report.failed.push(ImportFailure {
                    row,
                    username: input.username.clone(),
                    error,
                }),
            }
        }

        Ok(report)
    })
    .await?;

    info!(imported = report.imported, failed = report.failed.len(), "Participant import finished");
    Ok(Json(report))
}

pub async fn delete_participants(
    State(state): State<AppState>,
    Json(req): Json<DeleteParticipantsRequest>,
) -> Result<Json<DeleteParticipantsResponse>, ApiError> {
    let ids: Vec<String> = req
        .ids
        .iter()
        .map(|id| id.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if ids.is_empty() {
        return Err(ApiError::BadRequest("Không có người tham gia nào được chọn"));
    }

    let deleted = db_call(&state, move |db| db.delete_participants(&ids)).await?;
    info!(deleted, "Participants deleted");
    Ok(Json(DeleteParticipantsResponse { deleted }))
}

pub async fn list_rsvps(State(state): State<AppState>) -> Result<Json<Vec<RsvpWithParticipant>>, ApiError> {
    let rsvps: Vec<RsvpWithParticipant> = db_call(&state, |db| {
        let rows = db.list_rsvps()?;
        Ok(rows
            .into_iter()
            .map(|(rsvp, user)| rsvp.with_participant(user))
            .collect())
    })
    .await?;
    Ok(Json(rsvps))
}
