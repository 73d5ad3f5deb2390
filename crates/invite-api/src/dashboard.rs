use axum::{Json, extract::State};
use tracing::debug;

use invite_engine::{partition, recent_responses};
use invite_types::api::DashboardResponse;
use invite_types::models::Participant;

use crate::auth::AppState;
use crate::error::{ApiError, db_call};

const RECENT_RESPONSES: usize = 5;

/// Organizer overview: attendance buckets, counts, and the latest answers.
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>, ApiError> {
    let participants: Vec<Participant> = db_call(&state, |db| {
        let rows = db.list_participants()?;
        Ok(rows
            .into_iter()
            .map(|(user, rsvp)| user.into_participant(rsvp))
            .collect())
    })
    .await?;

    let cohorts = partition(&participants);
    let response = cohorts.dashboard(recent_responses(&participants, RECENT_RESPONSES));
    debug!(counts = ?response.counts, "Dashboard computed");

    Ok(Json(response))
}
