use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Participant, Role, Rsvp, Wish};

// -- JWT Claims --

/// JWT claims shared by the API middleware and the client shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    pub exp: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// -- Auth --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub salutation: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub participant: Participant,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub display_name: String,
}

// -- RSVP --

/// Answers left out of the request keep whatever was stored before.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitRsvpRequest {
    #[serde(default)]
    pub will_attend: Option<bool>,
    #[serde(default)]
    pub will_attend_dinner: Option<bool>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// RSVP joined with the participant it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsvpWithParticipant {
    #[serde(flatten)]
    pub rsvp: Rsvp,
    pub username: String,
    pub display_name: String,
    pub invited_to_dinner: bool,
}

// -- Wishes --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitWishRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WishPage {
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
    pub wishes: Vec<Wish>,
}

// -- Reactions --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddReactionRequest {
    pub sticker: String,
    pub session_id: String,
    #[serde(default)]
    pub reactor_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerView {
    pub sticker: String,
    /// Catalogue label; empty for stickers no longer in the catalogue.
    pub label: String,
    pub count: usize,
    pub names: Vec<String>,
    pub tooltip: String,
    pub viewer_reacted: bool,
}

/// Everything a wish card needs to render its reaction strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionsView {
    /// Ordered by count, most popular first.
    pub stickers: Vec<StickerView>,
    pub total_reactions: usize,
    pub viewer_stickers: Vec<String>,
    pub sentence: String,
}

// -- Organizer --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantUpsert {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub salutation: Option<String>,
    #[serde(default)]
    pub invited_to_dinner: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteParticipantsRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteParticipantsResponse {
    pub deleted: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportFailure {
    pub row: usize,
    pub username: String,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportReport {
    pub imported: usize,
    pub failed: Vec<ImportFailure>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceCounts {
    pub total_participants: usize,
    pub ceremony_yes: usize,
    pub ceremony_no: usize,
    pub ceremony_pending: usize,
    pub total_responses: usize,
    /// Whole percent of ceremony answers that are "yes"; 0 with no answers.
    pub attendance_rate: u32,
    pub dinner_yes: usize,
    pub dinner_no: usize,
    pub dinner_pending: usize,
    pub dinner_not_invited: usize,
    pub dinner_invitees: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub counts: AttendanceCounts,
    pub ceremony_yes: Vec<Participant>,
    pub ceremony_no: Vec<Participant>,
    pub ceremony_pending: Vec<Participant>,
    pub dinner_yes: Vec<Participant>,
    pub dinner_no: Vec<Participant>,
    pub dinner_pending: Vec<Participant>,
    pub dinner_not_invited: Vec<Participant>,
    pub recent_responses: Vec<Rsvp>,
}
