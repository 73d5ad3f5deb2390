//! Database row types, mapped one-to-one from SQLite rows and kept separate
//! from the invite-types models so the store stays independent of the API.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use invite_types::api::RsvpWithParticipant;
use invite_types::models::{Participant, Role, Rsvp, Wish, WishReaction};

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub salutation: String,
    pub password: Option<String>,
    pub role: String,
    pub invited_to_dinner: bool,
    pub created_at: String,
    pub updated_at: String,
}

pub struct RsvpRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub will_attend: Option<bool>,
    pub will_attend_dinner: Option<bool>,
    pub created_at: String,
    pub updated_at: String,
}

pub struct WishRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub message: String,
    pub created_at: String,
}

pub struct ReactionRow {
    pub id: String,
    pub wish_id: String,
    pub sticker: String,
    pub session_id: String,
    pub reactor_name: Option<String>,
    pub created_at: String,
}

/// Input for the participant upsert. Normalisation happens before this point.
pub struct NewParticipant<'a> {
    pub id: Option<&'a str>,
    pub username: &'a str,
    pub display_name: &'a str,
    pub salutation: &'a str,
    pub invited_to_dinner: bool,
}

/// Input for the RSVP upsert. `None` answers keep the stored value.
pub struct NewRsvp<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub will_attend: Option<bool>,
    pub will_attend_dinner: Option<bool>,
}

fn parse_id(value: &str, what: &str) -> Uuid {
    value.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} '{}': {}", what, value, e);
        Uuid::default()
    })
}

pub fn parse_timestamp(value: &str) -> DateTime<Utc> {
    value
        .parse::<DateTime<Utc>>()
        .or_else(|_| {
            // Rows written by hand through the sqlite shell use datetime('now'),
            // which has no timezone. Treat as UTC.
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", value, e);
            DateTime::default()
        })
}

impl UserRow {
    pub fn role(&self) -> Role {
        Role::parse(&self.role).unwrap_or_else(|| {
            warn!("Unknown role '{}' on user '{}'", self.role, self.id);
            Role::User
        })
    }

    pub fn into_participant(self, rsvp: Option<RsvpRow>) -> Participant {
        let role = self.role();
        Participant {
            id: parse_id(&self.id, "user id"),
            salutation: Some(self.salutation).filter(|s| !s.trim().is_empty()),
            role,
            created_at: parse_timestamp(&self.created_at),
            updated_at: parse_timestamp(&self.updated_at),
            rsvp: rsvp.map(RsvpRow::into_rsvp),
            username: self.username,
            display_name: self.display_name,
            email: self.email,
            invited_to_dinner: self.invited_to_dinner,
        }
    }
}

impl RsvpRow {
    pub fn into_rsvp(self) -> Rsvp {
        Rsvp {
            id: parse_id(&self.id, "rsvp id"),
            user_id: parse_id(&self.user_id, "rsvp user_id"),
            created_at: parse_timestamp(&self.created_at),
            updated_at: parse_timestamp(&self.updated_at),
            name: self.name,
            email: self.email,
            phone: self.phone,
            will_attend: self.will_attend,
            will_attend_dinner: self.will_attend_dinner,
        }
    }

    pub fn with_participant(self, user: UserRow) -> RsvpWithParticipant {
        RsvpWithParticipant {
            rsvp: self.into_rsvp(),
            username: user.username,
            display_name: user.display_name,
            invited_to_dinner: user.invited_to_dinner,
        }
    }
}

impl WishRow {
    pub fn into_wish(self, reactions: Vec<WishReaction>) -> Wish {
        Wish {
            id: parse_id(&self.id, "wish id"),
            user_id: parse_id(&self.user_id, "wish user_id"),
            created_at: parse_timestamp(&self.created_at),
            name: self.name,
            message: self.message,
            reactions,
        }
    }
}

impl ReactionRow {
    pub fn into_reaction(self) -> WishReaction {
        WishReaction {
            id: parse_id(&self.id, "reaction id"),
            wish_id: parse_id(&self.wish_id, "reaction wish_id"),
            created_at: parse_timestamp(&self.created_at),
            sticker: self.sticker,
            session_id: self.session_id,
            reactor_name: self.reactor_name,
        }
    }
}
