use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display name used whenever an author or reactor left their name blank.
pub const GUEST_NAME: &str = "Khách";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// An invited guest, optionally carrying their single RSVP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub salutation: Option<String>,
    pub email: String,
    pub role: Role,
    pub invited_to_dinner: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub rsvp: Option<Rsvp>,
}

impl Participant {
    /// "Salutation Name" when a salutation is set, otherwise just the name.
    pub fn greeting_name(&self) -> String {
        match self.salutation.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => format!("{} {}", s, self.display_name),
            _ => self.display_name.clone(),
        }
    }
}

/// A participant's answers. `None` on either answer means "not answered yet".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rsvp {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub will_attend: Option<bool>,
    pub will_attend_dinner: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A guestbook message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wish {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reactions: Vec<WishReaction>,
}

/// One sticker reaction on a wish, attributed to a session fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishReaction {
    pub id: Uuid,
    pub wish_id: Uuid,
    pub sticker: String,
    pub session_id: String,
    pub reactor_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
