use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use invite_types::models::{Participant, Role, Rsvp, WishReaction};

pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 18, minute, 0).unwrap()
}

pub fn rsvp(will_attend: Option<bool>, will_attend_dinner: Option<bool>) -> Rsvp {
    Rsvp {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        name: "Guest".into(),
        email: "guest@guests.local".into(),
        phone: None,
        will_attend,
        will_attend_dinner,
        created_at: at(0),
        updated_at: at(0),
    }
}

pub fn participant(username: &str, invited_to_dinner: bool, rsvp: Option<Rsvp>) -> Participant {
    Participant {
        id: Uuid::new_v4(),
        username: username.into(),
        display_name: username.into(),
        salutation: None,
        email: format!("{}@guests.local", username),
        role: Role::User,
        invited_to_dinner,
        created_at: at(0),
        updated_at: at(0),
        rsvp,
    }
}

pub fn reaction(sticker: &str, name: Option<&str>, session: &str) -> WishReaction {
    WishReaction {
        id: Uuid::new_v4(),
        wish_id: Uuid::nil(),
        sticker: sticker.into(),
        session_id: session.into(),
        reactor_name: name.map(Into::into),
        created_at: at(0),
    }
}
