use serde::Serialize;

use invite_types::models::{Participant, Rsvp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CeremonyStatus {
    Pending,
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DinnerStatus {
    NotInvited,
    Pending,
    Yes,
    No,
}

impl From<CeremonyStatus> for DinnerStatus {
    fn from(status: CeremonyStatus) -> Self {
        match status {
            CeremonyStatus::Pending => DinnerStatus::Pending,
            CeremonyStatus::Yes => DinnerStatus::Yes,
            CeremonyStatus::No => DinnerStatus::No,
        }
    }
}

fn answer(value: Option<bool>) -> CeremonyStatus {
    match value {
        None => CeremonyStatus::Pending,
        Some(true) => CeremonyStatus::Yes,
        Some(false) => CeremonyStatus::No,
    }
}

/// A missing RSVP and a missing answer are both pending.
pub fn classify_ceremony(rsvp: Option<&Rsvp>) -> CeremonyStatus {
    answer(rsvp.and_then(|r| r.will_attend))
}

/// Participants who were never invited to dinner are `NotInvited` no matter
/// what dinner answer their RSVP happens to carry.
pub fn classify_dinner(participant: &Participant) -> DinnerStatus {
    if !participant.invited_to_dinner {
        return DinnerStatus::NotInvited;
    }
    answer(participant.rsvp.as_ref().and_then(|r| r.will_attend_dinner)).into()
}
