use uuid::Uuid;

/// Supplies the anonymous per-device session id used to attribute reactions.
/// Implementations decide where it lives; the engine only ever sees the string.
pub trait SessionIdentityProvider {
    fn browser_session_id(&self) -> String;
}

/// Reaction fingerprint: `{participant}-{browser session}` when logged in,
/// otherwise the bare browser session id.
pub fn reaction_session_id(participant_id: Option<Uuid>, browser_session_id: &str) -> String {
    match participant_id {
        Some(id) => format!("{}-{}", id, browser_session_id),
        None => browser_session_id.to_string(),
    }
}
