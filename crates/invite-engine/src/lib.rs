//! Attendance and reaction derivations.
//!
//! Everything here is a pure function of already-fetched records: no store
//! access, no clocks, no I/O. The API and the client shell both import it so
//! the dashboard and the reaction strip are computed the same way everywhere.

pub mod attendance;
pub mod cohorts;
pub mod identity;
pub mod reactions;
pub mod sequencing;
pub mod summary;

#[cfg(test)]
pub(crate) mod fixtures;

pub use attendance::{CeremonyStatus, DinnerStatus, classify_ceremony, classify_dinner};
pub use cohorts::{Cohorts, attendance_rate, partition, recent_responses};
pub use identity::{SessionIdentityProvider, reaction_session_id};
pub use reactions::{MAX_NAMES_PER_STICKER, ReactionAggregate, StickerReactions, aggregate};
pub use sequencing::{LatestSlot, RefreshSequencer, RefreshTicket};
pub use summary::{ReactionSummary, build_summary, reactions_view, tooltip};
