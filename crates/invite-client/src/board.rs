use std::sync::Arc;

use tracing::debug;

use invite_engine::{
    LatestSlot, RefreshTicket, SessionIdentityProvider, aggregate, build_summary, partition, reaction_session_id,
    reactions_view, recent_responses,
};
use invite_types::api::{DashboardResponse, ReactionsView, WishPage};
use invite_types::models::{Participant, Wish};

use crate::client::InviteClient;
use crate::error::ClientError;

const RECENT_RESPONSES: usize = 5;

/// Who is looking at the wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub fingerprint: String,
    pub name: String,
}

impl Viewer {
    pub fn new(participant: Option<&Participant>, session: &impl SessionIdentityProvider) -> Self {
        Self {
            fingerprint: reaction_session_id(participant.map(|p| p.id), &session.browser_session_id()),
            name: participant.map(|p| p.display_name.clone()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WishCard {
    pub wish: Wish,
    pub reactions: ReactionsView,
}

fn card(wish: Wish, viewer: &Viewer) -> WishCard {
    let agg = aggregate(&wish.reactions, &viewer.fingerprint);
    let summary = build_summary(&agg, &viewer.name);
    WishCard {
        reactions: reactions_view(&agg, &summary),
        wish,
    }
}

/// One page of the wish wall with each card's reaction strip derived
/// locally. Overlapping refreshes resolve to the newest request.
pub struct ReactionBoard {
    page: u32,
    limit: u32,
    slot: LatestSlot<Arc<Vec<WishCard>>>,
}

impl ReactionBoard {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            slot: LatestSlot::new(),
        }
    }

    pub fn cards(&self) -> Option<Arc<Vec<WishCard>>> {
        self.slot.get()
    }

    /// Returns whether the fetched page was applied.
    pub async fn refresh(
        &self,
        client: &InviteClient,
        session: &impl SessionIdentityProvider,
    ) -> Result<bool, ClientError> {
        let ticket = self.slot.begin();
        let page = client.wishes(self.page, self.limit).await?;
        let viewer = Viewer::new(client.participant(), session);
        Ok(self.finish(ticket, page, &viewer))
    }

    fn finish(&self, ticket: RefreshTicket, page: WishPage, viewer: &Viewer) -> bool {
        let cards: Vec<WishCard> = page.wishes.into_iter().map(|w| card(w, viewer)).collect();
        let applied = self.slot.apply(ticket, Arc::new(cards));
        if !applied {
            debug!(ticket = ticket.value(), "Dropped stale wish page");
        }
        applied
    }
}

/// Organizer dashboard recomputed from the participant list.
pub struct AttendanceBoard {
    slot: LatestSlot<Arc<DashboardResponse>>,
}

impl AttendanceBoard {
    pub fn new() -> Self {
        Self { slot: LatestSlot::new() }
    }

    pub fn dashboard(&self) -> Option<Arc<DashboardResponse>> {
        self.slot.get()
    }

    pub async fn refresh(&self, client: &InviteClient) -> Result<bool, ClientError> {
        let ticket = self.slot.begin();
        let participants = client.participants().await?;
        Ok(self.finish(ticket, &participants))
    }

    fn finish(&self, ticket: RefreshTicket, participants: &[Participant]) -> bool {
        let dashboard = partition(participants).dashboard(recent_responses(participants, RECENT_RESPONSES));
        let applied = self.slot.apply(ticket, Arc::new(dashboard));
        if !applied {
            debug!(ticket = ticket.value(), "Dropped stale participant list");
        }
        applied
    }
}
