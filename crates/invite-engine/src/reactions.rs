use std::collections::HashMap;

use serde::Serialize;

use invite_types::models::{GUEST_NAME, WishReaction};

/// Distinct reactor names kept per sticker. The first ten distinct names win;
/// later reactors are still counted but not named.
pub const MAX_NAMES_PER_STICKER: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StickerReactions {
    pub sticker: String,
    pub count: usize,
    pub names: Vec<String>,
}

impl StickerReactions {
    /// Reactions that are counted but not represented in `names`.
    pub fn unnamed(&self) -> usize {
        self.count.saturating_sub(self.names.len())
    }
}

/// Reactions on one wish grouped by sticker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReactionAggregate {
    /// In order of each sticker's first appearance in the input.
    pub by_sticker: Vec<StickerReactions>,
    pub total_reactions: usize,
    /// Stickers the viewer's session has used, in first-use order.
    pub viewer_stickers: Vec<String>,
}

impl ReactionAggregate {
    pub fn get(&self, sticker: &str) -> Option<&StickerReactions> {
        self.by_sticker.iter().find(|s| s.sticker == sticker)
    }

    pub fn viewer_reacted_with(&self, sticker: &str) -> bool {
        self.viewer_stickers.iter().any(|s| s == sticker)
    }

    pub fn viewer_has_reacted(&self) -> bool {
        !self.viewer_stickers.is_empty()
    }
}

fn reactor_name(reaction: &WishReaction) -> &str {
    reaction
        .reactor_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(GUEST_NAME)
}

pub fn aggregate(reactions: &[WishReaction], viewer_session_id: &str) -> ReactionAggregate {
    let mut out = ReactionAggregate {
        total_reactions: reactions.len(),
        ..ReactionAggregate::default()
    };
    let mut index: HashMap<&str, usize> = HashMap::new();

    for reaction in reactions {
        let slot = *index.entry(reaction.sticker.as_str()).or_insert_with(|| {
            out.by_sticker.push(StickerReactions {
                sticker: reaction.sticker.clone(),
                count: 0,
                names: Vec::new(),
            });
            out.by_sticker.len() - 1
        });

        let entry = &mut out.by_sticker[slot];
        entry.count += 1;

        let name = reactor_name(reaction);
        if entry.names.len() < MAX_NAMES_PER_STICKER && !entry.names.iter().any(|n| n == name) {
            entry.names.push(name.to_string());
        }

        if reaction.session_id == viewer_session_id && !out.viewer_reacted_with(&reaction.sticker) {
            out.viewer_stickers.push(reaction.sticker.clone());
        }
    }

    out
}
