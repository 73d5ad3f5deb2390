use serde::Serialize;

use invite_types::api::{ReactionsView, StickerView};
use invite_types::stickers;

use crate::reactions::{ReactionAggregate, StickerReactions};

/// Stands in for the viewer's own name at the head of the sentence.
pub const VIEWER_LABEL: &str = "Bạn";

/// At most this many names (the viewer included) appear in the sentence.
const MAX_SENTENCE_NAMES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReactionSummary {
    /// Stickers with at least one reaction, most popular first. Ties keep
    /// first-appearance order.
    pub top_reactions: Vec<StickerReactions>,
    pub sentence: String,
}

pub fn build_summary(aggregate: &ReactionAggregate, viewer_name: &str) -> ReactionSummary {
    let mut top_reactions: Vec<StickerReactions> = aggregate
        .by_sticker
        .iter()
        .filter(|s| s.count > 0)
        .cloned()
        .collect();
    top_reactions.sort_by(|a, b| b.count.cmp(&a.count));

    let sentence = sentence(
        &top_reactions,
        aggregate.total_reactions,
        aggregate.viewer_has_reacted(),
        viewer_name.trim(),
    );

    ReactionSummary {
        top_reactions,
        sentence,
    }
}

// Distinct people are counted from the capped name lists, so a sticker with
// more than ten distinct reactors under-reports here.
fn sentence(top: &[StickerReactions], total_reactions: usize, viewer_reacted: bool, viewer_name: &str) -> String {
    let mut people: Vec<&str> = Vec::new();
    for name in top.iter().flat_map(|s| s.names.iter()) {
        if !people.contains(&name.as_str()) {
            people.push(name);
        }
    }

    let shown_max = people.len().min(MAX_SENTENCE_NAMES);
    let other_slots = shown_max.saturating_sub(usize::from(viewer_reacted));

    let mut names: Vec<&str> = Vec::with_capacity(MAX_SENTENCE_NAMES);
    if viewer_reacted {
        names.push(VIEWER_LABEL);
    }
    names.extend(people.iter().copied().filter(|n| *n != viewer_name).take(other_slots));

    if names.is_empty() {
        return format!("{} cảm xúc", total_reactions);
    }

    let remaining = people.len().saturating_sub(names.len());
    if remaining > 0 {
        format!("{} và {} người khác", names.join(", "), remaining)
    } else {
        names.join(", ")
    }
}

/// Hover text for one sticker: its count, the captured names, and how many
/// reactions went unnamed.
pub fn tooltip(detail: &StickerReactions) -> String {
    let mut text = format!("{} người đã cảm xúc: {}", detail.count, detail.names.join(", "));
    let unnamed = detail.unnamed();
    if unnamed > 0 {
        text.push_str(&format!(", +{} người khác", unnamed));
    }
    text
}

pub fn reactions_view(aggregate: &ReactionAggregate, summary: &ReactionSummary) -> ReactionsView {
    ReactionsView {
        stickers: summary
            .top_reactions
            .iter()
            .map(|s| StickerView {
                sticker: s.sticker.clone(),
                label: stickers::find(&s.sticker).map(|st| st.label.to_string()).unwrap_or_default(),
                count: s.count,
                names: s.names.clone(),
                tooltip: tooltip(s),
                viewer_reacted: aggregate.viewer_reacted_with(&s.sticker),
            })
            .collect(),
        total_reactions: aggregate.total_reactions,
        viewer_stickers: aggregate.viewer_stickers.clone(),
        sentence: summary.sentence.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::reaction;
    use crate::reactions::aggregate;

    fn stickers(summary: &ReactionSummary) -> Vec<(&str, usize)> {
        summary
            .top_reactions
            .iter()
            .map(|s| (s.sticker.as_str(), s.count))
            .collect()
    }

    #[test]
    fn viewer_and_one_other() {
        let rows = vec![
            reaction("❤️", Some("Alice"), "S1"),
            reaction("❤️", Some("Bob"), "S2"),
            reaction("🎉", Some("Alice"), "S1"),
        ];
        let agg = aggregate(&rows, "S1");
        let summary = build_summary(&agg, "Alice");

        assert_eq!(agg.total_reactions, 3);
        assert_eq!(stickers(&summary), [("❤️", 2), ("🎉", 1)]);
        // Two people, both named: the viewer and Bob.
        assert_eq!(summary.sentence, "Bạn, Bob");
    }

    #[test]
    fn viewer_with_several_others() {
        let rows = vec![
            reaction("👍", Some("Alice"), "S1"),
            reaction("👍", Some("Bob"), "S2"),
            reaction("👍", Some("Chi"), "S3"),
            reaction("😂", Some("Dung"), "S4"),
        ];
        let summary = build_summary(&aggregate(&rows, "S1"), "Alice");
        assert_eq!(summary.sentence, "Bạn, Bob và 2 người khác");
    }

    #[test]
    fn viewer_not_reacted() {
        let rows = vec![
            reaction("👍", Some("Alice"), "S1"),
            reaction("👍", Some("Bob"), "S2"),
            reaction("🎉", Some("Chi"), "S3"),
        ];
        let summary = build_summary(&aggregate(&rows, "S9"), "Zed");
        assert_eq!(summary.sentence, "Alice, Bob và 1 người khác");
    }

    #[test]
    fn only_viewer() {
        let rows = vec![reaction("🥳", Some("Alice"), "S1")];
        let summary = build_summary(&aggregate(&rows, "S1"), "Alice");
        assert_eq!(summary.sentence, "Bạn");
    }

    #[test]
    fn viewer_name_from_another_session_is_not_repeated() {
        // Same display name reacted from another device; this session has not.
        let rows = vec![
            reaction("👍", Some("Alice"), "S-other"),
            reaction("👍", Some("Bob"), "S2"),
        ];
        let summary = build_summary(&aggregate(&rows, "S1"), "Alice");
        assert_eq!(summary.sentence, "Bob và 1 người khác");
    }

    #[test]
    fn empty_falls_back_to_count() {
        let summary = build_summary(&aggregate(&[], "S1"), "Alice");
        assert!(summary.top_reactions.is_empty());
        assert_eq!(summary.sentence, "0 cảm xúc");
    }

    #[test]
    fn ties_keep_first_appearance() {
        let rows = vec![
            reaction("🎶", Some("A"), "S1"),
            reaction("💐", Some("B"), "S2"),
            reaction("👍", Some("C"), "S3"),
            reaction("👍", Some("D"), "S4"),
            reaction("💐", Some("E"), "S5"),
        ];
        let summary = build_summary(&aggregate(&rows, "S0"), "");
        assert_eq!(stickers(&summary), [("💐", 2), ("👍", 2), ("🎶", 1)]);
    }

    #[test]
    fn tooltip_with_and_without_overflow() {
        let small = StickerReactions {
            sticker: "❤️".into(),
            count: 2,
            names: vec!["Alice".into(), "Bob".into()],
        };
        assert_eq!(tooltip(&small), "2 người đã cảm xúc: Alice, Bob");

        let crowded = StickerReactions {
            sticker: "❤️".into(),
            count: 12,
            names: (0..10).map(|i| format!("G{}", i)).collect(),
        };
        assert_eq!(
            tooltip(&crowded),
            "12 người đã cảm xúc: G0, G1, G2, G3, G4, G5, G6, G7, G8, G9, +2 người khác"
        );
    }

    #[test]
    fn view_marks_viewer_stickers() {
        let rows = vec![
            reaction("❤️", Some("Alice"), "S1"),
            reaction("❤️", Some("Bob"), "S2"),
            reaction("🎉", Some("Bob"), "S2"),
        ];
        let agg = aggregate(&rows, "S1");
        let view = reactions_view(&agg, &build_summary(&agg, "Alice"));

        assert_eq!(view.total_reactions, 3);
        assert_eq!(view.viewer_stickers, ["❤️"]);
        assert!(view.stickers[0].viewer_reacted);
        assert_eq!(view.stickers[0].label, "Yêu thích");
        assert!(!view.stickers[1].viewer_reacted);
        assert_eq!(view.stickers[1].tooltip, "1 người đã cảm xúc: Bob");
    }
}
