/// A reaction sticker offered by the guestbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sticker {
    pub emoji: &'static str,
    pub label: &'static str,
}

/// Reactions first, graduation symbols after.
pub const STICKERS: &[Sticker] = &[
    Sticker { emoji: "👍", label: "Thích" },
    Sticker { emoji: "❤️", label: "Yêu thích" },
    Sticker { emoji: "😂", label: "Haha" },
    Sticker { emoji: "😮", label: "Ngạc nhiên" },
    Sticker { emoji: "😢", label: "Buồn" },
    Sticker { emoji: "😡", label: "Phẫn nộ" },
    Sticker { emoji: "🎓", label: "Mũ tốt nghiệp" },
    Sticker { emoji: "🎉", label: "Pháo hoa" },
    Sticker { emoji: "🥳", label: "Party" },
    Sticker { emoji: "📸", label: "Chụp hình" },
    Sticker { emoji: "🧑‍🎓", label: "Bạn học" },
    Sticker { emoji: "🎶", label: "Âm nhạc" },
    Sticker { emoji: "🥂", label: "Nâng ly" },
    Sticker { emoji: "💐", label: "Hoa tặng" },
];

pub fn find(emoji: &str) -> Option<&'static Sticker> {
    STICKERS.iter().find(|s| s.emoji == emoji)
}

pub fn is_known(emoji: &str) -> bool {
    find(emoji).is_some()
}
