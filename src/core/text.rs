use regex::Regex;
use std::sync::LazyLock;

// Pictographs, skin tone modifiers, flags, variation selector and ZWJ.
static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Extended_Pictographic}\x{1F1E6}-\x{1F1FF}\x{1F3FB}-\x{1F3FF}\x{FE0F}\x{200D}]")
        .unwrap()
});

/// Strip characters a receipt printer's code page cannot render.
pub fn filter_emojis(s: &str) -> String {
    EMOJI_RE.replace_all(s, "").trim().to_string()
}
