use super::constants::HERO_CHAR_STAGGER_MS;

/// Reveal delay for the character at `index`.
#[inline]
pub fn stagger_delay_ms(index: usize) -> i32 {
    i32::try_from(index)
        .unwrap_or(i32::MAX)
        .saturating_mul(HERO_CHAR_STAGGER_MS)
}

/// Split a heading into one string per character; spaces become
/// non-breaking so the per-character spans keep their width.
pub fn split_chars(text: &str) -> Vec<String> {
    text.trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() {
                "\u{00A0}".to_string()
            } else {
                c.to_string()
            }
        })
        .collect()
}
