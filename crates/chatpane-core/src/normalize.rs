//! Input normalization and title derivation.

/// Word count used when deriving a title from a message.
pub const DEFAULT_TITLE_WORDS: usize = 5;

/// Title used when nothing usable can be derived.
const FALLBACK_TITLE: &str = "conversation";

/// Trim surrounding whitespace (space, tab, CR, LF) and lowercase ASCII.
///
/// Lowercasing is ASCII-only so byte offsets in the result line up with the
/// trimmed input.
pub fn normalize(text: &str) -> String {
    text.trim_matches([' ', '\t', '\r', '\n']).to_ascii_lowercase()
}

/// Filename-safe title from the first `count` words of `text`.
///
/// Alphanumeric characters are kept, words are joined with `_`, and
/// everything else is dropped. Returns `"conversation"` when nothing is left.
pub fn first_words(text: &str, count: usize) -> String {
    let mut words: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        if words.len() == count {
            break;
        }
        let kept: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
        if !kept.is_empty() {
            words.push(kept);
        }
    }
    if words.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        words.join("_")
    }
}
