//! Text normalisation shared by every matching strategy.
//!
//! Word characters are Unicode-aware: any alphanumeric in any script counts,
//! not just ASCII `[A-Za-z0-9_]`. This intentionally differs from an
//! ASCII-only `\w`, under which a term written entirely in a non-Latin
//! script would normalise to nothing.

/// Characters commonly used to mask letters in censored words.
pub const CENSOR_CHARS: [char; 4] = ['*', '$', '#', '@'];

/// True for `* $ # @`
pub fn is_censor_char(c: char) -> bool {
    CENSOR_CHARS.contains(&c)
}

/// True for characters kept by [`normalize`] besides whitespace: letters,
/// digits and underscore.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Lower-case `text` and strip everything that is neither a word character
/// nor whitespace.
///
/// Example: `"Don't STOP!"` -> `"dont stop"`
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|&c| is_word_char(c) || c.is_whitespace())
        .collect()
}

/// Remove all whitespace.
///
/// Example: `"b a d"` -> `"bad"`
pub fn compress(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
