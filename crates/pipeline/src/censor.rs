//! Detection of deliberately masked words such as `f**k` or `a$$`.

use crate::normalize::is_censor_char;

fn eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Whether `word` looks like `banned_word` with some letters masked.
///
/// Requires the lengths to be within 3 of each other and the first letters
/// to agree, then accepts any of:
/// - the first letter followed only by `*` (`f***`)
/// - the banned word's first four letters followed by anything with a `*`
/// - matching first and last letters around a run of censor characters
///   (`f**k`, `a$$s`)
/// - the banned word's exact length with every letter after the first
///   masked (`a$$` for `ass`)
pub fn is_censored_version(word: &str, banned_word: &str) -> bool {
    let word: Vec<char> = word.chars().collect();
    let banned: Vec<char> = banned_word.chars().collect();
    let (Some(&first), Some(&banned_first)) = (word.first(), banned.first()) else {
        return false;
    };

    if word.len().abs_diff(banned.len()) > 3 {
        return false;
    }
    if !eq_ignore_case(first, banned_first) {
        return false;
    }

    let rest = &word[1..];

    // f***
    if !rest.is_empty() && rest.iter().all(|&c| c == '*') {
        return true;
    }

    // fuck*ng
    let prefix_len = banned.len().min(4);
    let has_prefix = word.len() >= prefix_len
        && word[..prefix_len]
            .iter()
            .zip(&banned[..prefix_len])
            .all(|(&a, &b)| eq_ignore_case(a, b));
    if has_prefix && word.contains(&'*') {
        return true;
    }

    // f**k, a$$s
    if word.len() >= 3 {
        let (Some(&last), Some(&banned_last)) = (word.last(), banned.last()) else {
            return false;
        };
        let interior = &word[1..word.len() - 1];
        if eq_ignore_case(last, banned_last) && interior.iter().all(|&c| is_censor_char(c)) {
            return true;
        }
    }

    // a$$
    word.len() == banned.len() && rest.iter().all(|&c| is_censor_char(c))
}
