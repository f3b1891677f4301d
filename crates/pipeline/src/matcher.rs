//! Fuzzy banned-word matching.
//!
//! A banned term matches a text through any of these strategies, tried in
//! order for each term:
//! 1. Exact substring of the normalised text
//! 2. Whitespace-free term inside the whitespace-free text (`b a d w o r d`)
//! 3. Initial abbreviation of a two-word phrase (`j. doe` for `john doe`)
//! 4. A censoring run between the term's first and last letters (`f***k`)
//!
//! and then, word by word, through equality, [`is_censored_version`] or a
//! length-adjusted Levenshtein distance.
//!
//! [`BannedWordMatcher`] compiles the terms once and can be shared across
//! threads; [`contains_banned_word`] is the one-shot convenience form.

use crate::censor::is_censored_version;
use crate::levenshtein::{adjusted_threshold, levenshtein_distance};
use crate::normalize::{compress, normalize, CENSOR_CHARS};
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Terms shorter than this (after removing whitespace) are not tried as a
/// compressed substring; they would hit almost any text.
const MIN_COMPRESSED_LEN: usize = 3;

/// A banned term with everything precomputed.
#[derive(Debug, Clone)]
struct CompiledTerm {
    /// Lower-cased and stripped of punctuation
    normalized: String,
    /// `normalized` without whitespace
    compressed: String,
    /// `<initial>\.\s+<second word>` for two-word phrases
    abbreviation: Option<Regex>,
    /// `<first>[*$#@]+<last>`
    censored: Option<Regex>,
}

impl CompiledTerm {
    /// Returns `None` for terms with no word characters; those could only
    /// ever match as an empty substring.
    fn new(term: &str) -> Option<Self> {
        let lowered = term.to_lowercase();
        let normalized = normalize(term);
        if normalized.trim().is_empty() {
            return None;
        }
        let compressed = compress(&normalized);

        let abbreviation = if term.contains(' ') {
            let parts: Vec<&str> = lowered.split(' ').collect();
            match parts.as_slice() {
                [first, second] => {
                    let initial = first.chars().next().map(|c| c.to_string()).unwrap_or_default();
                    let pattern = format!(r"{}\.\s+{}", regex::escape(&initial), regex::escape(second));
                    compile(&pattern, term)
                }
                _ => None,
            }
        } else {
            None
        };

        let censored = censored_pattern(&lowered).and_then(|pattern| compile(&pattern, term));

        Some(Self {
            normalized,
            compressed,
            abbreviation,
            censored,
        })
    }

    /// Phrase-level strategies against the whole text.
    fn matches_text(&self, text: &ScannedText) -> bool {
        if text.normalized.contains(&self.normalized) {
            return true;
        }

        if self.compressed.chars().count() >= MIN_COMPRESSED_LEN
            && text.compressed.contains(&self.compressed)
        {
            return true;
        }

        if let Some(abbreviation) = &self.abbreviation {
            if abbreviation.is_match(&text.lowered) {
                return true;
            }
        }

        self.censored
            .as_ref()
            .is_some_and(|censored| censored.is_match(&text.lowered))
    }

    /// Word-level strategies against a single normalised token.
    fn matches_word(&self, word: &str, threshold: usize) -> bool {
        if word == self.normalized {
            return true;
        }

        if is_censored_version(word, &self.normalized) {
            return true;
        }

        let length = word.chars().count().max(self.normalized.chars().count());
        let allowed = adjusted_threshold(threshold, length);
        if allowed == 0 {
            return false;
        }

        levenshtein_distance(word, &self.normalized) <= allowed
    }
}

/// `<first>[*$#@]+<last>`, with the last letter only for terms longer than
/// two characters.
fn censored_pattern(lowered: &str) -> Option<String> {
    let chars: Vec<char> = lowered.chars().collect();
    let first = chars.first()?;
    let class: String = CENSOR_CHARS.iter().map(|c| regex::escape(&c.to_string())).collect();
    let last = if chars.len() > 2 {
        chars.last().map(|c| regex::escape(&c.to_string())).unwrap_or_default()
    } else {
        String::new()
    };
    Some(format!("{}[{}]+{}", regex::escape(&first.to_string()), class, last))
}

fn compile(pattern: &str, term: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(e) => {
            warn!("Skipping pattern for banned term {:?}: {}", term, e);
            None
        }
    }
}

/// The three views of a text the strategies need, computed once per text.
struct ScannedText {
    lowered: String,
    normalized: String,
    compressed: String,
}

impl ScannedText {
    fn new(text: &str) -> Self {
        let normalized = normalize(text);
        Self {
            lowered: text.to_lowercase(),
            compressed: compress(&normalized),
            normalized,
        }
    }
}

/// A reusable, thread-safe matcher over a fixed list of banned terms.
#[derive(Debug, Clone, Default)]
pub struct BannedWordMatcher {
    terms: Vec<CompiledTerm>,
}

impl BannedWordMatcher {
    /// Compile `terms`. Blank and punctuation-only terms are dropped.
    pub fn new<S: AsRef<str>>(terms: &[S]) -> Self {
        let terms = terms
            .iter()
            .filter_map(|term| CompiledTerm::new(term.as_ref()))
            .collect();
        Self { terms }
    }

    /// Number of usable terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether `text` contains any banned term.
    ///
    /// # Arguments
    /// * `text` - Title, description or channel name to check
    /// * `threshold` - Maximum edit distance, tightened per word length
    pub fn matches(&self, text: &str, threshold: usize) -> bool {
        if text.is_empty() || self.terms.is_empty() {
            return false;
        }

        let scanned = ScannedText::new(text);
        if self.terms.iter().any(|term| term.matches_text(&scanned)) {
            return true;
        }

        scanned.normalized.split_whitespace().any(|word| {
            self.terms
                .iter()
                .any(|term| term.matches_word(word, threshold))
        })
    }
}

/// One-shot form of [`BannedWordMatcher::matches`].
///
/// ```ignore
/// assert!(contains_banned_word("this is bad", &["bad"], 0));
/// ```
pub fn contains_banned_word<S: AsRef<str>>(text: &str, banned_words: &[S], threshold: usize) -> bool {
    if text.is_empty() || banned_words.is_empty() {
        return false;
    }
    BannedWordMatcher::new(banned_words).matches(text, threshold)
}
