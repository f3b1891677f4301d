//! Filter outcomes and the per-run context filters read from.

use crate::matcher::BannedWordMatcher;
use catalog::FilterPreferences;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Why a video was hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FilterReason {
    ChannelBanned,
    TitleBannedWord,
    DescriptionBannedWord,
    ChannelNameBannedWord,
    TopicChannelNameBannedWord,
    ShortForm,
}

impl FilterReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterReason::ChannelBanned => "Channel is banned",
            FilterReason::TitleBannedWord => "Contains banned word in title",
            FilterReason::DescriptionBannedWord => "Description contains banned word",
            FilterReason::ChannelNameBannedWord => "Channel name contains banned word",
            FilterReason::TopicChannelNameBannedWord => {
                "Channel name (without Topic suffix) contains banned word"
            }
            FilterReason::ShortForm => "Short form content",
        }
    }
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one video. `reason` is empty iff not filtered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterDecision {
    pub filtered: bool,
    pub reason: String,
}

impl FilterDecision {
    /// Keep the video
    pub fn keep() -> Self {
        Self::default()
    }

    /// Hide the video for `reason`
    pub fn hide(reason: FilterReason) -> Self {
        Self {
            filtered: true,
            reason: reason.to_string(),
        }
    }
}

impl From<Option<FilterReason>> for FilterDecision {
    fn from(reason: Option<FilterReason>) -> Self {
        reason.map_or_else(FilterDecision::keep, FilterDecision::hide)
    }
}

/// Everything filters need, resolved once per batch.
///
/// Built from [`FilterPreferences`] so the banned terms are compiled once
/// and the banned channel ids are hashed once, however many videos follow.
#[derive(Debug, Clone)]
pub struct FilterContext {
    pub matcher: BannedWordMatcher,
    pub banned_channel_ids: HashSet<String>,
    pub levenshtein_threshold: usize,
    pub ban_short_form: bool,
    pub short_form_threshold: u64,
}

impl FilterContext {
    pub fn new(preferences: &FilterPreferences) -> Self {
        Self {
            matcher: BannedWordMatcher::new(&preferences.banned_words),
            banned_channel_ids: preferences
                .banned_channels
                .iter()
                .map(|c| c.id.clone())
                .collect(),
            levenshtein_threshold: preferences.levenshtein_threshold,
            ban_short_form: preferences.ban_short_form,
            short_form_threshold: preferences.short_form_threshold,
        }
    }

    /// Whether `text` contains a banned term at the configured threshold
    pub fn contains_banned_word(&self, text: &str) -> bool {
        self.matcher.matches(text, self.levenshtein_threshold)
    }
}

impl Default for FilterContext {
    fn default() -> Self {
        Self::new(&FilterPreferences::default())
    }
}
