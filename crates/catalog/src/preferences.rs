//! User filter preferences and the provider that resolves them.
//!
//! Preferences are resolved at the boundary: the matcher itself only ever
//! sees a fully-populated [`FilterPreferences`]. Each key degrades to its
//! default on its own when absent or malformed.
//!
//! | key                    | format                      | default |
//! |------------------------|-----------------------------|---------|
//! | `bannedWords`          | JSON array of strings       | `[]`    |
//! | `bannedChannels`       | JSON array of `{id, name}`  | `[]`    |
//! | `levenshteinThreshold` | integer                     | `1`     |
//! | `banShortForm`         | `"true"` enables            | `false` |
//! | `shortFormThreshold`   | integer seconds             | `60`    |

use crate::error::Result;
use crate::store::KeyValueStore;
use crate::types::BannedChannel;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::warn;

pub const BANNED_WORDS_KEY: &str = "bannedWords";
pub const BANNED_CHANNELS_KEY: &str = "bannedChannels";
pub const LEVENSHTEIN_THRESHOLD_KEY: &str = "levenshteinThreshold";
pub const BAN_SHORT_FORM_KEY: &str = "banShortForm";
pub const SHORT_FORM_THRESHOLD_KEY: &str = "shortFormThreshold";

pub const DEFAULT_LEVENSHTEIN_THRESHOLD: usize = 1;
pub const DEFAULT_SHORT_FORM_THRESHOLD: u64 = 60;

/// Everything the content filter needs to decide on a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPreferences {
    pub banned_words: Vec<String>,
    pub banned_channels: Vec<BannedChannel>,
    pub levenshtein_threshold: usize,
    pub ban_short_form: bool,
    pub short_form_threshold: u64,
}

impl Default for FilterPreferences {
    fn default() -> Self {
        Self {
            banned_words: Vec::new(),
            banned_channels: Vec::new(),
            levenshtein_threshold: DEFAULT_LEVENSHTEIN_THRESHOLD,
            ban_short_form: false,
            short_form_threshold: DEFAULT_SHORT_FORM_THRESHOLD,
        }
    }
}

/// Source of filter preferences.
pub trait PreferenceProvider: Send + Sync {
    fn load_preferences(&self) -> Result<FilterPreferences>;
}

/// Preferences held in memory; never fails.
impl PreferenceProvider for FilterPreferences {
    fn load_preferences(&self) -> Result<FilterPreferences> {
        Ok(self.clone())
    }
}

/// Preferences read from (and written to) a [`KeyValueStore`].
#[derive(Clone)]
pub struct StorePreferences {
    store: Arc<dyn KeyValueStore>,
}

impl StorePreferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Add a banned word. Returns false if an equal word (ignoring case and
    /// surrounding whitespace) is already banned or the word is blank.
    pub fn add_banned_word(&self, word: &str) -> Result<bool> {
        let word = word.trim();
        if word.is_empty() {
            return Ok(false);
        }
        let lowered = word.to_lowercase();
        self.update_json(BANNED_WORDS_KEY, |words: &mut Vec<String>| {
            if words.iter().any(|w| w.to_lowercase() == lowered) {
                return false;
            }
            words.push(word.to_string());
            true
        })
    }

    /// Remove a banned word (case-insensitive). Returns true if removed.
    pub fn remove_banned_word(&self, word: &str) -> Result<bool> {
        let needle = word.trim().to_lowercase();
        self.update_json(BANNED_WORDS_KEY, |words: &mut Vec<String>| {
            let before = words.len();
            words.retain(|w| w.to_lowercase() != needle);
            words.len() != before
        })
    }

    /// Ban a channel by id. Returns false if it is already banned.
    pub fn add_banned_channel(&self, channel: BannedChannel) -> Result<bool> {
        let mut channel = Some(channel);
        self.update_json(BANNED_CHANNELS_KEY, |channels: &mut Vec<BannedChannel>| {
            match channel.take() {
                Some(channel) if !channels.iter().any(|c| c.id == channel.id) => {
                    channels.push(channel);
                    true
                }
                _ => false,
            }
        })
    }

    /// Lift a channel ban. Returns true if removed.
    pub fn remove_banned_channel(&self, channel_id: &str) -> Result<bool> {
        self.update_json(BANNED_CHANNELS_KEY, |channels: &mut Vec<BannedChannel>| {
            let before = channels.len();
            channels.retain(|c| c.id != channel_id);
            channels.len() != before
        })
    }

    pub fn set_levenshtein_threshold(&self, threshold: usize) -> Result<()> {
        self.store
            .set(LEVENSHTEIN_THRESHOLD_KEY, &threshold.to_string())
    }

    pub fn set_short_form(&self, enabled: bool, threshold: Option<u64>) -> Result<()> {
        self.store.set(BAN_SHORT_FORM_KEY, &enabled.to_string())?;
        if let Some(threshold) = threshold {
            self.store
                .set(SHORT_FORM_THRESHOLD_KEY, &threshold.to_string())?;
        }
        Ok(())
    }

    /// Read a JSON value; store errors propagate, malformed JSON does not.
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        Ok(self
            .store
            .get(key)?
            .and_then(|raw| parse_json(key, &raw)))
    }

    /// Apply `mutate` to the JSON value under `key` in one store update.
    ///
    /// A missing or malformed value starts from `T::default()`. The value is
    /// written back only when `mutate` reports a change, and the report is
    /// returned.
    fn update_json<T, F>(&self, key: &str, mut mutate: F) -> Result<bool>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnMut(&mut T) -> bool,
    {
        let mut changed = false;
        let mut encode_error = None;
        self.store.update(key, &mut |raw| {
            let mut value: T = raw.and_then(|raw| parse_json(key, raw)).unwrap_or_default();
            if !mutate(&mut value) {
                return None;
            }
            match serde_json::to_string(&value) {
                Ok(json) => {
                    changed = true;
                    Some(json)
                }
                Err(e) => {
                    encode_error = Some(e);
                    None
                }
            }
        })?;
        if let Some(e) = encode_error {
            return Err(e.into());
        }
        Ok(changed)
    }

    fn read_number<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match raw.trim().parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                warn!("Ignoring malformed {} in store: {:?}", key, raw);
                Ok(None)
            }
        }
    }
}

fn parse_json<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring malformed {} in store: {}", key, e);
            None
        }
    }
}

impl PreferenceProvider for StorePreferences {
    fn load_preferences(&self) -> Result<FilterPreferences> {
        let defaults = FilterPreferences::default();
        Ok(FilterPreferences {
            banned_words: self.read_json(BANNED_WORDS_KEY)?.unwrap_or(defaults.banned_words),
            banned_channels: self
                .read_json(BANNED_CHANNELS_KEY)?
                .unwrap_or(defaults.banned_channels),
            levenshtein_threshold: self
                .read_number(LEVENSHTEIN_THRESHOLD_KEY)?
                .unwrap_or(defaults.levenshtein_threshold),
            ban_short_form: self
                .store
                .get(BAN_SHORT_FORM_KEY)?
                .is_some_and(|v| v == "true"),
            short_form_threshold: self
                .read_number(SHORT_FORM_THRESHOLD_KEY)?
                .unwrap_or(defaults.short_form_threshold),
        })
    }
}
