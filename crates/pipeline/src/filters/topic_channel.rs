//! Filter for auto-generated "Artist - Topic" channels.
//!
//! Music uploads are often attributed to a generated channel named after
//! the artist with a ` - Topic` suffix. This filter re-checks the bare
//! artist name with the suffix removed.

use crate::decision::{FilterContext, FilterReason};
use crate::traits::Filter;
use catalog::Video;

/// Marker separating the artist name from the generated-channel suffix
pub const TOPIC_MARKER: &str = "- Topic";

/// The channel name before the Topic marker, trimmed; `None` when the
/// author has no marker.
///
/// Example: `"Some Band - Topic"` -> `Some("Some Band")`
pub fn strip_topic_suffix(author: &str) -> Option<&str> {
    author
        .split_once(TOPIC_MARKER)
        .map(|(name, _)| name.trim())
}

/// Hides videos from Topic channels whose bare name contains a banned term.
pub struct TopicChannelFilter;

impl Filter for TopicChannelFilter {
    fn name(&self) -> &str {
        "TopicChannelFilter"
    }

    fn check(&self, video: &Video, context: &FilterContext) -> Option<FilterReason> {
        if context.matcher.is_empty() {
            return None;
        }
        let name = strip_topic_suffix(&video.author)?;
        context
            .contains_banned_word(name)
            .then_some(FilterReason::TopicChannelNameBannedWord)
    }
}
