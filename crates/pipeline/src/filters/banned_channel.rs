//! Filter to hide everything from banned channels.
//!
//! This is the first filter in the standard pipeline: a channel ban wins
//! over any word match.

use crate::decision::{FilterContext, FilterReason};
use crate::traits::Filter;
use catalog::Video;

/// Hides videos whose author id is banned.
///
/// ## Algorithm
/// Exact id lookup in the HashSet in FilterContext; no fuzzy matching.
/// Videos without an author id are never matched.
pub struct BannedChannelFilter;

impl Filter for BannedChannelFilter {
    fn name(&self) -> &str {
        "BannedChannelFilter"
    }

    fn check(&self, video: &Video, context: &FilterContext) -> Option<FilterReason> {
        if context.banned_channel_ids.is_empty() || video.author_id.is_empty() {
            return None;
        }
        context
            .banned_channel_ids
            .contains(&video.author_id)
            .then_some(FilterReason::ChannelBanned)
    }
}
