//! Optional filter for short-form content.

use crate::decision::{FilterContext, FilterReason};
use crate::traits::Filter;
use catalog::Video;

/// Whether a video of `length_seconds` counts as short form under
/// `threshold`.
pub fn is_short_form_content(length_seconds: u64, threshold: u64) -> bool {
    length_seconds < threshold
}

/// Hides videos shorter than the configured threshold when enabled.
///
/// A length of 0 means live or unknown and is never treated as short.
pub struct ShortFormFilter;

impl Filter for ShortFormFilter {
    fn name(&self) -> &str {
        "ShortFormFilter"
    }

    fn check(&self, video: &Video, context: &FilterContext) -> Option<FilterReason> {
        if !context.ban_short_form || video.length_seconds == 0 {
            return None;
        }
        is_short_form_content(video.length_seconds, context.short_form_threshold)
            .then_some(FilterReason::ShortForm)
    }
}
