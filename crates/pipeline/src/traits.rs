//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that lets each content rule be
//! written, tested and ordered on its own.

use crate::decision::{FilterContext, FilterReason};
use catalog::Video;

/// A single content rule.
///
/// All rules must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows one pipeline to classify a batch on many threads
/// - Rules only borrow the video; classification never mutates input
/// - Returning the reason (not a bool) lets the pipeline stop at the first
///   rule that fires and report why
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Check one video.
    ///
    /// # Arguments
    /// * `video` - The video to check
    /// * `context` - Compiled preferences for this run
    ///
    /// # Returns
    /// * `Some(reason)` - The video must be hidden
    /// * `None` - This rule has no objection
    fn check(&self, video: &Video, context: &FilterContext) -> Option<FilterReason>;
}
