//! Filter implementations for the content pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod banned_channel;
pub mod banned_word;
pub mod short_form;
pub mod topic_channel;

// Re-export for convenience
pub use banned_channel::BannedChannelFilter;
pub use banned_word::{BannedWordFilter, VideoField};
pub use short_form::{is_short_form_content, ShortFormFilter};
pub use topic_channel::{strip_topic_suffix, TopicChannelFilter};
