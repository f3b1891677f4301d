//! Core domain types shared by the filter pipeline and the feed.
//!
//! Records mirror the metadata provider's payloads (camelCase on the wire)
//! but with a fixed shape: optional collections are empty vectors, never
//! absent, and missing scalars fall back to their zero value.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Opaque channel identifier as issued by the metadata provider
pub type ChannelId = String;

// =============================================================================
// Video-related Types
// =============================================================================

/// A thumbnail image reference
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// Only present on video thumbnails ("maxres", "medium", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

/// A single video as listed by the metadata provider.
///
/// The filter only looks at `title`, `description`, `author`, `author_id`
/// and `length_seconds`; the rest is carried through for display.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Video {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub author_id: ChannelId,
    /// Duration in seconds; 0 for live streams and unknown lengths
    pub length_seconds: u64,
    /// Unix timestamp (seconds) of publication
    pub published: i64,
    pub view_count: u64,
    pub author_thumbnails: Vec<Thumbnail>,
    pub video_thumbnails: Vec<Thumbnail>,
}

impl Video {
    /// Build a video from the fields the filter cares about.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        author: impl Into<String>,
        author_id: impl Into<String>,
        length_seconds: u64,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            author: author.into(),
            author_id: author_id.into(),
            length_seconds,
            ..Self::default()
        }
    }
}

/// A video placed in the subscription feed, tagged with the channel it was
/// fetched for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedVideo {
    #[serde(flatten)]
    pub video: Video,
    pub channel_id: ChannelId,
    pub channel_name: String,
}

// =============================================================================
// Channel-related Types
// =============================================================================

/// A channel the user has banned. Matched on `id` only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BannedChannel {
    pub id: ChannelId,
    pub name: String,
}

/// A channel the user follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedChannel {
    pub id: ChannelId,
    pub name: String,
    pub thumbnail: Option<String>,
    /// Unix timestamp in milliseconds
    pub subscribed_at: i64,
}

/// The minimal channel description needed to subscribe, as found on a
/// video or channel page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChannelRef {
    pub author_id: ChannelId,
    pub author: String,
    pub author_thumbnails: Vec<Thumbnail>,
}
