//! Parsing of metadata-provider payloads.
//!
//! The provider's channel endpoint has returned two shapes over time:
//! - a bare array of videos: `[{...}, {...}]`
//! - an object with a `videos` array (and an optional `continuation`)
//!
//! Both are accepted here so callers never have to care. An object carrying
//! an `error` message is reported as an error rather than an empty channel.

use crate::error::{CatalogError, Result};
use crate::types::{SubscribedChannel, Video};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum ChannelVideosPayload {
    Listing {
        #[serde(default)]
        videos: Vec<Video>,
        #[serde(default)]
        error: Option<String>,
    },
    Bare(Vec<Video>),
}

/// Parse a channel's video listing.
///
/// Example: `{"videos": [{"title": "a"}]}` -> one video titled "a"
pub fn parse_channel_videos(json: &str) -> Result<Vec<Video>> {
    let payload: ChannelVideosPayload = serde_json::from_str(json)?;
    match payload {
        ChannelVideosPayload::Listing { error: Some(message), .. } => Err(CatalogError::InvalidValue {
            key: "error".to_string(),
            value: message,
        }),
        ChannelVideosPayload::Listing { videos, .. } => Ok(videos),
        ChannelVideosPayload::Bare(videos) => Ok(videos),
    }
}

/// Parse a persisted subscription list
pub fn parse_subscriptions(json: &str) -> Result<Vec<SubscribedChannel>> {
    Ok(serde_json::from_str(json)?)
}
