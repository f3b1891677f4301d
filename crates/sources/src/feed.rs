//! Subscription feed assembly
//!
//! Fetches every subscribed channel concurrently (one tokio task per
//! channel) and interleaves the results. All tasks are awaited, in
//! subscription order; a failed channel only loses its own videos.

use crate::interleave::{ChannelVideoList, interleave};
use crate::source::ChannelVideoSource;
use catalog::{FeedVideo, SubscribedChannel};
use rand::Rng;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Fetch the video list of every channel.
///
/// Returns one list per channel, in the order given. Channels whose fetch
/// fails (or whose task panics) get an empty list, so they still count
/// toward the per-channel cap.
#[instrument(skip(source, channels), fields(channel_count = channels.len()))]
pub async fn fetch_channel_lists<S: ChannelVideoSource>(
    source: Arc<S>,
    channels: &[SubscribedChannel],
) -> Vec<ChannelVideoList> {
    let handles: Vec<_> = channels
        .iter()
        .map(|channel| {
            let source = Arc::clone(&source);
            let channel_id = channel.id.clone();
            tokio::spawn(async move { source.channel_videos(&channel_id).await })
        })
        .collect();

    let mut lists = Vec::with_capacity(channels.len());
    for (channel, handle) in channels.iter().zip(handles) {
        let videos = match handle.await {
            Ok(Ok(videos)) => videos,
            Ok(Err(e)) => {
                warn!("Failed to fetch videos for channel {}: {:#}", channel.id, e);
                Vec::new()
            }
            Err(e) => {
                warn!("Fetch task for channel {} did not complete: {}", channel.id, e);
                Vec::new()
            }
        };
        lists.push(ChannelVideoList::new(
            channel.id.clone(),
            channel.name.clone(),
            videos,
        ));
    }
    lists
}

/// Build the interleaved subscription feed.
///
/// No channels means an empty feed without touching the source.
#[instrument(skip(source, channels, rng), fields(channel_count = channels.len()))]
pub async fn build_feed<S, R>(
    source: Arc<S>,
    channels: &[SubscribedChannel],
    limit: usize,
    mut rng: R,
) -> Vec<FeedVideo>
where
    S: ChannelVideoSource,
    R: Rng,
{
    if channels.is_empty() || limit == 0 {
        return Vec::new();
    }

    let lists = fetch_channel_lists(source, channels).await;
    let fetched: usize = lists.iter().map(|l| l.videos.len()).sum();
    let feed = interleave(lists, limit, &mut rng);

    info!(
        "Built feed of {} videos from {} fetched across {} channels",
        feed.len(),
        fetched,
        channels.len()
    );
    feed
}
