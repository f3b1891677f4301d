//! Feed Interleaver - fair merge of per-channel video lists
//!
//! Builds a single feed from one list per subscribed channel so that no
//! single prolific channel can crowd out the rest.
//!
//! ## Algorithm
//! 1. Cap every channel at `max(3, limit / channels)` videos
//! 2. Round-robin: take each channel's next video in turn until the feed
//!    is full or every channel is exhausted
//! 3. Bounded local shuffle: walking backwards, swap each position with one
//!    0 to 2 places earlier
//!
//! The shuffle only nudges neighbours. It is intentionally not uniform:
//! newer videos stay near the top while the feed does not look mechanical.

use catalog::{ChannelId, FeedVideo, Video};
use rand::Rng;
use tracing::debug;

/// Every channel may contribute at least this many videos
pub const MIN_PER_CHANNEL: usize = 3;

/// Largest distance an element is swapped towards the front per step
pub const MAX_SHUFFLE_OFFSET: usize = 2;

/// Videos fetched for one channel, newest first
#[derive(Debug, Clone, Default)]
pub struct ChannelVideoList {
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub videos: Vec<Video>,
}

impl ChannelVideoList {
    pub fn new(channel_id: impl Into<String>, channel_name: impl Into<String>, videos: Vec<Video>) -> Self {
        Self {
            channel_id: channel_id.into(),
            channel_name: channel_name.into(),
            videos,
        }
    }

    /// A channel whose fetch failed: it still counts toward the cap but
    /// contributes nothing.
    pub fn empty(channel_id: impl Into<String>, channel_name: impl Into<String>) -> Self {
        Self::new(channel_id, channel_name, Vec::new())
    }
}

/// Per-channel cap for a feed of `limit` over `channel_count` channels
pub fn per_channel_cap(limit: usize, channel_count: usize) -> usize {
    if channel_count == 0 {
        return 0;
    }
    MIN_PER_CHANNEL.max(limit / channel_count)
}

/// Cap and tag each list, then merge round-robin in list order.
///
/// Stops as soon as the feed holds `limit` videos, even mid-pass.
pub fn round_robin(lists: Vec<ChannelVideoList>, limit: usize) -> Vec<FeedVideo> {
    let cap = per_channel_cap(limit, lists.len());

    let mut queues: Vec<std::vec::IntoIter<FeedVideo>> = lists
        .into_iter()
        .map(|list| {
            let ChannelVideoList {
                channel_id,
                channel_name,
                mut videos,
            } = list;
            videos.truncate(cap);
            videos
                .into_iter()
                .map(|video| FeedVideo {
                    video,
                    channel_id: channel_id.clone(),
                    channel_name: channel_name.clone(),
                })
                .collect::<Vec<_>>()
                .into_iter()
        })
        .collect();

    let mut feed = Vec::new();
    let mut emitted = true;
    while emitted && feed.len() < limit {
        emitted = false;
        for queue in queues.iter_mut() {
            if let Some(video) = queue.next() {
                feed.push(video);
                emitted = true;
                if feed.len() >= limit {
                    break;
                }
            }
        }
    }
    feed
}

/// Bounded local shuffle driven by `next_offset`.
///
/// For each index `i` from the end down to 1, swaps `items[i]` with
/// `items[i - offset]` (clamped at 0), where `offset = next_offset()`
/// capped at [`MAX_SHUFFLE_OFFSET`].
pub fn bounded_shuffle_by<T>(items: &mut [T], mut next_offset: impl FnMut() -> usize) {
    for i in (1..items.len()).rev() {
        let offset = next_offset().min(MAX_SHUFFLE_OFFSET);
        let j = i.saturating_sub(offset);
        if i != j {
            items.swap(i, j);
        }
    }
}

/// Bounded local shuffle with offsets drawn uniformly from `0..=2`.
pub fn bounded_shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    bounded_shuffle_by(items, || rng.random_range(0..=MAX_SHUFFLE_OFFSET));
}

/// Interleave per-channel lists into a feed of at most `limit` videos.
///
/// # Arguments
/// * `lists` - One list per channel, in subscription order
/// * `limit` - Maximum feed length
/// * `rng` - Randomness for the local shuffle; seed it for reproducible feeds
pub fn interleave<R: Rng>(lists: Vec<ChannelVideoList>, limit: usize, rng: &mut R) -> Vec<FeedVideo> {
    let channel_count = lists.len();
    let mut feed = round_robin(lists, limit);
    bounded_shuffle(&mut feed, rng);
    debug!(
        "Interleaved {} videos from {} channels (limit: {})",
        feed.len(),
        channel_count,
        limit
    );
    feed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn list(channel: &str, titles: &[&str]) -> ChannelVideoList {
        let videos = titles
            .iter()
            .map(|t| Video::new(*t, "", channel, channel, 300))
            .collect();
        ChannelVideoList::new(channel, channel.to_uppercase(), videos)
    }

    fn titles(feed: &[FeedVideo]) -> Vec<&str> {
        feed.iter().map(|v| v.video.title.as_str()).collect()
    }

    #[test]
    fn test_per_channel_cap() {
        assert_eq!(per_channel_cap(30, 2), 15);
        assert_eq!(per_channel_cap(5, 2), 3);
        assert_eq!(per_channel_cap(30, 100), 3);
        assert_eq!(per_channel_cap(30, 0), 0);
    }

    #[test]
    fn test_round_robin_order() {
        let lists = vec![list("a", &["a1", "a2", "a3"]), list("b", &["b1", "b2"])];
        let feed = round_robin(lists, 5);
        assert_eq!(titles(&feed), vec!["a1", "b1", "a2", "b2", "a3"]);
        assert_eq!(feed[1].channel_id, "b");
        assert_eq!(feed[1].channel_name, "B");
    }

    #[test]
    fn test_round_robin_respects_cap() {
        let lists = vec![
            list("a", &["a1", "a2", "a3", "a4", "a5", "a6"]),
            list("b", &["b1"]),
        ];
        // cap = max(3, 4 / 2) = 3
        let feed = round_robin(lists, 4);
        assert_eq!(titles(&feed), vec!["a1", "b1", "a2", "a3"]);
    }

    #[test]
    fn test_round_robin_stops_mid_pass() {
        let lists = vec![
            list("a", &["a1", "a2"]),
            list("b", &["b1", "b2"]),
            list("c", &["c1", "c2"]),
        ];
        let feed = round_robin(lists, 4);
        assert_eq!(titles(&feed), vec!["a1", "b1", "c1", "a2"]);
    }

    #[test]
    fn test_round_robin_edge_cases() {
        assert!(round_robin(Vec::new(), 10).is_empty());
        assert!(round_robin(vec![list("a", &["a1"])], 0).is_empty());
        assert!(round_robin(vec![ChannelVideoList::empty("a", "A")], 10).is_empty());
    }

    #[test]
    fn test_bounded_shuffle_zero_offsets_is_identity() {
        let mut items = vec![1, 2, 3, 4, 5];
        bounded_shuffle_by(&mut items, || 0);
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_bounded_shuffle_fixed_offsets() {
        let mut items = vec!["a1", "b1", "a2", "b2", "a3"];
        bounded_shuffle_by(&mut items, || 1);
        assert_eq!(items, vec!["a3", "a1", "b1", "a2", "b2"]);

        let mut items = vec!["a1", "b1", "a2", "b2", "a3"];
        bounded_shuffle_by(&mut items, || 2);
        assert_eq!(items, vec!["b2", "a3", "a1", "b1", "a2"]);
    }

    #[test]
    fn test_bounded_shuffle_swaps_are_local() {
        let mut items: Vec<usize> = (0..10).collect();
        let mut offsets = [2, 0, 1, 2, 2, 0, 0, 1, 2].into_iter();
        let mut swaps = Vec::new();
        let mut i = items.len();
        bounded_shuffle_by(&mut items, || {
            i -= 1;
            let offset = offsets.next().unwrap_or(0);
            swaps.push((i, i.saturating_sub(offset)));
            offset
        });
        for (from, to) in swaps {
            assert!(from - to <= MAX_SHUFFLE_OFFSET);
        }
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_interleave_seeded_is_reproducible() {
        let make = || vec![list("a", &["a1", "a2", "a3"]), list("b", &["b1", "b2"])];

        let first = interleave(make(), 5, &mut StdRng::seed_from_u64(42));
        let second = interleave(make(), 5, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);

        let mut got = titles(&first);
        got.sort();
        assert_eq!(got, vec!["a1", "a2", "a3", "b1", "b2"]);
    }

    #[test]
    fn test_interleave_respects_limit() {
        let lists = vec![
            list("a", &["a1", "a2", "a3", "a4"]),
            list("b", &["b1", "b2", "b3", "b4"]),
            list("c", &["c1", "c2", "c3", "c4"]),
        ];
        let feed = interleave(lists, 7, &mut StdRng::seed_from_u64(1));
        assert_eq!(feed.len(), 7);
    }
}
