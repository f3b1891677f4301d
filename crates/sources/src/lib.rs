//! # Sources Crate
//!
//! Everything that produces the subscription feed.
//!
//! ## Components
//!
//! ### Subscription store
//! The followed channels, persisted in a key-value store and observable
//! through a `tokio::sync::watch` receiver.
//!
//! ### Channel video sources
//! The `ChannelVideoSource` trait lists one channel's recent videos.
//! `FixtureSource` serves them from JSON files on disk.
//!
//! ### Feed interleaver
//! Caps each channel, merges round-robin and applies a bounded local
//! shuffle so the feed stays fresh without one channel dominating.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{build_feed, FixtureSource, SubscriptionStore};
//! use rand::SeedableRng;
//! use std::sync::Arc;
//!
//! let subscriptions = SubscriptionStore::open(store)?;
//! let source = Arc::new(FixtureSource::new("fixtures"));
//!
//! let rng = rand::rngs::StdRng::seed_from_u64(7);
//! let feed = build_feed(source, &subscriptions.list(), 30, rng).await;
//! ```

pub mod feed;
pub mod interleave;
pub mod source;
pub mod subscriptions;

// Re-export main types
pub use feed::{build_feed, fetch_channel_lists};
pub use interleave::{
    bounded_shuffle, bounded_shuffle_by, interleave, per_channel_cap, round_robin,
    ChannelVideoList,
};
pub use source::{ChannelVideoSource, FixtureSource};
pub use subscriptions::{SubscriptionStore, SUBSCRIPTIONS_KEY};
