//! # Catalog Crate
//!
//! Domain records and persistence seams shared by the content filter and
//! the subscription feed.
//!
//! ## Main Components
//!
//! - **types**: `Video`, `FeedVideo`, `SubscribedChannel`, `BannedChannel`
//! - **store**: `KeyValueStore` with in-memory and JSON-file backends
//! - **preferences**: `FilterPreferences` and the providers that resolve them
//! - **parser**: metadata-provider payload parsing
//! - **error**: Error types for the above
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{FileStore, PreferenceProvider, StorePreferences};
//! use std::sync::Arc;
//!
//! let store = Arc::new(FileStore::open("store.json"));
//! let prefs = StorePreferences::new(store).load_preferences()?;
//! println!("{} banned words", prefs.banned_words.len());
//! ```

pub mod error;
pub mod parser;
pub mod preferences;
pub mod store;
pub mod types;

pub use error::{CatalogError, Result};
pub use parser::{parse_channel_videos, parse_subscriptions};
pub use preferences::{FilterPreferences, PreferenceProvider, StorePreferences};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use types::{
    BannedChannel,
    ChannelId,
    ChannelRef,
    FeedVideo,
    SubscribedChannel,
    Thumbnail,
    Video,
};
