//! Subscription store
//!
//! Holds the channels the user follows, persisted as a JSON array under the
//! `subscriptions` key of a [`KeyValueStore`]. Every mutation is published
//! on a `tokio::sync::watch` channel so views can follow the list without
//! polling.
//!
//! Mutations are serialised by a writer lock held from the membership check
//! through persistence, so concurrent callers never overwrite each other.
//! Use one `SubscriptionStore` per underlying store.

use anyhow::{Context, Result, anyhow};
use catalog::{ChannelRef, KeyValueStore, SubscribedChannel, parse_subscriptions};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Store key holding the subscription list
pub const SUBSCRIPTIONS_KEY: &str = "subscriptions";

pub struct SubscriptionStore {
    store: Arc<dyn KeyValueStore>,
    channels: watch::Sender<Vec<SubscribedChannel>>,
    writer: Mutex<()>,
}

impl SubscriptionStore {
    /// Load the persisted subscription list.
    ///
    /// A missing key is an empty list. So is a malformed one, after logging:
    /// a corrupt list must not lock the user out of their feed.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let raw = store
            .get(SUBSCRIPTIONS_KEY)
            .context("Failed to read subscriptions")?;

        let channels = match raw {
            Some(json) => parse_subscriptions(&json).unwrap_or_else(|e| {
                error!("Discarding malformed subscription list: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };
        debug!("Loaded {} subscriptions", channels.len());

        let (sender, _) = watch::channel(channels);
        Ok(Self {
            store,
            channels: sender,
            writer: Mutex::new(()),
        })
    }

    /// Follow a channel. Returns false if it was already followed.
    pub fn subscribe(&self, channel: ChannelRef) -> Result<bool> {
        let _writer = self.lock_writer()?;
        if self.is_subscribed(&channel.author_id) {
            return Ok(false);
        }

        let entry = SubscribedChannel {
            thumbnail: channel.author_thumbnails.first().map(|t| t.url.clone()),
            id: channel.author_id,
            name: channel.author,
            subscribed_at: now_millis(),
        };
        info!("Subscribing to {} ({})", entry.name, entry.id);

        let mut updated = self.list();
        updated.push(entry);
        self.persist(updated)?;
        Ok(true)
    }

    /// Stop following a channel. Returns true iff something was removed.
    pub fn unsubscribe(&self, channel_id: &str) -> Result<bool> {
        let _writer = self.lock_writer()?;
        let mut updated = self.list();
        let before = updated.len();
        updated.retain(|c| c.id != channel_id);
        if updated.len() == before {
            return Ok(false);
        }

        info!("Unsubscribing from {}", channel_id);
        self.persist(updated)?;
        Ok(true)
    }

    pub fn is_subscribed(&self, channel_id: &str) -> bool {
        self.channels.borrow().iter().any(|c| c.id == channel_id)
    }

    /// Current subscriptions in the order they were added
    pub fn list(&self) -> Vec<SubscribedChannel> {
        self.channels.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.channels.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.borrow().is_empty()
    }

    /// Receiver that sees the current list and every later change
    pub fn watch(&self) -> watch::Receiver<Vec<SubscribedChannel>> {
        self.channels.subscribe()
    }

    fn lock_writer(&self) -> Result<MutexGuard<'_, ()>> {
        self.writer
            .lock()
            .map_err(|_| anyhow!("Subscription writer lock poisoned"))
    }

    /// Callers must hold the writer lock.
    fn persist(&self, channels: Vec<SubscribedChannel>) -> Result<()> {
        let json = serde_json::to_string(&channels).context("Failed to serialize subscriptions")?;
        self.store
            .set(SUBSCRIPTIONS_KEY, &json)
            .context("Failed to persist subscriptions")?;
        self.channels.send_replace(channels);
        Ok(())
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{MemoryStore, Thumbnail};

    fn channel(id: &str, name: &str) -> ChannelRef {
        ChannelRef {
            author_id: id.to_string(),
            author: name.to_string(),
            author_thumbnails: Vec::new(),
        }
    }

    fn memory_store() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_subscribe_and_list() {
        let subs = SubscriptionStore::open(memory_store()).unwrap();
        assert!(subs.is_empty());

        assert!(subs.subscribe(channel("UC1", "One")).unwrap());
        assert!(subs.subscribe(channel("UC2", "Two")).unwrap());

        let ids: Vec<String> = subs.list().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["UC1", "UC2"]);
        assert!(subs.is_subscribed("UC1"));
        assert!(!subs.is_subscribed("UC3"));
    }

    #[test]
    fn test_duplicate_subscribe_returns_false() {
        let subs = SubscriptionStore::open(memory_store()).unwrap();
        assert!(subs.subscribe(channel("UC1", "One")).unwrap());
        assert!(!subs.subscribe(channel("UC1", "One again")).unwrap());
        assert_eq!(subs.len(), 1);
        assert_eq!(subs.list()[0].name, "One");
    }

    #[test]
    fn test_thumbnail_is_first_author_thumbnail() {
        let subs = SubscriptionStore::open(memory_store()).unwrap();
        let mut with_thumbs = channel("UC1", "One");
        with_thumbs.author_thumbnails = vec![
            Thumbnail {
                url: "https://img/small.jpg".to_string(),
                width: 32,
                height: 32,
                quality: None,
            },
            Thumbnail {
                url: "https://img/large.jpg".to_string(),
                width: 512,
                height: 512,
                quality: None,
            },
        ];
        subs.subscribe(with_thumbs).unwrap();
        subs.subscribe(channel("UC2", "Two")).unwrap();

        let list = subs.list();
        assert_eq!(list[0].thumbnail.as_deref(), Some("https://img/small.jpg"));
        assert_eq!(list[1].thumbnail, None);
        assert!(list[0].subscribed_at > 0);
    }

    #[test]
    fn test_unsubscribe() {
        let subs = SubscriptionStore::open(memory_store()).unwrap();
        subs.subscribe(channel("UC1", "One")).unwrap();

        assert!(!subs.unsubscribe("UC9").unwrap());
        assert!(subs.unsubscribe("UC1").unwrap());
        assert!(subs.is_empty());
    }

    #[test]
    fn test_persists_to_store() {
        let store = memory_store();
        let subs = SubscriptionStore::open(store.clone()).unwrap();
        subs.subscribe(channel("UC1", "One")).unwrap();

        let reopened = SubscriptionStore::open(store.clone()).unwrap();
        assert!(reopened.is_subscribed("UC1"));

        let raw = store.get(SUBSCRIPTIONS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"subscribedAt\""));
    }

    #[test]
    fn test_malformed_list_starts_empty() {
        let store: Arc<dyn KeyValueStore> =
            Arc::new(MemoryStore::with_values([(SUBSCRIPTIONS_KEY, "{oops")]));
        let subs = SubscriptionStore::open(store).unwrap();
        assert!(subs.is_empty());

        // The next mutation overwrites the corrupt value
        subs.subscribe(channel("UC1", "One")).unwrap();
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn test_concurrent_subscribes_are_all_kept() {
        let store = memory_store();
        let subs = SubscriptionStore::open(store.clone()).unwrap();
        let barrier = std::sync::Barrier::new(16);

        let added: Vec<bool> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|i| {
                    let subs = &subs;
                    let barrier = &barrier;
                    scope.spawn(move || {
                        barrier.wait();
                        subs.subscribe(channel(&format!("UC{}", i), "Chan")).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(added.iter().all(|&a| a));
        assert_eq!(subs.len(), 16);
        assert_eq!(SubscriptionStore::open(store).unwrap().len(), 16);
    }

    #[test]
    fn test_concurrent_duplicate_subscribe_added_once() {
        let subs = SubscriptionStore::open(memory_store()).unwrap();
        let shared = &subs;

        let added = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(move || shared.subscribe(channel("UC1", "One")).unwrap()))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|&added| added)
                .count()
        });

        assert_eq!(added, 1);
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn test_concurrent_unsubscribes_are_all_applied() {
        let store = memory_store();
        let subs = SubscriptionStore::open(store.clone()).unwrap();
        for i in 0..16 {
            subs.subscribe(channel(&format!("UC{}", i), "Chan")).unwrap();
        }

        std::thread::scope(|scope| {
            for i in (0..16).step_by(2) {
                let subs = &subs;
                scope.spawn(move || assert!(subs.unsubscribe(&format!("UC{}", i)).unwrap()));
            }
        });

        assert_eq!(subs.len(), 8);
        let ids: Vec<String> = SubscriptionStore::open(store)
            .unwrap()
            .list()
            .into_iter()
            .map(|c| c.id)
            .collect();
        let expected: Vec<String> = (1..16).step_by(2).map(|i| format!("UC{}", i)).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_watchers_are_notified() {
        let subs = SubscriptionStore::open(memory_store()).unwrap();
        let mut rx = subs.watch();
        assert!(!rx.has_changed().unwrap());

        subs.subscribe(channel("UC1", "One")).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        // A no-op unsubscribe does not notify
        subs.unsubscribe("UC9").unwrap();
        assert!(!rx.has_changed().unwrap());

        subs.unsubscribe("UC1").unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
    }
}
