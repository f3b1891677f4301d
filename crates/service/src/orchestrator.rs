//! # Feed Orchestrator
//!
//! Coordinates everything a view needs:
//! 1. Resolve filter preferences at the boundary
//! 2. Classify single videos or whole batches
//! 3. Fetch every subscribed channel concurrently
//! 4. Interleave the results into one feed
//! 5. Optionally hide what the filter rejects
//!
//! Nothing here is fatal. Unreadable preferences mean "show everything",
//! a failed channel contributes nothing and a failed aggregation yields an
//! empty feed. Each of those is logged.

use std::sync::Arc;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, error, info, instrument};

use catalog::{FeedVideo, PreferenceProvider, Video};
use pipeline::{FilterContext, FilterDecision, FilterPipeline};
use sources::{ChannelVideoSource, SubscriptionStore, build_feed};

/// Main orchestrator for filtering and the subscription feed
pub struct FeedOrchestrator<S> {
    preferences: Arc<dyn PreferenceProvider>,
    subscriptions: Arc<SubscriptionStore>,
    source: Arc<S>,
    pipeline: Arc<FilterPipeline>,
    seed: Option<u64>,
}

impl<S: ChannelVideoSource> FeedOrchestrator<S> {
    /// Create an orchestrator using the standard filter pipeline.
    ///
    /// # Arguments
    /// * `preferences` - Where filter preferences are read from, once per call
    /// * `subscriptions` - The followed channels
    /// * `source` - Lists each channel's recent videos
    pub fn new(
        preferences: Arc<dyn PreferenceProvider>,
        subscriptions: Arc<SubscriptionStore>,
        source: Arc<S>,
    ) -> Self {
        Self {
            preferences,
            subscriptions,
            source,
            pipeline: Arc::new(FilterPipeline::standard()),
            seed: None,
        }
    }

    /// Use a fixed seed for the feed shuffle
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the filter pipeline
    pub fn with_pipeline(mut self, pipeline: FilterPipeline) -> Self {
        self.pipeline = Arc::new(pipeline);
        self
    }

    pub fn subscriptions(&self) -> &SubscriptionStore {
        &self.subscriptions
    }

    /// Decide whether a video should be hidden.
    ///
    /// Preferences are loaded on every call; if they cannot be read the
    /// video is kept.
    pub fn should_filter_video(&self, video: &Video) -> FilterDecision {
        match self.load_context() {
            Some(context) => self.pipeline.classify(video, &context),
            None => FilterDecision::keep(),
        }
    }

    /// Keep only the videos the filter accepts, in their original order.
    ///
    /// Preferences are loaded once for the whole batch.
    pub fn filter_videos(&self, videos: Vec<Video>) -> Vec<Video> {
        match self.load_context() {
            Some(context) => self.pipeline.apply(videos, &context),
            None => videos,
        }
    }

    /// Build the interleaved feed of all subscribed channels.
    ///
    /// Each channel is fetched in its own task; the aggregation runs in a
    /// task of its own too, and if that fails the feed is empty.
    #[instrument(skip(self))]
    pub async fn subscription_feed(&self, limit: usize) -> Vec<FeedVideo> {
        let channels = self.subscriptions.list();
        if channels.is_empty() {
            debug!("No subscriptions, feed is empty");
            return Vec::new();
        }

        let start_time = Instant::now();
        let source = Arc::clone(&self.source);
        let rng = self.feed_rng();

        let handle = tokio::spawn(async move { build_feed(source, &channels, limit, rng).await });
        match handle.await {
            Ok(feed) => {
                info!(
                    "Subscription feed ready: {} videos in {:.2?}",
                    feed.len(),
                    start_time.elapsed()
                );
                feed
            }
            Err(e) => {
                error!("Failed to build subscription feed: {}", e);
                Vec::new()
            }
        }
    }

    /// The subscription feed with filtered videos removed.
    #[instrument(skip(self))]
    pub async fn filtered_subscription_feed(&self, limit: usize) -> Vec<FeedVideo> {
        let feed = self.subscription_feed(limit).await;
        if feed.is_empty() {
            return feed;
        }
        let Some(context) = self.load_context() else {
            return feed;
        };

        let before = feed.len();
        let pipeline = Arc::clone(&self.pipeline);
        let result = tokio::task::spawn_blocking(move || {
            feed.into_iter()
                .filter(|item| !pipeline.classify(&item.video, &context).filtered)
                .collect::<Vec<_>>()
        })
        .await;

        match result {
            Ok(kept) => {
                info!("Filtered feed: kept {} of {} videos", kept.len(), before);
                kept
            }
            Err(e) => {
                error!("Feed filtering task failed: {}", e);
                Vec::new()
            }
        }
    }

    fn load_context(&self) -> Option<FilterContext> {
        match self.preferences.load_preferences() {
            Ok(preferences) => Some(FilterContext::new(&preferences)),
            Err(e) => {
                error!("Failed to load filter preferences, not filtering: {}", e);
                None
            }
        }
    }

    fn feed_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}
