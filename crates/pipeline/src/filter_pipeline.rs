//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! filters together using the builder pattern, plus [`classify`], the
//! one-call entry point over plain preference values.

use crate::decision::{FilterContext, FilterDecision};
use crate::filters::{
    BannedChannelFilter, BannedWordFilter, ShortFormFilter, TopicChannelFilter, VideoField,
};
use crate::traits::Filter;
use catalog::{BannedChannel, FilterPreferences, Video};
use rayon::prelude::*;
use tracing::debug;

/// Chains filters together; the first filter with an objection decides.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(BannedChannelFilter)
///     .add_filter(BannedWordFilter::new(VideoField::Title))
///     .add_filter(ShortFormFilter);
///
/// let context = FilterContext::new(&preferences);
/// let decision = pipeline.classify(&video, &context);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The standard rule order:
    /// 1. Banned channel id
    /// 2. Banned word in title
    /// 3. Banned word in description
    /// 4. Banned word in channel name
    /// 5. Banned word in channel name without its Topic suffix
    /// 6. Short-form content
    pub fn standard() -> Self {
        Self::new()
            .add_filter(BannedChannelFilter)
            .add_filter(BannedWordFilter::new(VideoField::Title))
            .add_filter(BannedWordFilter::new(VideoField::Description))
            .add_filter(BannedWordFilter::new(VideoField::Author))
            .add_filter(TopicChannelFilter)
            .add_filter(ShortFormFilter)
    }

    /// Add a filter to the pipeline (builder pattern).
    ///
    /// # Arguments
    /// * `filter` - Any type implementing the Filter trait
    ///
    /// # Returns
    /// Self for method chaining
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the filters in evaluation order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Decide on a single video; the first filter that fires wins.
    pub fn classify(&self, video: &Video, context: &FilterContext) -> FilterDecision {
        for filter in &self.filters {
            if let Some(reason) = filter.check(video, context) {
                debug!(
                    "Filter {} hid video {:?}: {}",
                    filter.name(),
                    video.video_id,
                    reason
                );
                return FilterDecision::hide(reason);
            }
        }
        FilterDecision::keep()
    }

    /// Split a batch into kept videos and hidden videos with their
    /// decisions, preserving the input order in both.
    ///
    /// Classification runs in parallel with Rayon.
    pub fn partition(
        &self,
        videos: Vec<Video>,
        context: &FilterContext,
    ) -> (Vec<Video>, Vec<(Video, FilterDecision)>) {
        let input_count = videos.len();
        let decided: Vec<(Video, FilterDecision)> = videos
            .into_par_iter()
            .map(|video| {
                let decision = self.classify(&video, context);
                (video, decision)
            })
            .collect();

        let mut kept = Vec::with_capacity(decided.len());
        let mut hidden = Vec::new();
        for (video, decision) in decided {
            if decision.filtered {
                hidden.push((video, decision));
            } else {
                kept.push(video);
            }
        }

        debug!(
            "Filtered batch (input count: {}, kept: {}, hidden: {})",
            input_count,
            kept.len(),
            hidden.len()
        );
        (kept, hidden)
    }

    /// Keep only the videos no filter objects to.
    pub fn apply(&self, videos: Vec<Video>, context: &FilterContext) -> Vec<Video> {
        self.partition(videos, context).0
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify one video against plain preference values using the standard
/// rule order.
///
/// # Arguments
/// * `video` - The video to check
/// * `banned_words` - Banned terms; empty disables word checks
/// * `banned_channels` - Banned channels; empty disables the channel check
/// * `threshold` - Levenshtein threshold for the fuzzy word pass
/// * `short_form_enabled` - Whether short videos are hidden
/// * `short_form_threshold` - Videos shorter than this many seconds are short
pub fn classify(
    video: &Video,
    banned_words: &[String],
    banned_channels: &[BannedChannel],
    threshold: usize,
    short_form_enabled: bool,
    short_form_threshold: u64,
) -> FilterDecision {
    let preferences = FilterPreferences {
        banned_words: banned_words.to_vec(),
        banned_channels: banned_channels.to_vec(),
        levenshtein_threshold: threshold,
        ban_short_form: short_form_enabled,
        short_form_threshold,
    };
    FilterPipeline::standard().classify(video, &FilterContext::new(&preferences))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::FilterReason;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let context = FilterContext::default();

        let videos = vec![
            Video::new("a", "", "x", "UC1", 10),
            Video::new("b", "", "y", "UC2", 20),
        ];

        let kept = pipeline.apply(videos, &context);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_standard_order() {
        assert_eq!(
            FilterPipeline::standard().filter_names(),
            vec![
                "BannedChannelFilter",
                "BannedWordFilter(title)",
                "BannedWordFilter(description)",
                "BannedWordFilter(author)",
                "TopicChannelFilter",
                "ShortFormFilter",
            ]
        );
    }

    #[test]
    fn test_no_rules_never_filters() {
        let video = Video::new("f***k this", "terrible words", "Loud - Topic", "UC1", 5);
        assert_eq!(classify(&video, &[], &[], 1, false, 60), FilterDecision::keep());
    }

    #[test]
    fn test_channel_ban_wins_over_words() {
        let video = Video::new("spoiler", "", "Chan", "UC1", 300);
        let banned = vec![BannedChannel { id: "UC1".to_string(), name: "Chan".to_string() }];
        let decision = classify(&video, &words(&["spoiler"]), &banned, 1, false, 60);
        assert_eq!(decision, FilterDecision::hide(FilterReason::ChannelBanned));
    }

    #[test]
    fn test_title_before_description() {
        let video = Video::new("spoiler", "also a spoiler", "Chan", "UC1", 300);
        let decision = classify(&video, &words(&["spoiler"]), &[], 1, false, 60);
        assert_eq!(decision.reason, "Contains banned word in title");
    }

    #[test]
    fn test_words_before_short_form() {
        let video = Video::new("fine", "fine", "Spoiler Bot", "UC1", 10);
        let decision = classify(&video, &words(&["spoiler"]), &[], 1, true, 60);
        assert_eq!(decision.reason, "Channel name contains banned word");

        let clean = Video::new("fine", "fine", "Nice Bot", "UC1", 10);
        let decision = classify(&clean, &words(&["spoiler"]), &[], 1, true, 60);
        assert_eq!(decision.reason, "Short form content");
    }

    #[test]
    fn test_partition_preserves_order() {
        let context = FilterContext::new(&FilterPreferences {
            banned_words: words(&["spoiler"]),
            ..FilterPreferences::default()
        });
        let videos = vec![
            Video::new("one", "", "a", "UC1", 100),
            Video::new("spoiler two", "", "a", "UC1", 100),
            Video::new("three", "", "a", "UC1", 100),
            Video::new("four", "spoilers", "a", "UC1", 100),
        ];

        let (kept, hidden) = FilterPipeline::standard().partition(videos, &context);

        let kept_titles: Vec<&str> = kept.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(kept_titles, vec!["one", "three"]);
        assert_eq!(hidden.len(), 2);
        assert_eq!(hidden[0].0.title, "spoiler two");
        assert_eq!(hidden[1].1.reason, "Description contains banned word");
    }
}
