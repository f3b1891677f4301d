//! Content filtering for video feeds.
//!
//! This crate provides:
//! - The banned-word matcher (normalisation, censored forms, fuzzy matching)
//! - Filter trait and one filter per content rule
//! - FilterPipeline for composing filters and classifying batches
//!
//! ## Architecture
//! Decisions are made in stages:
//! 1. Preferences are compiled into a FilterContext once per batch
//! 2. Each filter inspects the video and may return a reason
//! 3. The first reason wins and becomes the FilterDecision
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterContext, FilterPipeline};
//!
//! let context = FilterContext::new(&preferences);
//! let pipeline = FilterPipeline::standard();
//!
//! let decision = pipeline.classify(&video, &context);
//! let kept = pipeline.apply(videos, &context);
//! ```

pub mod censor;
pub mod decision;
pub mod filter_pipeline;
pub mod filters;
pub mod levenshtein;
pub mod matcher;
pub mod normalize;
pub mod traits;

// Re-export main types
pub use censor::is_censored_version;
pub use decision::{FilterContext, FilterDecision, FilterReason};
pub use filter_pipeline::{classify, FilterPipeline};
pub use levenshtein::levenshtein_distance;
pub use matcher::{contains_banned_word, BannedWordMatcher};
pub use traits::Filter;
