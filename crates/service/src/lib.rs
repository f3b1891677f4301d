//! Service crate for the privtube feed engine.
//!
//! This crate contains the orchestrator that ties the preference store,
//! the filter pipeline and the subscription feed together.

pub mod orchestrator;

pub use orchestrator::FeedOrchestrator;
