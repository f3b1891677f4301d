//! Error types for the catalog crate.
//!
//! Every fallible operation on stores, preferences and provider payloads
//! returns a [`CatalogError`]. Callers higher up the stack wrap these in
//! `anyhow` with extra context.

use thiserror::Error;

/// Errors that can occur while reading or writing catalog data
#[derive(Error, Debug)]
pub enum CatalogError {
    /// I/O error while touching the backing file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A stored or fetched payload was not valid JSON for the expected shape
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A stored value could not be interpreted
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    /// The store itself is unusable (poisoned lock, corrupt file, ...)
    #[error("Store error: {0}")]
    StoreError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
