//! Error types for convex hull aggregation.

use std::collections::TryReserveError;
use thiserror::Error;

/// Convex hull aggregation errors.
#[derive(Error, Debug)]
pub enum HullError {
    /// Bucket storage could not be grown. The store is left as it was.
    #[error("Bucket storage allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// Bucket ordinal cannot be addressed on this platform.
    #[error("Bucket ordinal out of range: {0}")]
    BucketOutOfRange(u64),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for convex hull aggregation.
pub type Result<T> = std::result::Result<T, HullError>;
