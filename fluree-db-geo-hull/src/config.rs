//! Convex hull aggregation configuration.

use crate::error::{HullError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a convex hull aggregation.
///
/// One config is shared by every segment-level aggregator of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvexHullConfig {
    /// Aggregation name, echoed in every result (including empty ones).
    pub name: String,

    /// Geo point field the values come from. `None` when the field is not
    /// mapped in the queried context.
    #[serde(default)]
    pub field: Option<String>,

    /// Number of bucket slots allocated up front.
    /// Default: 10
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
}

fn default_initial_capacity() -> usize {
    ConvexHullConfig::DEFAULT_INITIAL_CAPACITY
}

impl ConvexHullConfig {
    /// Default number of pre-allocated bucket slots.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 10;

    /// Create a config with the given aggregation name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: None,
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
        }
    }

    /// Set the geo point field name.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the number of pre-allocated bucket slots.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Check the config before building an aggregator from it.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(HullError::Config(
                "aggregation name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
