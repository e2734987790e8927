//! Convex hull aggregator: per-bucket point collection and hull building.
//!
//! The aggregator does not drive itself. An external bucketing driver
//!
//! 1. opens a [`LeafCollector`] per segment and feeds it `(doc, bucket)` pairs
//!    through [`BucketCollector::collect`], then
//! 2. asks for results with [`BucketBuilder::build`], any number of times, in
//!    any order, including for buckets that never received a document.
//!
//! Whether the geo field is mapped is decided once, at construction. An
//! unmapped aggregator hands out no-op collectors and answers every build with
//! the empty result, without consulting its store.

use crate::config::ConvexHullConfig;
use crate::error::Result;
use crate::hull::{convex_hull, HullGeometry};
use crate::point_store::{BucketOrd, BucketedPointStore};
use crate::source::{DocId, GeoPointSource, GeoPointValues, SegmentId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Collector capability: route a document's values into a bucket.
pub trait BucketCollector {
    fn collect(&mut self, doc: DocId, bucket: BucketOrd) -> Result<()>;
}

/// Builder capability: produce the result for a bucket.
pub trait BucketBuilder {
    type Output;

    /// Result for `bucket`. Never fails; unknown buckets build empty.
    fn build(&self, bucket: BucketOrd) -> Self::Output;

    /// Result used when there is nothing to report.
    fn build_empty(&self) -> Self::Output;
}

/// Convex hull of one bucket, tagged with the aggregation name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvexHullResult {
    pub name: String,
    /// `None` when the bucket has no points or the field is unmapped.
    pub geometry: Option<HullGeometry>,
}

impl ConvexHullResult {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            geometry: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_none()
    }
}

/// Per-execution convex hull aggregator.
///
/// Owns the point store for one segment-parallel execution. Not shared
/// between threads; create one per execution slice and merge upstream.
pub struct ConvexHullAggregator {
    name: String,
    source: Option<Arc<dyn GeoPointSource>>,
    store: BucketedPointStore,
}

impl std::fmt::Debug for ConvexHullAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConvexHullAggregator")
            .field("name", &self.name)
            .field("mapped", &self.is_mapped())
            .field("capacity", &self.store.capacity())
            .finish()
    }
}

impl ConvexHullAggregator {
    /// Create an aggregator over a mapped geo point field.
    pub fn new(config: &ConvexHullConfig, source: Arc<dyn GeoPointSource>) -> Result<Self> {
        config.validate()?;
        let store = BucketedPointStore::with_capacity(config.initial_capacity)?;
        tracing::debug!(
            name = %config.name,
            field = ?config.field,
            initial_capacity = config.initial_capacity,
            "Created convex hull aggregator"
        );
        Ok(Self {
            name: config.name.clone(),
            source: Some(source),
            store,
        })
    }

    /// Create an aggregator for a field that is not mapped in this context.
    ///
    /// Every build returns the empty result.
    pub fn unmapped(config: &ConvexHullConfig) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            name = %config.name,
            field = ?config.field,
            "Created unmapped convex hull aggregator"
        );
        Ok(Self {
            name: config.name.clone(),
            source: None,
            store: BucketedPointStore::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a value source is attached.
    pub fn is_mapped(&self) -> bool {
        self.source.is_some()
    }

    /// Read access to the collected points.
    pub fn store(&self) -> &BucketedPointStore {
        &self.store
    }

    /// Open a collector for one segment.
    ///
    /// The collector borrows the aggregator mutably, so builds and other
    /// segments wait until it is dropped.
    pub fn leaf_collector(&mut self, segment: SegmentId) -> LeafCollector<'_> {
        match self.source.as_deref() {
            Some(source) => LeafCollector::Points {
                values: source.segment_values(segment),
                store: &mut self.store,
            },
            None => {
                tracing::trace!(name = %self.name, segment, "Unmapped field, no-op collector");
                LeafCollector::NoOp
            }
        }
    }

    /// Release all collected points. Results built earlier are unaffected.
    pub fn release(&mut self) {
        let stats = self.store.stats();
        self.store.release();
        tracing::debug!(
            name = %self.name,
            allocated_slots = stats.allocated_slots,
            populated_buckets = stats.populated_buckets,
            total_points = stats.total_points,
            "Released convex hull aggregator"
        );
    }
}

impl BucketBuilder for ConvexHullAggregator {
    type Output = ConvexHullResult;

    fn build(&self, bucket: BucketOrd) -> ConvexHullResult {
        if self.source.is_none() {
            return self.build_empty();
        }
        let Some(points) = self.store.get(bucket) else {
            return self.build_empty();
        };

        let _span =
            tracing::debug_span!("convex_hull_build", bucket, points = points.len()).entered();
        ConvexHullResult {
            name: self.name.clone(),
            geometry: convex_hull(points),
        }
    }

    fn build_empty(&self) -> ConvexHullResult {
        ConvexHullResult::empty(self.name.clone())
    }
}

/// Collector for one segment.
pub enum LeafCollector<'a> {
    /// Field unmapped: documents are ignored.
    NoOp,
    /// Reads each document's values and adds them to its bucket.
    Points {
        values: Box<dyn GeoPointValues + 'a>,
        store: &'a mut BucketedPointStore,
    },
}

impl BucketCollector for LeafCollector<'_> {
    fn collect(&mut self, doc: DocId, bucket: BucketOrd) -> Result<()> {
        match self {
            LeafCollector::NoOp => Ok(()),
            LeafCollector::Points { values, store } => {
                if !values.advance_exact(doc) {
                    return Ok(());
                }
                store.collect_all(bucket, values.doc_values().iter().copied())
            }
        }
    }
}
