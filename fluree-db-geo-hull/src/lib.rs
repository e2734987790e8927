//! Per-bucket convex hull aggregation over geographic points.
//!
//! For every bucket produced by an upstream grouping stage, this crate
//! collects the distinct geo points of the bucket's documents and reduces
//! them to their convex hull on demand.
//!
//! # Architecture
//!
//! ```text
//!   bucketing driver
//!        │ collect(doc, bucket)                 build(bucket)
//!        ▼                                           │
//!   LeafCollector ──► GeoPointValues (per segment)   │
//!        │                                           ▼
//!        ▼                                  ConvexHullAggregator
//!   BucketedPointStore ◄──────── get(bucket) ────────┤
//!   [Option<PointSet>; n]                            ▼
//!                                            convex_hull (geo crate)
//!                                                    │
//!                                                    ▼
//!                                            ConvexHullResult
//! ```
//!
//! Buckets are sparse and grow on demand. A bucket that never received a
//! point builds the empty result, as does every bucket of an aggregator whose
//! geo field is unmapped.
//!
//! # Modules
//!
//! - [`config`]: Aggregation configuration
//! - [`coord`]: Coordinates with exact-match identity
//! - [`point_store`]: Bucket-indexed deduplicated point sets
//! - [`hull`]: Convex hull reduction and degenerate-case policy
//! - [`source`]: Geo point value source traits
//! - [`aggregator`]: Collector/builder lifecycle
//! - [`error`]: Error types

pub mod aggregator;
pub mod config;
pub mod coord;
pub mod error;
pub mod hull;
pub mod point_store;
pub mod source;

pub use aggregator::{
    BucketBuilder, BucketCollector, ConvexHullAggregator, ConvexHullResult, LeafCollector,
};
pub use config::ConvexHullConfig;
pub use coord::GeoCoord;
pub use error::{HullError, Result};
pub use hull::{convex_hull, HullGeometry};
pub use point_store::{BucketOrd, BucketedPointStore, PointSet, StoreStats};
pub use source::{DocId, GeoPointSource, GeoPointValues, InMemoryGeoPoints, SegmentId};
