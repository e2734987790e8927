//! Bucket-indexed storage of deduplicated points.
//!
//! The store is a sparse arena: one slot per bucket ordinal, each slot either
//! absent (nothing collected yet) or holding the distinct coordinates seen for
//! that bucket. Slots are created by growth and start absent; a point set is
//! only allocated on the first write into its bucket.
//!
//! The store is not synchronized. Every mutation takes `&mut self`, so the
//! single-writer contract of the aggregation driver is checked at compile
//! time, and borrowed point sets cannot outlive a later growth.

use crate::coord::GeoCoord;
use crate::error::{HullError, Result};
use rustc_hash::FxHashSet;

/// Bucket ordinal assigned by the aggregation driver.
pub type BucketOrd = u64;

/// Distinct coordinates collected for one bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointSet {
    points: FxHashSet<GeoCoord>,
}

impl PointSet {
    fn new() -> Self {
        Self::default()
    }

    /// Insert a coordinate. Returns `false` if an identical one was present.
    fn insert(&mut self, coord: GeoCoord) -> bool {
        self.points.insert(coord)
    }

    /// Number of distinct coordinates.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, coord: &GeoCoord) -> bool {
        self.points.contains(coord)
    }

    /// Iterate the coordinates in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &GeoCoord> + '_ {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a GeoCoord;
    type IntoIter = std::collections::hash_set::Iter<'a, GeoCoord>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Store occupancy, reported when the store is released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Addressable bucket slots.
    pub allocated_slots: usize,
    /// Buckets holding at least one point.
    pub populated_buckets: usize,
    /// Distinct points summed over all buckets.
    pub total_points: usize,
}

/// Sparse, growable mapping from bucket ordinal to [`PointSet`].
#[derive(Debug, Default)]
pub struct BucketedPointStore {
    slots: Vec<Option<PointSet>>,
}

impl BucketedPointStore {
    /// Create an empty store with no addressable slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with `capacity` addressable (absent) slots.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut store = Self::new();
        store.ensure_capacity(capacity)?;
        Ok(store)
    }

    /// Number of addressable bucket slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Make ordinals `0..min_size` addressable.
    ///
    /// Grows to at least double the current size. On allocation failure the
    /// store is unchanged.
    pub fn ensure_capacity(&mut self, min_size: usize) -> Result<()> {
        let current = self.slots.len();
        if min_size <= current {
            return Ok(());
        }
        let target = min_size.max(current.saturating_mul(2));
        self.slots.try_reserve_exact(target - current)?;
        self.slots.resize_with(target, || None);
        Ok(())
    }

    /// Add one coordinate to `bucket`, growing the store if needed.
    pub fn collect(&mut self, bucket: BucketOrd, coord: GeoCoord) -> Result<()> {
        self.point_set_mut(bucket)?.insert(coord);
        Ok(())
    }

    /// Add every coordinate of one document to `bucket`.
    ///
    /// A document without values leaves the bucket untouched, so an absent
    /// bucket stays absent.
    pub fn collect_all<I>(&mut self, bucket: BucketOrd, coords: I) -> Result<()>
    where
        I: IntoIterator<Item = GeoCoord>,
    {
        let mut coords = coords.into_iter().peekable();
        if coords.peek().is_none() {
            return Ok(());
        }
        let set = self.point_set_mut(bucket)?;
        for coord in coords {
            set.insert(coord);
        }
        Ok(())
    }

    /// Points collected for `bucket`, or `None` if out of range or never
    /// collected into.
    pub fn get(&self, bucket: BucketOrd) -> Option<&PointSet> {
        let idx = usize::try_from(bucket).ok()?;
        self.slots.get(idx)?.as_ref()
    }

    /// Release all backing storage. Safe to call repeatedly.
    pub fn release(&mut self) {
        self.slots = Vec::new();
    }

    pub fn stats(&self) -> StoreStats {
        let (populated_buckets, total_points) = self
            .slots
            .iter()
            .flatten()
            .fold((0, 0), |(buckets, points), set| (buckets + 1, points + set.len()));
        StoreStats {
            allocated_slots: self.slots.len(),
            populated_buckets,
            total_points,
        }
    }

    fn point_set_mut(&mut self, bucket: BucketOrd) -> Result<&mut PointSet> {
        let idx = usize::try_from(bucket).map_err(|_| HullError::BucketOutOfRange(bucket))?;
        let min_size = idx
            .checked_add(1)
            .ok_or(HullError::BucketOutOfRange(bucket))?;
        self.ensure_capacity(min_size)?;
        Ok(self.slots[idx].get_or_insert_with(PointSet::new))
    }
}
