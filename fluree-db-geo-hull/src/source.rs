//! Geo point value sources.
//!
//! The aggregator never extracts coordinates itself. It asks a
//! [`GeoPointSource`] for a per-segment cursor ([`GeoPointValues`]) and reads
//! the values of each collected document through it. An unmapped field is not
//! a source at all: the aggregator is built without one.
//!
//! [`InMemoryGeoPoints`] is a map-backed source for embedded use and tests.

use crate::coord::GeoCoord;
use rustc_hash::FxHashMap;

/// Document id within a segment.
pub type DocId = u32;

/// Segment id within a searched index.
pub type SegmentId = u32;

/// Cursor over the geo point values of one segment.
pub trait GeoPointValues {
    /// Position the cursor on `doc`. Returns `false` if the document has no
    /// values, in which case [`doc_values`](Self::doc_values) is empty.
    fn advance_exact(&mut self, doc: DocId) -> bool;

    /// Values of the document the cursor is positioned on.
    fn doc_values(&self) -> &[GeoCoord];
}

/// Provider of geo point values for a mapped field.
///
/// Shared by the aggregators of every segment, hence `Send + Sync`.
pub trait GeoPointSource: Send + Sync {
    /// Open a value cursor for `segment`.
    fn segment_values(&self, segment: SegmentId) -> Box<dyn GeoPointValues + '_>;
}

/// In-memory geo point values keyed by segment and document.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGeoPoints {
    segments: FxHashMap<SegmentId, FxHashMap<DocId, Vec<GeoCoord>>>,
}

impl InMemoryGeoPoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to a document. Documents may carry several values.
    pub fn add(&mut self, segment: SegmentId, doc: DocId, coord: GeoCoord) {
        self.segments
            .entry(segment)
            .or_default()
            .entry(doc)
            .or_default()
            .push(coord);
    }

    /// Builder form of [`add`](Self::add) for a whole document.
    pub fn with_doc(
        mut self,
        segment: SegmentId,
        doc: DocId,
        coords: impl IntoIterator<Item = GeoCoord>,
    ) -> Self {
        for coord in coords {
            self.add(segment, doc, coord);
        }
        self
    }
}

impl GeoPointSource for InMemoryGeoPoints {
    fn segment_values(&self, segment: SegmentId) -> Box<dyn GeoPointValues + '_> {
        Box::new(InMemorySegmentValues {
            docs: self.segments.get(&segment),
            current: &[],
        })
    }
}

struct InMemorySegmentValues<'a> {
    docs: Option<&'a FxHashMap<DocId, Vec<GeoCoord>>>,
    current: &'a [GeoCoord],
}

impl GeoPointValues for InMemorySegmentValues<'_> {
    fn advance_exact(&mut self, doc: DocId) -> bool {
        self.current = self
            .docs
            .and_then(|docs| docs.get(&doc))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        !self.current.is_empty()
    }

    fn doc_values(&self) -> &[GeoCoord] {
        self.current
    }
}
