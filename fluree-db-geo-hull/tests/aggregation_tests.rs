//! Integration tests for the convex hull aggregator.
//!
//! These tests play the role of the bucketing driver: they open leaf
//! collectors per segment, route documents to buckets, and build results.

use fluree_db_geo_hull::{
    BucketBuilder, BucketCollector, ConvexHullAggregator, ConvexHullConfig, ConvexHullResult,
    GeoCoord, HullGeometry, InMemoryGeoPoints,
};
use std::sync::Arc;

fn c(lon: f64, lat: f64) -> GeoCoord {
    GeoCoord::new(lon, lat)
}

fn config() -> ConvexHullConfig {
    ConvexHullConfig::new("store_footprint").with_field("location")
}

/// Drive `(segment, doc, bucket)` assignments through the aggregator in order.
fn run(agg: &mut ConvexHullAggregator, assignments: &[(u32, u32, u64)]) {
    let mut segments: Vec<u32> = assignments.iter().map(|(s, _, _)| *s).collect();
    segments.dedup();
    for segment in segments {
        let mut leaf = agg.leaf_collector(segment);
        for (_, doc, bucket) in assignments.iter().filter(|(s, _, _)| *s == segment) {
            leaf.collect(*doc, *bucket).unwrap();
        }
    }
}

fn square_with_center() -> Vec<GeoCoord> {
    vec![
        c(0.0, 0.0),
        c(0.0, 1.0),
        c(1.0, 0.0),
        c(1.0, 1.0),
        c(0.5, 0.5),
    ]
}

#[test]
fn test_square_with_center_across_documents() {
    let mut source = InMemoryGeoPoints::new();
    for (doc, point) in square_with_center().into_iter().enumerate() {
        source.add(0, doc as u32, point);
    }
    let mut agg = ConvexHullAggregator::new(&config(), Arc::new(source)).unwrap();
    run(&mut agg, &[(0, 0, 0), (0, 1, 0), (0, 2, 0), (0, 3, 0), (0, 4, 0)]);

    let result = agg.build(0);
    assert_eq!(result.name, "store_footprint");
    assert_eq!(
        result.geometry,
        Some(HullGeometry::Polygon(vec![
            c(0.0, 0.0),
            c(1.0, 0.0),
            c(1.0, 1.0),
            c(0.0, 1.0),
            c(0.0, 0.0),
        ]))
    );
}

#[test]
fn test_multi_valued_document_feeds_one_bucket() {
    let source = InMemoryGeoPoints::new().with_doc(0, 0, [c(0.0, 0.0), c(1.0, 1.0), c(2.0, 2.0)]);
    let mut agg = ConvexHullAggregator::new(&config(), Arc::new(source)).unwrap();
    run(&mut agg, &[(0, 0, 6)]);

    assert_eq!(agg.store().get(6).unwrap().len(), 3);
    assert_eq!(
        agg.build(6).geometry,
        Some(HullGeometry::Line(c(0.0, 0.0), c(2.0, 2.0)))
    );
}

#[test]
fn test_sparse_buckets_beyond_initial_capacity() {
    let source = InMemoryGeoPoints::new()
        .with_doc(0, 0, [c(10.0, 10.0)])
        .with_doc(0, 1, [c(-5.0, 2.0)])
        .with_doc(0, 2, [c(3.0, 3.0)]);
    let config = config().with_initial_capacity(2);
    let mut agg = ConvexHullAggregator::new(&config, Arc::new(source)).unwrap();

    // Out of order, far past the initial two slots.
    run(&mut agg, &[(0, 0, 1_000), (0, 1, 3), (0, 2, 1_000)]);

    assert!(agg.store().capacity() >= 1_001);
    assert_eq!(
        agg.build(3).geometry,
        Some(HullGeometry::Point(c(-5.0, 2.0)))
    );
    assert_eq!(
        agg.build(1_000).geometry,
        Some(HullGeometry::Line(c(3.0, 3.0), c(10.0, 10.0)))
    );
    for bucket in [0, 2, 4, 999, 1_001, 1_000_000] {
        assert!(agg.build(bucket).is_empty(), "bucket {bucket} should be empty");
    }
}

#[test]
fn test_segments_accumulate_into_shared_buckets() {
    let source = InMemoryGeoPoints::new()
        .with_doc(0, 0, [c(0.0, 0.0)])
        .with_doc(0, 1, [c(4.0, 0.0)])
        .with_doc(1, 0, [c(0.0, 4.0)])
        .with_doc(1, 1, [c(0.0, 0.0)]);
    let mut agg = ConvexHullAggregator::new(&config(), Arc::new(source)).unwrap();
    run(&mut agg, &[(0, 0, 0), (0, 1, 0), (1, 0, 0), (1, 1, 0)]);

    assert_eq!(agg.store().get(0).unwrap().len(), 3);
    assert_eq!(
        agg.build(0).geometry,
        Some(HullGeometry::Polygon(vec![
            c(0.0, 0.0),
            c(4.0, 0.0),
            c(0.0, 4.0),
            c(0.0, 0.0),
        ]))
    );
}

#[test]
fn test_repeated_builds_are_identical() {
    let source = InMemoryGeoPoints::new()
        .with_doc(0, 0, [c(1.0, 5.0), c(-2.0, 1.0)])
        .with_doc(0, 1, [c(3.0, -1.0), c(1.0, 5.0)]);
    let mut agg = ConvexHullAggregator::new(&config(), Arc::new(source)).unwrap();
    run(&mut agg, &[(0, 0, 2), (0, 1, 2)]);

    let first = agg.build(2);
    assert!(!first.is_empty());
    assert_eq!(agg.build(2), first);
    assert_eq!(agg.build(2), first);
}

#[test]
fn test_build_interleaved_with_collection() {
    let source = InMemoryGeoPoints::new()
        .with_doc(0, 0, [c(1.0, 1.0)])
        .with_doc(0, 1, [c(2.0, 2.0)]);
    let mut agg = ConvexHullAggregator::new(&config(), Arc::new(source)).unwrap();

    assert!(agg.build(0).is_empty());
    run(&mut agg, &[(0, 0, 0)]);
    assert_eq!(agg.build(0).geometry, Some(HullGeometry::Point(c(1.0, 1.0))));
    run(&mut agg, &[(0, 1, 0)]);
    assert_eq!(
        agg.build(0).geometry,
        Some(HullGeometry::Line(c(1.0, 1.0), c(2.0, 2.0)))
    );
}

#[test]
fn test_hull_independent_of_collection_order() {
    let points = vec![
        c(-122.42, 37.77),
        c(-122.27, 37.80),
        c(-122.08, 37.39),
        c(-121.89, 37.34),
        c(-122.14, 37.44),
        c(-122.42, 37.77),
    ];
    let mut source = InMemoryGeoPoints::new();
    for (doc, point) in points.iter().enumerate() {
        source.add(0, doc as u32, *point);
    }
    let source = Arc::new(source);

    let forward: Vec<(u32, u32, u64)> = (0..points.len() as u32).map(|d| (0, d, 0)).collect();
    let backward: Vec<(u32, u32, u64)> = forward.iter().rev().copied().collect();

    let mut a = ConvexHullAggregator::new(&config(), source.clone()).unwrap();
    let mut b = ConvexHullAggregator::new(&config(), source).unwrap();
    run(&mut a, &forward);
    run(&mut b, &backward);

    let hull = a.build(0);
    assert!(matches!(hull.geometry, Some(HullGeometry::Polygon(_))));
    assert_eq!(hull, b.build(0));
}

#[test]
fn test_unmapped_context_builds_empty_everywhere() {
    let mut agg = ConvexHullAggregator::unmapped(&config()).unwrap();
    run(&mut agg, &[(0, 0, 0), (0, 1, 5)]);

    let expected = ConvexHullResult::empty("store_footprint");
    for bucket in [0, 5, 42] {
        assert_eq!(agg.build(bucket), expected);
    }
    assert_eq!(agg.build_empty(), expected);
    assert_eq!(agg.store().stats().allocated_slots, 0);
}

#[test]
fn test_result_serializes_with_name() {
    let source = InMemoryGeoPoints::new().with_doc(0, 0, [c(2.0, 3.0)]);
    let mut agg = ConvexHullAggregator::new(&config(), Arc::new(source)).unwrap();
    run(&mut agg, &[(0, 0, 0)]);

    let json = serde_json::to_value(agg.build(0)).unwrap();
    assert_eq!(json["name"], "store_footprint");
    assert_eq!(json["geometry"]["type"], "Point");
    assert_eq!(json["geometry"]["coordinates"]["lon"], 2.0);

    let empty = serde_json::to_value(agg.build(9)).unwrap();
    assert!(empty["geometry"].is_null());
}
