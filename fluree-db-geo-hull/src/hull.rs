//! Convex hull reduction of a bucket's point set.
//!
//! The hull numerics come from the `geo` crate (`ConvexHull` on a
//! `MultiPoint`, QuickHull). This module owns the policy around it:
//!
//! - degenerate inputs collapse to a point or a line instead of a polygon
//! - polygon rings are counter-clockwise (x = lon, y = lat), closed, and free
//!   of collinear vertices
//! - every output starts at the canonical vertex: lowest latitude, then
//!   lowest longitude
//!
//! The canonical start makes the result depend only on the set of input
//! coordinates, never on the order they were collected in.
//!
//! Non-finite coordinates are skipped. They are kept in the point store
//! untouched; they just never reach the hull routine.

use crate::coord::GeoCoord;
use geo::algorithm::kernels::{Kernel, Orientation};
use geo::{ConvexHull, GeoNum, Winding};
use geo_types::{Coord, Geometry, LineString, MultiPoint, Point, Polygon};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Geometry produced for one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum HullGeometry {
    /// A single distinct point.
    Point(GeoCoord),
    /// Two distinct points, or the extremes of a collinear set.
    Line(GeoCoord, GeoCoord),
    /// Closed counter-clockwise ring; the first vertex is repeated last.
    Polygon(Vec<GeoCoord>),
}

impl HullGeometry {
    /// Convert to a `geo-types` geometry for downstream consumers.
    pub fn to_geometry(&self) -> Geometry<f64> {
        match self {
            HullGeometry::Point(c) => Geometry::Point(Point::from(Coord::from(*c))),
            HullGeometry::Line(a, b) => {
                Geometry::LineString(LineString::new(vec![(*a).into(), (*b).into()]))
            }
            HullGeometry::Polygon(ring) => Geometry::Polygon(Polygon::new(
                ring.iter().map(|c| Coord::from(*c)).collect(),
                vec![],
            )),
        }
    }

    /// Distinct vertices of the geometry (the ring closure is not counted).
    pub fn vertex_count(&self) -> usize {
        match self {
            HullGeometry::Point(_) => 1,
            HullGeometry::Line(..) => 2,
            HullGeometry::Polygon(ring) => ring.len().saturating_sub(1),
        }
    }
}

/// Compute the convex hull of a set of coordinates.
///
/// Returns `None` when no finite coordinate is supplied. Duplicates in the
/// input are tolerated.
pub fn convex_hull<'a, I>(points: I) -> Option<HullGeometry>
where
    I: IntoIterator<Item = &'a GeoCoord>,
{
    let mut coords: Vec<Coord<f64>> = points
        .into_iter()
        .filter(|c| c.is_finite())
        // `+ 0.0` folds -0.0 into 0.0 so equal locations sort adjacent.
        .map(|c| Coord {
            x: c.lon + 0.0,
            y: c.lat + 0.0,
        })
        .collect();
    coords.sort_unstable_by(canonical_cmp);
    coords.dedup();

    match coords.len() {
        0 => None,
        1 => Some(HullGeometry::Point(coords[0].into())),
        2 => Some(line(coords[0], coords[1])),
        n => {
            // Sorted, so these are the extremes if the set is collinear.
            let (first, last) = (coords[0], coords[n - 1]);
            if coords.iter().all(|c| is_collinear(first, last, *c)) {
                return Some(line(first, last));
            }
            let hull = MultiPoint::from(coords).convex_hull();
            let polygon = canonical_polygon(hull.exterior().clone());
            Some(polygon.unwrap_or_else(|| line(first, last)))
        }
    }
}

/// Order by latitude, then longitude. Callers only pass finite values.
fn canonical_cmp(a: &Coord<f64>, b: &Coord<f64>) -> Ordering {
    a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
}

/// Robust orientation test. Offsets below roughly `1e-150` degrees underflow
/// in the determinant and read as collinear; real coordinates never get
/// close to that floor.
fn is_collinear(p: Coord<f64>, q: Coord<f64>, r: Coord<f64>) -> bool {
    <f64 as GeoNum>::Ker::orient2d(p, q, r) == Orientation::Collinear
}

fn line(a: Coord<f64>, b: Coord<f64>) -> HullGeometry {
    if canonical_cmp(&a, &b) == Ordering::Greater {
        HullGeometry::Line(b.into(), a.into())
    } else {
        HullGeometry::Line(a.into(), b.into())
    }
}

/// Normalize a hull ring: CCW, no collinear vertices, canonical start, closed.
///
/// Returns `None` if fewer than three vertices survive.
fn canonical_polygon(mut exterior: LineString<f64>) -> Option<HullGeometry> {
    exterior.make_ccw_winding();

    let mut ring = exterior.0;
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring.dedup();

    let n = ring.len();
    let ring: Vec<Coord<f64>> = (0..n)
        .filter(|&i| !is_collinear(ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]))
        .map(|i| ring[i])
        .collect();
    if ring.len() < 3 {
        return None;
    }

    let start = ring
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| canonical_cmp(a, b))
        .map(|(i, _)| i)?;

    let mut out: Vec<GeoCoord> = Vec::with_capacity(ring.len() + 1);
    out.extend(
        ring[start..]
            .iter()
            .chain(&ring[..start])
            .map(|c| GeoCoord::from(*c)),
    );
    out.push(out[0]);
    Some(HullGeometry::Polygon(out))
}
