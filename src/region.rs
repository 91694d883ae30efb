use crate::error::{Result, TilingError};
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, BooleanOps, BoundingRect, EuclideanLength, Line};
use geo_types::{Coord, LineString, MultiLineString, MultiPolygon, Polygon, Rect};
use std::panic::{self, AssertUnwindSafe};

/// The primitive kind a region is made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Area,
    Curve,
}

/// A planar region: closed areas (with holes) or open polylines.
#[derive(Clone, Debug, PartialEq)]
pub enum Region {
    Empty,
    Area(Polygon<f64>),
    MultiArea(MultiPolygon<f64>),
    Curve(LineString<f64>),
    MultiCurve(MultiLineString<f64>),
}

impl Region {
    /// Builds an area region, collapsing 0 and 1 member collections.
    pub fn from_areas(areas: MultiPolygon<f64>) -> Self {
        let mut polygons: Vec<Polygon<f64>> = areas
            .0
            .into_iter()
            .filter(|p| !p.exterior().0.is_empty())
            .collect();

        match polygons.len() {
            0 => Region::Empty,
            1 => Region::Area(polygons.remove(0)),
            _ => Region::MultiArea(MultiPolygon::new(polygons)),
        }
    }

    /// Builds a curve region, dropping polylines without a segment.
    pub fn from_curves(curves: MultiLineString<f64>) -> Self {
        let mut lines: Vec<LineString<f64>> =
            curves.0.into_iter().filter(|ls| ls.0.len() >= 2).collect();

        match lines.len() {
            0 => Region::Empty,
            1 => Region::Curve(lines.remove(0)),
            _ => Region::MultiCurve(MultiLineString::new(lines)),
        }
    }

    pub fn kind(&self) -> Option<ShapeKind> {
        match self {
            Region::Empty => None,
            Region::Area(_) | Region::MultiArea(_) => Some(ShapeKind::Area),
            Region::Curve(_) | Region::MultiCurve(_) => Some(ShapeKind::Curve),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Region::Empty => true,
            Region::Area(p) => p.exterior().0.is_empty(),
            Region::MultiArea(mp) => mp.0.iter().all(|p| p.exterior().0.is_empty()),
            Region::Curve(ls) => ls.0.is_empty(),
            Region::MultiCurve(mls) => mls.0.iter().all(|ls| ls.0.is_empty()),
        }
    }

    /// Unsigned area. Curves have none.
    pub fn area(&self) -> f64 {
        match self {
            Region::Area(p) => p.unsigned_area(),
            Region::MultiArea(mp) => mp.unsigned_area(),
            _ => 0.0,
        }
    }

    /// Total polyline length. Areas report 0.
    pub fn length(&self) -> f64 {
        match self {
            Region::Curve(ls) => ls.euclidean_length(),
            Region::MultiCurve(mls) => mls.euclidean_length(),
            _ => 0.0,
        }
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            Region::Empty => None,
            Region::Area(p) => p.bounding_rect(),
            Region::MultiArea(mp) => mp.bounding_rect(),
            Region::Curve(ls) => ls.bounding_rect(),
            Region::MultiCurve(mls) => mls.bounding_rect(),
        }
    }

    /// Area members as a multi polygon; empty for curve regions.
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        match self {
            Region::Area(p) => MultiPolygon::new(vec![p.clone()]),
            Region::MultiArea(mp) => mp.clone(),
            _ => MultiPolygon::new(vec![]),
        }
    }

    /// Curve members as a multi line string; empty for area regions.
    pub fn to_multi_line_string(&self) -> MultiLineString<f64> {
        match self {
            Region::Curve(ls) => MultiLineString::new(vec![ls.clone()]),
            Region::MultiCurve(mls) => mls.clone(),
            _ => MultiLineString::new(vec![]),
        }
    }

    /// Removes `other` from `self`.
    ///
    /// A curve carries no area, so subtracting one from an area leaves the
    /// area unchanged. A curve minus an area keeps the pieces of the curve
    /// lying outside the area. A curve minus a curve drops the stretches
    /// where the two run along each other; mere crossings cut nothing.
    pub fn difference(&self, other: &Region) -> Region {
        if self.is_empty() {
            return Region::Empty;
        }
        if other.is_empty() {
            return self.clone();
        }

        match (self.kind(), other.kind()) {
            (Some(ShapeKind::Area), Some(ShapeKind::Area)) => {
                Region::from_areas(self.to_multi_polygon().difference(&other.to_multi_polygon()))
            }
            (Some(ShapeKind::Curve), Some(ShapeKind::Area)) => {
                Region::from_curves(other.to_multi_polygon().clip(&self.to_multi_line_string(), true))
            }
            (Some(ShapeKind::Curve), Some(ShapeKind::Curve)) => Region::from_curves(subtract_curves(
                &self.to_multi_line_string(),
                &other.to_multi_line_string(),
            )),
            _ => self.clone(),
        }
    }

    /// True when the bounding boxes of both regions overlap (touching counts).
    pub fn envelopes_intersect(&self, other: &Region) -> bool {
        match (self.bounding_rect(), other.bounding_rect()) {
            (Some(a), Some(b)) => {
                a.min().x <= b.max().x
                    && a.max().x >= b.min().x
                    && a.min().y <= b.max().y
                    && a.max().y >= b.min().y
            }
            _ => false,
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::Empty
    }
}

impl From<Polygon<f64>> for Region {
    fn from(p: Polygon<f64>) -> Self {
        Region::Area(p)
    }
}

impl From<MultiPolygon<f64>> for Region {
    fn from(mp: MultiPolygon<f64>) -> Self {
        Region::MultiArea(mp)
    }
}

impl From<LineString<f64>> for Region {
    fn from(ls: LineString<f64>) -> Self {
        Region::Curve(ls)
    }
}

impl From<MultiLineString<f64>> for Region {
    fn from(mls: MultiLineString<f64>) -> Self {
        Region::MultiCurve(mls)
    }
}

/// Segment parameters below this are treated as zero length.
const PARAM_EPSILON: f64 = 1e-12;

/// The parts of `curves` not covered by a collinear stretch of `cutters`.
///
/// Consecutive surviving pieces are stitched back into one polyline; a
/// removed stretch splits the curve.
fn subtract_curves(curves: &MultiLineString<f64>, cutters: &MultiLineString<f64>) -> MultiLineString<f64> {
    let blades: Vec<Line<f64>> = cutters
        .iter()
        .flat_map(|ls| ls.lines())
        .filter(|l| l.start != l.end)
        .collect();

    let mut kept = Vec::new();
    for curve in curves {
        let mut run: Vec<Coord<f64>> = Vec::new();
        for segment in curve.lines().filter(|l| l.start != l.end) {
            for (a, b) in uncovered(segment, &blades) {
                let from = point_at(segment, a);
                if run.last() != Some(&from) {
                    flush(&mut run, &mut kept);
                    run.push(from);
                }
                run.push(point_at(segment, b));
            }
        }
        flush(&mut run, &mut kept);
    }
    MultiLineString::new(kept)
}

/// Parameter intervals of `segment` (0 at start, 1 at end) that no blade
/// overlaps, in order.
fn uncovered(segment: Line<f64>, blades: &[Line<f64>]) -> Vec<(f64, f64)> {
    let d = segment.delta();
    let len2 = d.x * d.x + d.y * d.y;
    let param = |c: Coord<f64>| ((c.x - segment.start.x) * d.x + (c.y - segment.start.y) * d.y) / len2;

    let mut covered: Vec<(f64, f64)> = blades
        .iter()
        .filter_map(|blade| match line_intersection(segment, *blade) {
            Some(LineIntersection::Collinear { intersection }) => {
                let (a, b) = (param(intersection.start), param(intersection.end));
                Some((a.min(b).clamp(0.0, 1.0), a.max(b).clamp(0.0, 1.0)))
            }
            _ => None,
        })
        .collect();
    covered.sort_by(|x, y| x.0.total_cmp(&y.0));

    let mut pieces = Vec::new();
    let mut cursor = 0.0;
    for (a, b) in covered {
        if a - cursor > PARAM_EPSILON {
            pieces.push((cursor, a));
        }
        cursor = f64::max(cursor, b);
    }
    if 1.0 - cursor > PARAM_EPSILON {
        pieces.push((cursor, 1.0));
    }
    pieces
}

fn point_at(segment: Line<f64>, t: f64) -> Coord<f64> {
    if t <= 0.0 {
        segment.start
    } else if t >= 1.0 {
        segment.end
    } else {
        segment.start + segment.delta() * t
    }
}

fn flush(run: &mut Vec<Coord<f64>>, kept: &mut Vec<LineString<f64>>) {
    if run.len() >= 2 {
        kept.push(LineString::new(std::mem::take(run)));
    } else {
        run.clear();
    }
}

/// Runs a boolean operation for `layer`, turning a panic inside the
/// sweep into an `InvalidTopology` error.
pub(crate) fn guarded<T>(layer: &str, op: impl FnOnce() -> T) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(op)).map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "boolean operation failed".to_string());
        TilingError::topology(layer, reason)
    })
}
