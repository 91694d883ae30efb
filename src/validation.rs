use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::Line;
use geo_types::{Coord, LineString, MultiLineString, MultiPolygon};
use rstar::{RTree, RTreeObject, AABB};

// Wrapper for Line to be indexable by rstar
#[derive(Clone, Copy, Debug)]
struct IndexedLine {
    line: Line<f64>,
    index: usize,
}

impl RTreeObject for IndexedLine {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let p1 = self.line.start;
        let p2 = self.line.end;
        AABB::from_corners(
            [p1.x.min(p2.x), p1.y.min(p2.y)],
            [p1.x.max(p2.x), p1.y.max(p2.y)],
        )
    }
}

const OVERLAP_TOL: f64 = 1e-12;

fn is_finite(c: &Coord<f64>) -> bool {
    c.x.is_finite() && c.y.is_finite()
}

/// Describes the first topological defect of a closed ring, if any.
///
/// Rings may touch themselves at a vertex; proper crossings and collinear
/// overlaps of positive length are defects.
pub fn ring_defect(ring: &LineString<f64>) -> Option<String> {
    if let Some(c) = ring.0.iter().find(|c| !is_finite(c)) {
        return Some(format!("non-finite coordinate ({}, {})", c.x, c.y));
    }
    if !ring.is_closed() {
        return Some("ring is not closed".to_string());
    }

    let segments: Vec<IndexedLine> = ring
        .lines()
        .enumerate()
        .filter(|(_, line)| line.start != line.end)
        .map(|(index, line)| IndexedLine { line, index })
        .collect();
    let last = ring.0.len().saturating_sub(2);

    let tree = RTree::bulk_load(segments);

    for (a, b) in tree.intersection_candidates_with_other_tree(&tree) {
        if a.index >= b.index {
            continue;
        }
        let adjacent = b.index == a.index + 1 || (a.index == 0 && b.index == last);

        let Some(hit) = line_intersection(a.line, b.line) else {
            continue;
        };

        match hit {
            LineIntersection::SinglePoint { intersection, is_proper } => {
                if is_proper && !adjacent {
                    return Some(format!(
                        "self-intersection at ({}, {})",
                        intersection.x, intersection.y
                    ));
                }
            }
            LineIntersection::Collinear { intersection } => {
                let dx = intersection.end.x - intersection.start.x;
                let dy = intersection.end.y - intersection.start.y;
                if dx * dx + dy * dy > OVERLAP_TOL * OVERLAP_TOL {
                    return Some(format!(
                        "overlapping edges near ({}, {})",
                        intersection.start.x, intersection.start.y
                    ));
                }
            }
        }
    }

    None
}

/// Checks every ring of every polygon.
pub fn area_defect(areas: &MultiPolygon<f64>) -> Option<String> {
    areas.0.iter().find_map(|polygon| {
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .find_map(ring_defect)
    })
}

/// Polylines may cross themselves; only coordinates are checked.
pub fn curve_defect(curves: &MultiLineString<f64>) -> Option<String> {
    curves
        .0
        .iter()
        .flat_map(|ls| ls.0.iter())
        .find(|c| !is_finite(c))
        .map(|c| format!("non-finite coordinate ({}, {})", c.x, c.y))
}
