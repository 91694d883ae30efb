use crate::error::{Result, TilingError};
use crate::region::Region;
use crate::validation::ring_defect;
use geo_types::{Coord, LineString, MultiLineString, MultiPolygon, Polygon};

/// Rounds a single coordinate to `precision` decimal digits.
///
/// Values that round to zero come out as `+0.0`; the boolean sweep does not
/// treat `-0.0` and `0.0` on the same line as one coordinate.
#[inline]
pub fn round_coord(c: Coord<f64>, precision: u32) -> Coord<f64> {
    let factor = 10f64.powi(precision as i32);
    Coord {
        x: (c.x * factor).round() / factor + 0.0,
        y: (c.y * factor).round() / factor + 0.0,
    }
}

/// Rounds a closed ring, dropping vertices that collapse onto their
/// predecessor. Fails if fewer than 3 distinct points survive.
pub fn round_ring(ring: &LineString<f64>, precision: u32) -> Result<LineString<f64>> {
    let mut coords: Vec<Coord<f64>> = ring.0.iter().map(|c| round_coord(*c, precision)).collect();
    coords.dedup();

    // Closing point may now equal the point before it, or be missing entirely
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }

    if coords.len() < 3 {
        return Err(TilingError::DegenerateGeometry(format!(
            "ring collapsed to {} distinct point(s) at precision {}",
            coords.len(),
            precision
        )));
    }

    coords.push(coords[0]);
    Ok(LineString::new(coords))
}

/// Rounds a polygon's exterior and holes.
///
/// A hole that collapses is smaller than the rounding grid and is dropped;
/// a collapsing exterior is an error. Snapping can push a vertex across a
/// nearby edge, so every kept ring is checked again and a ring that now
/// crosses itself is a [`TilingError::DegenerateGeometry`].
pub fn round_polygon(polygon: &Polygon<f64>, precision: u32) -> Result<Polygon<f64>> {
    let exterior = checked(round_ring(polygon.exterior(), precision)?, precision)?;

    let mut interiors = Vec::with_capacity(polygon.interiors().len());
    for hole in polygon.interiors() {
        match round_ring(hole, precision) {
            Ok(ring) => interiors.push(checked(ring, precision)?),
            Err(e) => log::debug!("dropping hole: {}", e),
        }
    }

    Ok(Polygon::new(exterior, interiors))
}

fn checked(ring: LineString<f64>, precision: u32) -> Result<LineString<f64>> {
    match ring_defect(&ring) {
        None => Ok(ring),
        Some(defect) => Err(TilingError::DegenerateGeometry(format!(
            "{} after rounding to {} digits",
            defect, precision
        ))),
    }
}

/// Rounds an open polyline; it must keep at least 2 distinct points.
pub fn round_curve(curve: &LineString<f64>, precision: u32) -> Result<LineString<f64>> {
    let mut coords: Vec<Coord<f64>> = curve.0.iter().map(|c| round_coord(*c, precision)).collect();
    coords.dedup();

    if coords.len() < 2 {
        return Err(TilingError::DegenerateGeometry(format!(
            "curve collapsed to a point at precision {}",
            precision
        )));
    }
    Ok(LineString::new(coords))
}

/// Rounds every member of a region.
///
/// Area members come back free of self-crossings (see [`round_polygon`]);
/// curves may still cross each other.
pub fn round_region(region: &Region, precision: u32) -> Result<Region> {
    Ok(match region {
        Region::Empty => Region::Empty,
        Region::Area(p) => Region::Area(round_polygon(p, precision)?),
        Region::MultiArea(mp) => Region::MultiArea(MultiPolygon::new(
            mp.0.iter()
                .map(|p| round_polygon(p, precision))
                .collect::<Result<Vec<_>>>()?,
        )),
        Region::Curve(ls) => Region::Curve(round_curve(ls, precision)?),
        Region::MultiCurve(mls) => Region::MultiCurve(MultiLineString::new(
            mls.0
                .iter()
                .map(|ls| round_curve(ls, precision))
                .collect::<Result<Vec<_>>>()?,
        )),
    })
}
