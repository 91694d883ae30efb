use crate::region::{Region, ShapeKind};
use geo_types::{LineString, Polygon};

/// Flattens regions into their area members, in encounter order.
/// Curve and empty regions contribute nothing.
pub fn to_polygons<'a, I>(regions: I) -> impl Iterator<Item = &'a Polygon<f64>>
where
    I: IntoIterator<Item = &'a Region>,
{
    regions.into_iter().flat_map(|region| match region {
        Region::Area(p) => std::slice::from_ref(p).iter(),
        Region::MultiArea(mp) => mp.0.iter(),
        _ => (&[] as &[Polygon<f64>]).iter(),
    })
}

/// Flattens regions into their polyline members, in encounter order.
/// Area and empty regions contribute nothing.
pub fn to_lines<'a, I>(regions: I) -> impl Iterator<Item = &'a LineString<f64>>
where
    I: IntoIterator<Item = &'a Region>,
{
    regions.into_iter().flat_map(|region| match region {
        Region::Curve(ls) => std::slice::from_ref(ls).iter(),
        Region::MultiCurve(mls) => mls.0.iter(),
        _ => (&[] as &[LineString<f64>]).iter(),
    })
}

/// Kind of the first non-empty region.
pub fn first_kind<'a, I>(regions: I) -> Option<ShapeKind>
where
    I: IntoIterator<Item = &'a Region>,
{
    regions
        .into_iter()
        .find(|r| !r.is_empty())
        .and_then(Region::kind)
}
