use crate::config::FusionConfig;
use crate::error::{Result, TilingError};
use crate::layout::{LayerSelector, Layout};
use crate::region::{guarded, Region};
use crate::rounding::round_polygon;
use crate::utils::parallel::reduce_pairwise;
use crate::utils::z_order_index;
use crate::validation::area_defect;
use geo::{Area, BooleanOps, BoundingRect, SimplifyVwPreserve};
use geo_types::{LineString, MultiPolygon, Polygon};
use std::cmp::Ordering;

/// Merges every polygon drawn on `selector` into one region.
///
/// Raw rings are rounded to `config.precision` digits; rings that collapse,
/// have no area or cross themselves are skipped with a warning. The rest
/// are unioned and simplified without changing topology. A layer with
/// nothing drawn on it fuses to `Region::Empty`.
pub fn fuse<L: Layout>(
    layout: &L,
    layer_name: &str,
    selector: &LayerSelector,
    config: &FusionConfig,
) -> Result<Region> {
    config.validate()?;

    let rings = layout.extract(selector).polygons();
    let total = rings.len();

    let mut polygons: Vec<Polygon<f64>> = rings
        .iter()
        .enumerate()
        .filter_map(|(i, ring)| match prepare_polygon(ring, config.precision) {
            Ok(p) => Some(p),
            Err(e) => {
                log::warn!("layer '{}' ({}): skipping polygon #{}: {}", layer_name, selector, i, e);
                None
            }
        })
        .collect();

    log::debug!(
        "layer '{}' ({}): fusing {} of {} polygons",
        layer_name,
        selector,
        polygons.len(),
        total
    );

    if polygons.is_empty() {
        return Ok(Region::Empty);
    }

    // Input order must not leak into the union
    polygons.sort_by(canonical_order);

    let merged = union_all(layer_name, polygons)?;
    let simplified = if config.simplify_tolerance > 0.0 {
        let threshold = config.simplify_tolerance * config.simplify_tolerance;
        guarded(layer_name, || merged.simplify_vw_preserve(&threshold))?
    } else {
        merged
    };

    if let Some(defect) = area_defect(&simplified) {
        return Err(TilingError::topology(layer_name, format!("fused region: {}", defect)));
    }

    Ok(Region::from_areas(simplified))
}

/// Rounds one raw ring into a polygon fit for the union.
pub(crate) fn prepare_polygon(ring: &LineString<f64>, precision: u32) -> Result<Polygon<f64>> {
    let polygon = round_polygon(&Polygon::new(ring.clone(), vec![]), precision)?;

    let area = polygon.unsigned_area();
    if area <= 0.0 {
        return Err(TilingError::DegenerateGeometry(format!(
            "polygon has non-positive area {}",
            area
        )));
    }
    Ok(polygon)
}

/// Cascaded union of non-empty polygons.
fn union_all(layer_name: &str, polygons: Vec<Polygon<f64>>) -> Result<MultiPolygon<f64>> {
    let parts: Vec<MultiPolygon<f64>> = polygons
        .into_iter()
        .map(|p| MultiPolygon::new(vec![p]))
        .collect();

    let merged = guarded(layer_name, || reduce_pairwise(parts, |a, b| a.union(&b)))?;
    Ok(merged.unwrap_or_else(|| MultiPolygon::new(vec![])))
}

fn canonical_order(a: &Polygon<f64>, b: &Polygon<f64>) -> Ordering {
    let key = |p: &Polygon<f64>| {
        p.bounding_rect()
            .map(|r| (z_order_index(r.min()), r.max().x, r.max().y))
            .unwrap_or((u64::MAX, f64::MAX, f64::MAX))
    };
    let (za, xa, ya) = key(a);
    let (zb, xb, yb) = key(b);

    za.cmp(&zb)
        .then_with(|| xa.partial_cmp(&xb).unwrap_or(Ordering::Equal))
        .then_with(|| ya.partial_cmp(&yb).unwrap_or(Ordering::Equal))
        .then_with(|| {
            a.unsigned_area()
                .partial_cmp(&b.unsigned_area())
                .unwrap_or(Ordering::Equal)
        })
}
