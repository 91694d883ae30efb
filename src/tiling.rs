use crate::classify::{to_lines, to_polygons};
use crate::config::Precedence;
use crate::error::{Result, TilingError};
use crate::region::{guarded, Region, ShapeKind};
use crate::stack::FusedLayerMap;
use crate::validation::{area_defect, curve_defect};
use geo_types::{MultiLineString, MultiPolygon};
use indexmap::IndexMap;
use std::ops::Range;

/// Disjoint region per layer name, in stack order. Every value is a
/// `Region::MultiArea` or, for curve-typed stacks, a `Region::MultiCurve`.
pub type TiledLayerMap = IndexMap<String, Region>;

/// Resolves overlaps between fused layers so that each point of the plane
/// belongs to at most one layer.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeometryTiler {
    precedence: Precedence,
}

impl GeometryTiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Indices of the layers that sit above layer `i`.
    fn above(&self, i: usize, n: usize) -> Range<usize> {
        match self.precedence {
            Precedence::FirstWins => 0..i,
            Precedence::LastWins => (i + 1)..n,
        }
    }

    /// Indices from the bottom of the stack to the top.
    fn bottom_up(&self, n: usize) -> Vec<usize> {
        match self.precedence {
            Precedence::FirstWins => (0..n).rev().collect(),
            Precedence::LastWins => (0..n).collect(),
        }
    }

    pub fn tile(&self, fused: &FusedLayerMap) -> Result<TiledLayerMap> {
        let layers: Vec<(&String, &Region)> = fused.iter().collect();
        let n = layers.len();

        let mut tiles: Vec<Region> = vec![Region::Empty; n];
        let mut run_kind: Option<ShapeKind> = None;

        for i in self.bottom_up(n) {
            let (name, region) = layers[i];
            let mut tile = region.clone();

            for j in self.above(i, n) {
                if tile.is_empty() {
                    break;
                }
                let upper = layers[j].1;
                if !tile.envelopes_intersect(upper) {
                    continue;
                }
                tile = guarded(name, || tile.difference(upper))?;
            }

            if !tile.is_empty() {
                match (run_kind, tile.kind()) {
                    (None, kind) => run_kind = kind,
                    (Some(expected), Some(kind)) if expected != kind => {
                        return Err(TilingError::topology(
                            name,
                            format!("{:?} tile in a {:?}-typed stack", kind, expected),
                        ));
                    }
                    _ => {}
                }
            }

            log::debug!("tiled layer '{}': area {:.6}", name, tile.area());
            tiles[i] = tile;
        }

        let kind = run_kind.unwrap_or(ShapeKind::Area);
        let mut out = TiledLayerMap::with_capacity(n);

        for ((name, _), tile) in layers.into_iter().zip(tiles) {
            let packed = match kind {
                ShapeKind::Area => {
                    let areas = MultiPolygon::new(to_polygons([&tile]).cloned().collect());
                    if let Some(defect) = area_defect(&areas) {
                        return Err(TilingError::topology(name, format!("tile: {}", defect)));
                    }
                    Region::MultiArea(areas)
                }
                ShapeKind::Curve => {
                    let curves = MultiLineString::new(to_lines([&tile]).cloned().collect());
                    if let Some(defect) = curve_defect(&curves) {
                        return Err(TilingError::topology(name, format!("tile: {}", defect)));
                    }
                    Region::MultiCurve(curves)
                }
            };
            out.insert(name.clone(), packed);
        }

        Ok(out)
    }
}

/// Tiles with the default precedence: earlier stack entries win.
pub fn tile(fused: &FusedLayerMap) -> Result<TiledLayerMap> {
    GeometryTiler::new().tile(fused)
}

#[cfg(test)]
#[path = "tiling_tests.rs"]
mod tests;
