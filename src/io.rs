//! GeoJSON interchange for layouts and tiled layer maps.

use crate::error::{Result, TilingError};
use crate::layout::{FlatLayout, LayerSelector};
use crate::region::Region;
use crate::tiling::TiledLayerMap;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use geo_types::Geometry as GeoGeometry;
use std::str::FromStr;

fn selector_of(feature: &Feature) -> Result<LayerSelector> {
    let number = |key: &str| -> Result<Option<u16>> {
        match feature.property(key) {
            None => Ok(None),
            Some(v) => v
                .as_u64()
                .and_then(|n| u16::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| {
                    TilingError::InvalidInput(format!("property '{}' is not a layer number: {}", key, v))
                }),
        }
    };

    let layer = number("layer")?
        .ok_or_else(|| TilingError::InvalidInput("feature without a 'layer' property".to_string()))?;
    let datatype = number("datatype")?.unwrap_or(0);
    Ok(LayerSelector::new(layer, datatype))
}

fn add_geometry(layout: &mut FlatLayout, selector: LayerSelector, geometry: GeoGeometry<f64>) {
    match geometry {
        GeoGeometry::Polygon(poly) => {
            if !poly.interiors().is_empty() {
                log::warn!("{}: ignoring {} hole(s) of a raw polygon", selector, poly.interiors().len());
            }
            let (exterior, _) = poly.into_inner();
            layout.add_polygon(selector, exterior);
        }
        GeoGeometry::MultiPolygon(mpoly) => {
            for poly in mpoly {
                add_geometry(layout, selector, GeoGeometry::Polygon(poly));
            }
        }
        GeoGeometry::GeometryCollection(gc) => {
            for g in gc {
                add_geometry(layout, selector, g);
            }
        }
        other => {
            log::warn!("{}: ignoring non-polygonal geometry {:?}", selector, other);
        }
    }
}

impl FlatLayout {
    /// Reads a GeoJSON FeatureCollection (or single Feature) whose features
    /// carry integer `layer` and optional `datatype` properties.
    ///
    /// Every selector seen is declared, even when its geometry is null.
    pub fn from_geojson(input: &str) -> Result<Self> {
        let geojson = GeoJson::from_str(input)
            .map_err(|e| TilingError::InvalidInput(format!("failed to parse GeoJSON: {}", e)))?;

        let features = match geojson {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(_) => {
                return Err(TilingError::InvalidInput(
                    "bare geometry has no layer; wrap it in a Feature".to_string(),
                ))
            }
        };

        let mut layout = FlatLayout::new();
        for feature in features {
            let selector = selector_of(&feature)?;
            layout.declare_layer(selector);

            if let Some(geometry) = feature.geometry {
                let geo_geom = GeoGeometry::<f64>::try_from(geometry)
                    .map_err(|e| TilingError::InvalidInput(format!("bad geometry: {}", e)))?;
                add_geometry(&mut layout, selector, geo_geom);
            }
        }

        Ok(layout)
    }
}

fn region_value(region: &Region) -> Option<Value> {
    match region {
        Region::Empty => None,
        Region::Area(p) => Some(Value::from(p)),
        Region::MultiArea(mp) => Some(Value::from(mp)),
        Region::Curve(ls) => Some(Value::from(ls)),
        Region::MultiCurve(mls) => Some(Value::from(mls)),
    }
}

/// One feature per layer, in map order, with the layer name under `layer`.
pub fn tiles_to_geojson(tiles: &TiledLayerMap) -> String {
    let features: Vec<Feature> = tiles
        .iter()
        .map(|(name, region)| {
            let mut feature = Feature {
                bbox: None,
                geometry: region_value(region).map(Geometry::new),
                id: None,
                properties: None,
                foreign_members: None,
            };
            feature.set_property("layer", name.clone());
            feature.set_property("area", region.area());
            feature
        })
        .collect();

    let fc = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    fc.to_string()
}
