use wasm_bindgen::prelude::*;
use crate::config::FusionConfig;
use crate::io::tiles_to_geojson;
use crate::layout::FlatLayout;
use crate::stack::{process_stack, LayerStack};
use crate::tiling::tile;

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Fuses and tiles a GeoJSON layout against a JSON layer stack using the
/// meshing defaults. Returns the tiles as a GeoJSON FeatureCollection.
#[wasm_bindgen]
pub fn tile_layout(layout_geojson: &str, stack_json: &str) -> Result<String, JsValue> {
    let to_js = |e: crate::error::TilingError| JsValue::from_str(&e.to_string());

    let layout = FlatLayout::from_geojson(layout_geojson).map_err(to_js)?;
    let stack = LayerStack::from_json(stack_json).map_err(to_js)?;

    let fused = process_stack(&layout, &stack, &FusionConfig::meshing()).map_err(to_js)?;
    let tiles = tile(&fused).map_err(to_js)?;

    Ok(tiles_to_geojson(&tiles))
}
