use crate::config::{FusionConfig, UndefinedLayers};
use crate::error::{Result, TilingError};
use crate::fusion::fuse;
use crate::layout::{LayerSelector, Layout};
use crate::region::Region;
use crate::utils::parallel::map_ordered;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Fused region per layer name, in stack order.
pub type FusedLayerMap = IndexMap<String, Region>;

/// One physical layer of the stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerLevel {
    pub name: String,
    /// Raw layout layer this level is drawn on. `None` for levels without
    /// mask geometry (substrate, cladding defined only by thickness).
    #[serde(default)]
    pub layer: Option<LayerSelector>,
    #[serde(default)]
    pub thickness: f64,
    #[serde(default)]
    pub zmin: f64,
    #[serde(default)]
    pub material: Option<String>,
    /// Meshing priority; lower values win overlaps.
    #[serde(default)]
    pub mesh_order: Option<i32>,
}

impl LayerLevel {
    pub fn new(name: &str, layer: Option<LayerSelector>) -> Self {
        Self {
            name: name.to_string(),
            layer,
            thickness: 0.0,
            zmin: 0.0,
            material: None,
            mesh_order: None,
        }
    }

    pub fn with_z(mut self, zmin: f64, thickness: f64) -> Self {
        self.zmin = zmin;
        self.thickness = thickness;
        self
    }

    pub fn with_material(mut self, material: &str) -> Self {
        self.material = Some(material.to_string());
        self
    }

    pub fn with_mesh_order(mut self, order: i32) -> Self {
        self.mesh_order = Some(order);
        self
    }

    pub fn z_bounds(&self) -> (f64, f64) {
        (self.zmin, self.zmin + self.thickness)
    }
}

/// An ordered list of layer levels. Order is priority: see [`LayerStack::ordered`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerStack {
    pub levels: Vec<LayerLevel>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LayerLevel) -> Self {
        self.levels.push(level);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TilingError::Configuration(format!("cannot parse layer stack: {}", e)))
    }

    pub fn get(&self, name: &str) -> Option<&LayerLevel> {
        self.levels.iter().find(|l| l.name == name)
    }

    pub fn z_bounds(&self, name: &str) -> Option<(f64, f64)> {
        self.get(name).map(LayerLevel::z_bounds)
    }

    /// Sorted, deduplicated z coordinates of every level boundary.
    pub fn unique_z_values(&self) -> Vec<f64> {
        let mut zs: Vec<f64> = self
            .levels
            .iter()
            .flat_map(|l| {
                let (lo, hi) = l.z_bounds();
                [lo, hi]
            })
            .filter(|z| z.is_finite())
            .collect();
        zs.sort_by(f64::total_cmp);
        zs.dedup();
        zs
    }

    /// Levels that carry geometry, in priority order.
    ///
    /// Without mesh orders this is list order. With mesh orders, levels are
    /// sorted by ascending `mesh_order`; every geometric level must then
    /// carry a distinct one.
    pub fn ordered(&self) -> Result<Vec<&LayerLevel>> {
        let mut names = IndexSet::new();
        for level in &self.levels {
            if level.name.trim().is_empty() {
                return Err(TilingError::Configuration("layer level with empty name".to_string()));
            }
            if !names.insert(level.name.as_str()) {
                return Err(TilingError::Configuration(format!(
                    "layer '{}' appears more than once",
                    level.name
                )));
            }
        }

        let mut geometric: Vec<&LayerLevel> =
            self.levels.iter().filter(|l| l.layer.is_some()).collect();

        let with_order = geometric.iter().filter(|l| l.mesh_order.is_some()).count();
        if with_order == 0 {
            return Ok(geometric);
        }
        if with_order != geometric.len() {
            return Err(TilingError::Configuration(
                "stack is not a strict total order: mesh_order set on only some layers".to_string(),
            ));
        }

        geometric.sort_by_key(|l| l.mesh_order);
        if let Some(pair) = geometric.windows(2).find(|w| w[0].mesh_order == w[1].mesh_order) {
            return Err(TilingError::Configuration(format!(
                "stack is not a strict total order: '{}' and '{}' share mesh_order {:?}",
                pair[0].name, pair[1].name, pair[0].mesh_order
            )));
        }
        Ok(geometric)
    }
}

/// Fuses every geometric level of `stack` into a [`FusedLayerMap`].
///
/// Levels without a selector are omitted. The stack and config are checked
/// before any fusion starts; an undeclared selector is rejected or fused to
/// `Empty` per [`FusionConfig::undefined_layers`]. Layers are fused independently, in parallel
/// with the `parallel` feature; the map keeps stack order.
pub fn process_stack<L: Layout>(
    layout: &L,
    stack: &LayerStack,
    config: &FusionConfig,
) -> Result<FusedLayerMap> {
    config.validate()?;
    let levels = stack.ordered()?;

    let mut jobs: Vec<(&str, LayerSelector)> = Vec::with_capacity(levels.len());
    for level in levels {
        if let Some(selector) = level.layer {
            if !layout.defines(&selector) {
                match config.undefined_layers {
                    UndefinedLayers::Reject => {
                        return Err(TilingError::Configuration(format!(
                            "layer '{}' selects {} which the layout does not define",
                            level.name, selector
                        )));
                    }
                    // Extracting an undeclared selector yields nothing, so
                    // the level fuses to an empty region
                    UndefinedLayers::Empty => log::warn!(
                        "layer '{}' selects {} which the layout does not define; it will be empty",
                        level.name,
                        selector
                    ),
                }
            }
            jobs.push((level.name.as_str(), selector));
        }
    }

    log::info!("fusing {} layers", jobs.len());

    let fused = map_ordered(&jobs, |(name, selector)| {
        fuse(layout, name, selector, config).map(|region| (name.to_string(), region))
    });

    fused.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let json = r#"{
            "levels": [
                {"name": "core", "layer": [1, 0], "thickness": 0.22, "zmin": 0.0, "material": "si"},
                {"name": "box", "thickness": 3.0, "zmin": -3.0, "material": "sio2"},
                {"name": "slab90", "layer": [3, 0], "thickness": 0.09, "zmin": 0.0}
            ]
        }"#;

        let stack = LayerStack::from_json(json).unwrap();
        assert_eq!(stack.levels.len(), 3);
        assert_eq!(stack.levels[0].layer, Some(LayerSelector::new(1, 0)));
        assert_eq!(stack.levels[1].layer, None);
        assert_eq!(stack.get("core").and_then(|l| l.material.as_deref()), Some("si"));

        let names: Vec<&str> = stack.ordered().unwrap().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["core", "slab90"]);
    }

    #[test]
    fn test_bad_json_is_configuration_error() {
        assert!(matches!(
            LayerStack::from_json("{\"levels\": 3}"),
            Err(TilingError::Configuration(_))
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let stack = LayerStack::new()
            .with_level(LayerLevel::new("core", Some(LayerSelector::new(1, 0))))
            .with_level(LayerLevel::new("core", Some(LayerSelector::new(2, 0))));
        assert!(stack.ordered().is_err());
    }

    #[test]
    fn test_mesh_order_must_be_total() {
        let partial = LayerStack::new()
            .with_level(LayerLevel::new("a", Some(LayerSelector::new(1, 0))).with_mesh_order(1))
            .with_level(LayerLevel::new("b", Some(LayerSelector::new(2, 0))));
        assert!(partial.ordered().is_err());

        let tied = LayerStack::new()
            .with_level(LayerLevel::new("a", Some(LayerSelector::new(1, 0))).with_mesh_order(1))
            .with_level(LayerLevel::new("b", Some(LayerSelector::new(2, 0))).with_mesh_order(1));
        assert!(tied.ordered().is_err());

        // Levels without geometry never take part in the order
        let ok = LayerStack::new()
            .with_level(LayerLevel::new("a", Some(LayerSelector::new(1, 0))).with_mesh_order(2))
            .with_level(LayerLevel::new("box", None))
            .with_level(LayerLevel::new("b", Some(LayerSelector::new(2, 0))).with_mesh_order(1));
        let names: Vec<&str> = ok.ordered().unwrap().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_z_queries() {
        let stack = LayerStack::new()
            .with_level(LayerLevel::new("core", Some(LayerSelector::new(1, 0))).with_z(0.0, 0.22))
            .with_level(LayerLevel::new("box", None).with_z(-3.0, 3.0))
            .with_level(LayerLevel::new("clad", None).with_z(0.0, 3.0).with_material("sio2"));

        assert_eq!(stack.z_bounds("core"), Some((0.0, 0.22)));
        assert_eq!(stack.z_bounds("missing"), None);
        assert_eq!(stack.unique_z_values(), vec![-3.0, 0.0, 0.22, 3.0]);
    }
}
