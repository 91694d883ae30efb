use geo_types::LineString;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A GDS layer/datatype pair identifying raw polygons on a layout.
///
/// Serialized as `[layer, datatype]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(u16, u16)", into = "(u16, u16)")]
pub struct LayerSelector {
    pub layer: u16,
    pub datatype: u16,
}

impl LayerSelector {
    pub fn new(layer: u16, datatype: u16) -> Self {
        Self { layer, datatype }
    }
}

impl From<(u16, u16)> for LayerSelector {
    fn from((layer, datatype): (u16, u16)) -> Self {
        Self { layer, datatype }
    }
}

impl From<LayerSelector> for (u16, u16) {
    fn from(sel: LayerSelector) -> Self {
        (sel.layer, sel.datatype)
    }
}

impl std::fmt::Display for LayerSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.layer, self.datatype)
    }
}

/// Read-only access to a source layout.
pub trait Layout: Sync {
    type Extracted: Layout;

    /// The part of the layout drawn on `selector`.
    fn extract(&self, selector: &LayerSelector) -> Self::Extracted;

    /// Every raw polygon ring in this layout.
    fn polygons(&self) -> Vec<LineString<f64>>;

    /// Whether the layout's layer table knows `selector`, drawn on or not.
    fn defines(&self, selector: &LayerSelector) -> bool;
}

/// In-memory layout: raw rings grouped by selector, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct FlatLayout {
    layers: IndexMap<LayerSelector, Vec<LineString<f64>>>,
}

impl FlatLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a layer without drawing on it.
    pub fn declare_layer(&mut self, selector: LayerSelector) {
        self.layers.entry(selector).or_default();
    }

    pub fn add_polygon(&mut self, selector: LayerSelector, ring: impl Into<LineString<f64>>) {
        self.layers.entry(selector).or_default().push(ring.into());
    }

    pub fn with_polygon(mut self, selector: LayerSelector, ring: impl Into<LineString<f64>>) -> Self {
        self.add_polygon(selector, ring);
        self
    }

    pub fn selectors(&self) -> impl Iterator<Item = &LayerSelector> {
        self.layers.keys()
    }

    pub fn polygon_count(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }
}

impl Layout for FlatLayout {
    type Extracted = FlatLayout;

    fn extract(&self, selector: &LayerSelector) -> FlatLayout {
        let mut layers = IndexMap::new();
        if let Some(rings) = self.layers.get(selector) {
            layers.insert(*selector, rings.clone());
        }
        FlatLayout { layers }
    }

    fn polygons(&self) -> Vec<LineString<f64>> {
        self.layers.values().flatten().cloned().collect()
    }

    fn defines(&self, selector: &LayerSelector) -> bool {
        self.layers.contains_key(selector)
    }
}
