pub mod classify;
pub mod config;
pub mod error;
pub mod fusion;
pub mod io;
pub mod layout;
pub mod region;
pub mod rounding;
pub mod stack;
pub mod tiling;
pub mod utils;
pub mod validation;
pub mod wasm;


pub use config::{FusionConfig, Precedence, UndefinedLayers};
pub use error::{Result, TilingError};
pub use fusion::fuse;
pub use layout::{FlatLayout, LayerSelector, Layout};
pub use region::{Region, ShapeKind};
pub use stack::{process_stack, FusedLayerMap, LayerLevel, LayerStack};
pub use tiling::{tile, GeometryTiler, TiledLayerMap};
