use thiserror::Error;

#[derive(Error, Debug)]
pub enum TilingError {
    /// A ring collapsed below 3 distinct points, or a polygon has no area.
    /// Recovered locally by dropping the shape.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Invalid topology on layer '{layer}': {reason}")]
    InvalidTopology { layer: String, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl TilingError {
    pub(crate) fn topology(layer: &str, reason: impl Into<String>) -> Self {
        TilingError::InvalidTopology {
            layer: layer.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TilingError>;
