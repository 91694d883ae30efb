use crate::error::{Result, TilingError};

/// Decimal digits beyond which `f64` rounding stops being meaningful.
pub const MAX_PRECISION: u32 = 15;

/// Rounding and simplification settings for one fusion run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FusionConfig {
    /// Number of decimal digits coordinates are rounded to.
    pub precision: u32,
    /// Distance tolerance for topology-preserving simplification.
    /// Zero disables simplification.
    pub simplify_tolerance: f64,
    /// What a stack run does with a selector the layout never declared.
    pub undefined_layers: UndefinedLayers,
}

impl Default for FusionConfig {
    /// Mask-level settings: 5 digits, 1e-5 tolerance.
    fn default() -> Self {
        Self {
            precision: 5,
            simplify_tolerance: 1e-5,
            undefined_layers: UndefinedLayers::Reject,
        }
    }
}

impl FusionConfig {
    /// Coarser settings used when preparing a whole stack for meshing.
    pub fn meshing() -> Self {
        Self {
            precision: 2,
            simplify_tolerance: 1e-2,
            undefined_layers: UndefinedLayers::Reject,
        }
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_simplify_tolerance(mut self, tolerance: f64) -> Self {
        self.simplify_tolerance = tolerance;
        self
    }

    pub fn with_undefined_layers(mut self, policy: UndefinedLayers) -> Self {
        self.undefined_layers = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            return Err(TilingError::Configuration(format!(
                "precision {} exceeds {} digits",
                self.precision, MAX_PRECISION
            )));
        }
        if !self.simplify_tolerance.is_finite() || self.simplify_tolerance < 0.0 {
            return Err(TilingError::Configuration(format!(
                "simplify tolerance must be finite and non-negative, got {}",
                self.simplify_tolerance
            )));
        }
        Ok(())
    }
}

/// Which end of the stack wins where layers overlap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Precedence {
    /// Earlier stack entries sit on top.
    #[default]
    FirstWins,
    /// Later stack entries sit on top.
    LastWins,
}

/// Handling of stack levels whose selector the layout does not declare.
///
/// Layouts read from interchange files only declare the layers they draw,
/// so a full process stack run against a small component hits this often.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UndefinedLayers {
    /// Fail the run with a configuration error before any fusion.
    #[default]
    Reject,
    /// Log a warning and fuse the level to an empty region.
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(FusionConfig::default().precision, 5);
        assert_eq!(FusionConfig::meshing().precision, 2);
        assert!((FusionConfig::meshing().simplify_tolerance - 1e-2).abs() < f64::EPSILON);
        assert_eq!(FusionConfig::default().undefined_layers, UndefinedLayers::Reject);
        assert_eq!(
            FusionConfig::meshing()
                .with_undefined_layers(UndefinedLayers::Empty)
                .undefined_layers,
            UndefinedLayers::Empty
        );
    }

    #[test]
    fn test_validate() {
        assert!(FusionConfig::default().validate().is_ok());
        assert!(FusionConfig::default().with_precision(16).validate().is_err());
        assert!(FusionConfig::default().with_simplify_tolerance(-1.0).validate().is_err());
        assert!(FusionConfig::default().with_simplify_tolerance(f64::NAN).validate().is_err());
        assert!(FusionConfig::default().with_simplify_tolerance(0.0).validate().is_ok());
    }
}
