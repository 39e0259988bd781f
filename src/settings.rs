//! Field options
//!
//! Small construction-time configuration for a bubble field. Missing keys in
//! JSON fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_DENSITY, DEFAULT_HIGHLIGHT_CYCLE_PERIOD};
use crate::error::{BubbleError, BubbleResult};

/// Options for [`crate::sim::Field`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    /// Population the field keeps topped up
    pub target_count: usize,
    /// Scales the max bubble radius; larger means more of the surface is bubble
    pub density: f64,
    /// Frames between highlight flips once a bubble shows a gleam
    pub highlight_cycle_period: u32,
    /// RNG seed; a random seed is drawn when absent
    pub seed: Option<u64>,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            target_count: 0,
            density: DEFAULT_DENSITY,
            highlight_cycle_period: DEFAULT_HIGHLIGHT_CYCLE_PERIOD,
            seed: None,
        }
    }
}

impl FieldOptions {
    pub fn with_target_count(mut self, target_count: usize) -> Self {
        self.target_count = target_count;
        self
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse options from JSON, e.g. `{"target_count": 20}`
    pub fn from_json(json: &str) -> BubbleResult<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> BubbleResult<()> {
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(BubbleError::InvalidOptions {
                name: "density",
                value: self.density,
                expected: "(0, ∞)",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = FieldOptions::default();
        assert_eq!(options.target_count, 0);
        assert_eq!(options.density, 0.64);
        assert_eq!(options.highlight_cycle_period, 10);
        assert!(options.seed.is_none());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let options = FieldOptions::from_json(r#"{"target_count": 20, "seed": 7}"#).unwrap();
        assert_eq!(options.target_count, 20);
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.density, 0.64);
    }

    #[test]
    fn test_from_json_rejects_bad_density() {
        let err = FieldOptions::from_json(r#"{"density": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            BubbleError::InvalidOptions {
                name: "density",
                ..
            }
        ));
    }

    #[test]
    fn test_from_json_syntax_error() {
        assert!(matches!(
            FieldOptions::from_json("{target_count"),
            Err(BubbleError::Config(_))
        ));
    }

    #[test]
    fn test_builders() {
        let options = FieldOptions::default()
            .with_target_count(3)
            .with_density(1.5)
            .with_seed(42);
        assert_eq!(
            (options.target_count, options.density, options.seed),
            (3, 1.5, Some(42))
        );
    }
}
