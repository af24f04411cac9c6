// src/config.rs

//! Run and learning configuration.

use crate::core::constants::qstm_constants::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_LEARNING_RATE, DEFAULT_NORM_TOLERANCE,
    DEFAULT_ORACLE_TOLERANCE, DEFAULT_PATTERN_WINDOW, DEFAULT_ZERO_MASS_TOLERANCE,
};
use crate::core::{AutomatonError, Label};

/// Settings for the run controller, shared by every machine variant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MachineConfig {
    /// Label of the single candidate every run starts with.
    pub start_label: Label,
    /// Allowed deviation of the branch set's mass from 1 after normalization.
    pub norm_tolerance: f64,
    /// Allowed deviation of an oracle row's mass from 1.
    pub oracle_tolerance: f64,
    /// Mass at or below which a candidate counts as annihilated.
    pub zero_mass_tolerance: f64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            start_label: Label::start(),
            norm_tolerance: DEFAULT_NORM_TOLERANCE,
            oracle_tolerance: DEFAULT_ORACLE_TOLERANCE,
            zero_mass_tolerance: DEFAULT_ZERO_MASS_TOLERANCE,
        }
    }
}

impl MachineConfig {
    pub fn with_start_label(mut self, label: impl Into<Label>) -> Self {
        self.start_label = label.into();
        self
    }

    pub fn with_norm_tolerance(mut self, tolerance: f64) -> Self {
        self.norm_tolerance = tolerance;
        self
    }

    pub fn with_oracle_tolerance(mut self, tolerance: f64) -> Self {
        self.oracle_tolerance = tolerance;
        self
    }

    pub fn with_zero_mass_tolerance(mut self, tolerance: f64) -> Self {
        self.zero_mass_tolerance = tolerance;
        self
    }

    /// Checks that every tolerance is positive and the start label is not terminal.
    pub fn validate(&self) -> Result<(), AutomatonError> {
        check_positive("norm_tolerance", self.norm_tolerance)?;
        check_positive("oracle_tolerance", self.oracle_tolerance)?;
        check_positive("zero_mass_tolerance", self.zero_mass_tolerance)?;
        if self.start_label.is_terminal() {
            return Err(AutomatonError::InvalidConfiguration {
                message: format!("start label '{}' must not be a terminal label", self.start_label),
            });
        }
        Ok(())
    }
}

/// Whether blended transition weights carry over from one step to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlendPolicy {
    /// Each blended row becomes the prior for the next query of the same
    /// `(symbol, label)` pair, so weights drift steadily toward observed
    /// frequencies.
    #[default]
    Persistent,
    /// Every query blends the oracle's fresh proposal; nothing is kept.
    Stateless,
}

/// Settings for the adaptive estimator of the statistical machine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdaptiveConfig {
    /// Learning rate α in `(1 - α) * prior + α * observed`.
    pub learning_rate: f64,
    /// Length of the trailing history window used for confidence.
    pub pattern_window: usize,
    /// Confidence at or above which a verdict is reported as confident.
    pub confidence_threshold: f64,
    pub blend_policy: BlendPolicy,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            pattern_window: DEFAULT_PATTERN_WINDOW,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            blend_policy: BlendPolicy::default(),
        }
    }
}

impl AdaptiveConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_pattern_window(mut self, window: usize) -> Self {
        self.pattern_window = window;
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_blend_policy(mut self, policy: BlendPolicy) -> Self {
        self.blend_policy = policy;
        self
    }

    /// Checks that α and the confidence threshold lie in `[0, 1]` and the window is non-empty.
    pub fn validate(&self) -> Result<(), AutomatonError> {
        check_unit_interval("learning_rate", self.learning_rate)?;
        check_unit_interval("confidence_threshold", self.confidence_threshold)?;
        if self.pattern_window == 0 {
            return Err(AutomatonError::InvalidConfiguration {
                message: "pattern_window must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn check_positive(name: &str, value: f64) -> Result<(), AutomatonError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AutomatonError::InvalidConfiguration {
            message: format!("{} must be a positive finite number, got {}", name, value),
        })
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<(), AutomatonError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(AutomatonError::InvalidConfiguration {
            message: format!("{} must lie in [0, 1], got {}", name, value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(MachineConfig::default().validate().is_ok());
        assert!(AdaptiveConfig::default().validate().is_ok());
        assert_eq!(AdaptiveConfig::default().learning_rate, 0.1);
        assert_eq!(AdaptiveConfig::default().blend_policy, BlendPolicy::Persistent);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let bad_rate = AdaptiveConfig::default().with_learning_rate(1.5);
        assert!(matches!(bad_rate.validate(), Err(AutomatonError::InvalidConfiguration { .. })));

        let bad_rate = AdaptiveConfig::default().with_learning_rate(f64::NAN);
        assert!(bad_rate.validate().is_err());

        let no_window = AdaptiveConfig::default().with_pattern_window(0);
        assert!(no_window.validate().is_err());

        let bad_tol = MachineConfig::default().with_norm_tolerance(0.0);
        assert!(bad_tol.validate().is_err());

        let terminal_start = MachineConfig::default().with_start_label(Label::accept());
        assert!(terminal_start.validate().is_err());
    }
}
