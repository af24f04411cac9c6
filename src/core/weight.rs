// src/core/weight.rs

//! Candidate weights and their mapping to probability mass.
//!
//! The evolution engine, normalizer and measurement are identical for the
//! quantum and statistical machines up to one choice: how a weight turns
//! into probability mass. `Weight` captures exactly that choice.

use num_complex::Complex;
use num_traits::{One, Zero};
use std::fmt::{Debug, Display};
use std::ops::Mul;

/// Complex amplitude carried by candidates of a quantum machine.
pub type Amplitude = Complex<f64>;

/// Probability mass carried by candidates of a statistical machine.
pub type Probability = f64;

/// A numeric weight attached to a branch candidate.
pub trait Weight: Copy + Debug + Display + PartialEq + Mul<Output = Self> + Zero + One {
    /// Probability mass this weight contributes (`|w|²` or `w`).
    fn probability_mass(&self) -> f64;

    /// Factor every weight is multiplied by so that masses sum to one,
    /// given the current total mass (`total > 0`).
    fn normalization_factor(total_mass: f64) -> f64;

    /// Multiplies the weight by a real factor.
    fn scale(self, factor: f64) -> Self;

    /// Whether an oracle may legally propose this weight.
    fn is_admissible(&self) -> bool;
}

impl Weight for Amplitude {
    fn probability_mass(&self) -> f64 {
        self.norm_sqr()
    }

    fn normalization_factor(total_mass: f64) -> f64 {
        // Amplitudes scale with the square root so that |w|² sums to one.
        1.0 / total_mass.sqrt()
    }

    fn scale(self, factor: f64) -> Self {
        self * factor
    }

    fn is_admissible(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl Weight for Probability {
    fn probability_mass(&self) -> f64 {
        *self
    }

    fn normalization_factor(total_mass: f64) -> f64 {
        1.0 / total_mass
    }

    fn scale(self, factor: f64) -> Self {
        self * factor
    }

    fn is_admissible(&self) -> bool {
        self.is_finite() && *self >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_amplitude_mass_ignores_phase() {
        let a = Complex::new(0.0, FRAC_1_SQRT_2);
        let b = Complex::new(-FRAC_1_SQRT_2, 0.0);
        assert!((a.probability_mass() - 0.5).abs() < 1e-12);
        assert!((b.probability_mass() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_normalization_factors() {
        assert!((<Amplitude as Weight>::normalization_factor(4.0) - 0.5).abs() < 1e-12);
        assert!((<Probability as Weight>::normalization_factor(4.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_admissibility() {
        assert!(0.3_f64.is_admissible());
        assert!(!(-0.1_f64).is_admissible());
        assert!(!f64::NAN.is_admissible());
        // Negative real parts are fine for amplitudes.
        assert!(Complex::new(-0.5, 0.5).is_admissible());
        assert!(!Complex::new(f64::INFINITY, 0.0).is_admissible());
    }
}
