// src/simulation/measurement.rs

//! Collapse of a branch set to one observed label.
//!
//! This is the only stochastic operation in the crate. The random source is
//! always passed in by the caller, so seeding it makes a run reproducible.

use crate::core::{AutomatonError, BranchSet, Label, Weight};
use rand::Rng;
use rand::distr::{Distribution, StandardUniform};

/// Samples one label from the aggregated probability distribution of `branches`.
///
/// Mass is summed per distinct label, the aggregates are rescaled to sum to
/// 1, and a single uniform draw is compared against the cumulative
/// distribution (labels in order of first appearance).
///
/// # Returns
/// * `Ok(Label)` - the measured label.
/// * `Err(AutomatonError::DegenerateDistribution)` if the total mass is zero.
pub fn measure<W, R>(branches: &BranchSet<W>, rng: &mut R) -> Result<Label, AutomatonError>
where
    W: Weight,
    R: Rng + ?Sized,
{
    let distribution = branches.aggregate();
    let total: f64 = distribution.iter().map(|(_, mass)| mass).sum();
    if !(total > 0.0 && total.is_finite()) {
        return Err(AutomatonError::DegenerateDistribution {
            message: format!("cannot measure a branch set with total mass {}", total),
        });
    }

    let draw: f64 = StandardUniform.sample(rng); // in [0, 1)
    let mut cumulative = 0.0;
    for (label, mass) in &distribution {
        cumulative += mass / total;
        if draw < cumulative {
            return Ok(label.clone());
        }
    }

    // Rounding can leave the cumulative sum a hair under 1.
    distribution
        .into_iter()
        .rev()
        .find(|(_, mass)| *mass > 0.0)
        .map(|(label, _)| label)
        .ok_or_else(|| AutomatonError::DegenerateDistribution {
            message: "no label carries positive mass".to_string(),
        })
}
