// src/simulation/engine.rs

//! Branch evolution and normalization.
//!
//! Both functions are generic over [`Weight`], so the quantum machine
//! (complex amplitudes) and the statistical machine (probabilities) share
//! one implementation.

use crate::core::{AutomatonError, BranchSet, Label, Weight};
use crate::oracle::{TransitionSource, Transitions};
use crate::tape::TapeSymbol;
use crate::validation::check_transitions;
use std::collections::HashMap;
use std::fmt::Display;

/// Applies the oracle to every live candidate and returns the next branch set.
///
/// Terminal candidates are copied through unchanged. Every other candidate
/// `(label, w)` is replaced by one candidate `(next, w * t)` per entry
/// `next -> t` of the oracle's row. Candidates that end up sharing a label
/// are kept distinct.
///
/// The oracle is queried at most once per distinct live label, and each
/// row is checked with [`check_transitions`] before it is applied.
///
/// # Arguments
/// * `branches` - The current branch set.
/// * `symbol` - The symbol under the cursor.
/// * `oracle` - The transition source.
/// * `tolerance` - Allowed deviation of a row's mass from 1.
pub fn evolve<S, W, O>(
    branches: &BranchSet<W>,
    symbol: &TapeSymbol<S>,
    oracle: &mut O,
    tolerance: f64,
) -> Result<BranchSet<W>, AutomatonError>
where
    S: Display,
    W: Weight,
    O: TransitionSource<S, W> + ?Sized,
{
    let mut rows: HashMap<Label, Transitions<W>> = HashMap::new();
    let mut next = BranchSet::with_capacity(branches.len() * 2);

    for candidate in branches {
        if candidate.is_terminal() {
            next.push_candidate(candidate.clone());
            continue;
        }

        if !rows.contains_key(&candidate.label) {
            let row = oracle.transitions(symbol, &candidate.label)?;
            check_transitions(&row, &candidate.label, symbol, Some(tolerance))?;
            rows.insert(candidate.label.clone(), row);
        }

        if let Some(row) = rows.get(&candidate.label) {
            for (next_label, transition_weight) in row {
                next.push(next_label.clone(), candidate.weight * *transition_weight);
            }
        }
    }

    Ok(next)
}

/// Outcome of a normalization pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalization {
    /// Weights were rescaled; `total_mass` is the mass before rescaling.
    Rescaled { total_mass: f64 },
    /// Total mass was zero (or not finite); weights were left unchanged.
    Degenerate,
}

impl Normalization {
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Normalization::Degenerate)
    }
}

/// Rescales `branches` in place so that its total probability mass is 1.
///
/// Amplitudes are multiplied by `1/sqrt(total)`, probabilities by `1/total`.
/// A zero total leaves the weights untouched and is reported as
/// [`Normalization::Degenerate`]; callers must not measure such a set.
pub fn normalize<W: Weight>(branches: &mut BranchSet<W>) -> Normalization {
    let total_mass = branches.total_mass();
    if !(total_mass > 0.0 && total_mass.is_finite()) {
        return Normalization::Degenerate;
    }

    let factor = W::normalization_factor(total_mass);
    for candidate in branches.candidates_mut() {
        candidate.weight = candidate.weight.scale(factor);
    }
    Normalization::Rescaled { total_mass }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Amplitude, Label};
    use crate::oracle::{TransitionOracle, TransitionTable};
    use num_complex::Complex;
    use num_traits::Zero;
    use std::f64::consts::FRAC_1_SQRT_2;

    const TEST_TOLERANCE: f64 = 1e-9;

    fn hadamard_like() -> TransitionTable<char, Amplitude> {
        let h = Complex::new(FRAC_1_SQRT_2, 0.0);
        TransitionTable::builder()
            .rule("q0", '1', [("q0", h), ("q1", h)])
            .rule("q1", '1', [("q1", h), ("q0", h)])
            .build()
    }

    #[test]
    fn test_evolve_branches_without_merging() -> Result<(), AutomatonError> {
        let mut oracle = hadamard_like();
        let start: BranchSet<Amplitude> = BranchSet::singleton("q0");

        let once = evolve(&start, &TapeSymbol::Symbol('1'), &mut oracle, TEST_TOLERANCE)?;
        assert_eq!(once.len(), 2);

        let twice = evolve(&once, &TapeSymbol::Symbol('1'), &mut oracle, TEST_TOLERANCE)?;
        // q0 -> {q0, q1}, q1 -> {q1, q0}: four distinct candidates, two per label.
        assert_eq!(twice.len(), 4);
        for candidate in &twice {
            assert!((candidate.weight - Complex::new(0.5, 0.0)).norm_sqr() < TEST_TOLERANCE * TEST_TOLERANCE);
        }
        let agg = twice.aggregate();
        assert_eq!(agg.len(), 2);
        Ok(())
    }

    #[test]
    fn test_evolve_uses_complex_multiplication() -> Result<(), AutomatonError> {
        let i = Complex::new(0.0, 1.0);
        let mut oracle: TransitionTable<char, Amplitude> =
            TransitionTable::builder().rule("q0", 'x', [("q1", i)]).build();
        let mut start: BranchSet<Amplitude> = BranchSet::new();
        start.push("q0", i);

        let next = evolve(&start, &TapeSymbol::Symbol('x'), &mut oracle, TEST_TOLERANCE)?;
        // i * i = -1
        assert!((next.candidates()[0].weight - Complex::new(-1.0, 0.0)).norm_sqr() < 1e-18);
        Ok(())
    }

    #[test]
    fn test_terminal_candidates_are_frozen() -> Result<(), AutomatonError> {
        // An empty table: any query for a live label would fail.
        let mut oracle: TransitionTable<char, f64> = TransitionTable::new();
        let mut set: BranchSet<f64> = BranchSet::new();
        set.push(Label::accept(), 0.4);
        set.push(Label::reject(), 0.6);

        let next = evolve(&set, &TapeSymbol::Symbol('1'), &mut oracle, TEST_TOLERANCE)?;
        assert_eq!(next, set);
        Ok(())
    }

    #[test]
    fn test_evolve_is_deterministic() -> Result<(), AutomatonError> {
        let mut oracle: TransitionOracle<f64, f64> = TransitionOracle::from_fn(|_: &TapeSymbol<f64>, label: &Label| {
            if label.as_str() == "q0" {
                Transitions::new().with("q1", 0.7).with("q0", 0.3)
            } else {
                Transitions::new().with("q0", 0.7).with("q1", 0.3)
            }
        });
        let mut set: BranchSet<f64> = BranchSet::new();
        set.push("q0", 0.5);
        set.push("q1", 0.5);

        let a = evolve(&set, &TapeSymbol::Symbol(0.9), &mut oracle, TEST_TOLERANCE)?;
        let b = evolve(&set, &TapeSymbol::Symbol(0.9), &mut oracle, TEST_TOLERANCE)?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_evolve_rejects_invalid_rows() {
        let mut oracle: TransitionOracle<f64, f64> =
            TransitionOracle::from_fn(|_: &TapeSymbol<f64>, _: &Label| Transitions::new().with("q0", 0.9));
        let set: BranchSet<f64> = BranchSet::singleton("q0");
        let result = evolve(&set, &TapeSymbol::Symbol(0.1), &mut oracle, TEST_TOLERANCE);
        assert!(matches!(result, Err(AutomatonError::InvalidOracleOutput { .. })));
    }

    #[test]
    fn test_normalize_amplitudes() {
        let mut set: BranchSet<Amplitude> = BranchSet::new();
        set.push("q0", Complex::new(3.0, 0.0));
        set.push("q1", Complex::new(0.0, 4.0));

        let outcome = normalize(&mut set);
        assert_eq!(outcome, Normalization::Rescaled { total_mass: 25.0 });
        assert!((set.total_mass() - 1.0).abs() < TEST_TOLERANCE);
        // Phase survives rescaling.
        assert!((set.candidates()[1].weight - Complex::new(0.0, 0.8)).norm_sqr() < 1e-18);
    }

    #[test]
    fn test_normalize_probabilities() {
        let mut set: BranchSet<f64> = BranchSet::new();
        set.push("q0", 1.0);
        set.push("q1", 3.0);
        normalize(&mut set);
        assert!((set.candidates()[0].weight - 0.25).abs() < TEST_TOLERANCE);
        assert!((set.total_mass() - 1.0).abs() < TEST_TOLERANCE);
    }

    #[test]
    fn test_normalize_degenerate_leaves_weights() {
        let mut set: BranchSet<Amplitude> = BranchSet::new();
        set.push("q0", Complex::zero());
        set.push("q1", Complex::zero());
        let before = set.clone();

        assert!(normalize(&mut set).is_degenerate());
        assert_eq!(set, before);
        assert!(set.iter().all(|c| !c.weight.re.is_nan()));
    }
}
