// src/machines/mod.rs

//! Ready-made transition sources for the even-parity family of automata.
//!
//! All three recognize (or estimate) whether a binary input holds an even
//! number of `1`s. They start in `q0`, track parity in `q0`/`q1`, and route
//! to a terminal label when the blank sentinel is read: `q0` accepts, `q1`
//! rejects.

use crate::core::{Amplitude, Label, Weight};
use crate::oracle::{TransitionTable, Transitions};
use crate::tape::TapeSymbol;
use num_complex::Complex;
use std::f64::consts::FRAC_1_SQRT_2;

/// Deterministic parity table: toggle on `1`, stay on `0`.
///
/// Every row sends unit weight to a single label, so a run never branches
/// and reduces to the classical lookup-table walk.
pub fn classical_parity_table<W: Weight>() -> TransitionTable<char, W> {
    TransitionTable::builder()
        .rule("q0", '0', [("q0", W::one())])
        .rule("q0", '1', [("q1", W::one())])
        .on_blank("q0", [(Label::accept(), W::one())])
        .rule("q1", '0', [("q1", W::one())])
        .rule("q1", '1', [("q0", W::one())])
        .on_blank("q1", [(Label::reject(), W::one())])
        .build()
}

/// Amplitude table in which every input symbol sends each of `q0`, `q1`
/// to the equal superposition `(|q0⟩ + |q1⟩) / √2`.
///
/// Branches are never merged, so no interference occurs and the accept
/// probability of a non-empty input is exactly 1/2.
pub fn quantum_parity_table() -> TransitionTable<char, Amplitude> {
    let h = Complex::new(FRAC_1_SQRT_2, 0.0);
    let one = Complex::new(1.0, 0.0);
    TransitionTable::builder()
        .rule("q0", '0', [("q0", h), ("q1", h)])
        .rule("q0", '1', [("q0", h), ("q1", h)])
        .on_blank("q0", [(Label::accept(), one)])
        .rule("q1", '0', [("q1", h), ("q0", h)])
        .rule("q1", '1', [("q1", h), ("q0", h)])
        .on_blank("q1", [(Label::reject(), one)])
        .build()
}

/// Soft parity over real inputs.
///
/// A value above 0.5 counts as a `1`: the machine switches between `q0`
/// and `q1` with probability 0.7. Otherwise it stays with probability 0.7.
/// At the blank `q0` accepts and everything else rejects; unknown labels
/// reject immediately.
pub fn threshold_walk(symbol: &TapeSymbol<f64>, label: &Label) -> Transitions<f64> {
    let value = match symbol {
        TapeSymbol::Blank => {
            return if label.as_str() == "q0" {
                Transitions::single(Label::accept())
            } else {
                Transitions::single(Label::reject())
            };
        }
        TapeSymbol::Symbol(v) => *v,
    };

    let high = value > 0.5;
    match (label.as_str(), high) {
        ("q0", true) | ("q1", false) => Transitions::new().with("q1", 0.7).with("q0", 0.3),
        ("q0", false) | ("q1", true) => Transitions::new().with("q0", 0.7).with("q1", 0.3),
        _ => Transitions::single(Label::reject()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Probability;
    use crate::oracle::TransitionSource;
    use crate::validation::check_transitions;

    #[test]
    fn test_every_preset_row_is_valid() {
        let q0 = Label::new("q0");
        let q1 = Label::new("q1");
        let quantum = quantum_parity_table();
        let classical: TransitionTable<char, Probability> = classical_parity_table();
        for label in [&q0, &q1] {
            for symbol in [TapeSymbol::Symbol('0'), TapeSymbol::Symbol('1'), TapeSymbol::Blank] {
                let row = quantum.get(label, &symbol).expect("quantum row present");
                assert!(check_transitions(row, label, &symbol, None).is_ok());
                let row = classical.get(label, &symbol).expect("classical row present");
                assert!(check_transitions(row, label, &symbol, None).is_ok());
            }
        }
    }

    #[test]
    fn test_threshold_walk_rows() {
        let q0 = Label::new("q0");
        let q1 = Label::new("q1");

        let row = threshold_walk(&TapeSymbol::Symbol(0.7), &q0);
        assert_eq!(row.weight_of(&q1), Some(0.7));
        let row = threshold_walk(&TapeSymbol::Symbol(0.2), &q0);
        assert_eq!(row.weight_of(&q0), Some(0.7));
        let row = threshold_walk(&TapeSymbol::Symbol(0.8), &q1);
        assert_eq!(row.weight_of(&q0), Some(0.7));
        let row = threshold_walk(&TapeSymbol::Symbol(0.5), &q1);
        assert_eq!(row.weight_of(&q1), Some(0.7));

        assert_eq!(threshold_walk(&TapeSymbol::Blank, &q0), Transitions::single(Label::accept()));
        assert_eq!(threshold_walk(&TapeSymbol::Blank, &q1), Transitions::single(Label::reject()));
        assert_eq!(
            threshold_walk(&TapeSymbol::Symbol(0.9), &Label::new("q9")),
            Transitions::single(Label::reject())
        );
    }

    #[test]
    fn test_classical_table_is_deterministic() -> Result<(), crate::core::AutomatonError> {
        let mut table: TransitionTable<char, Probability> = classical_parity_table();
        let row = table.transitions(&TapeSymbol::Symbol('1'), &Label::new("q0"))?;
        assert_eq!(row.len(), 1);
        assert_eq!(row.weight_of(&Label::new("q1")), Some(1.0));
        Ok(())
    }
}
