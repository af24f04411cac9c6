// src/lib.rs

//! `qstm` - Probabilistic and amplitude-weighted tape automata
//!
//! A machine reads a finite tape one symbol at a time while holding a set of
//! weighted candidate states. Every step asks a transition oracle where each
//! candidate may go, renormalizes the result, and stops when the tape is
//! consumed or only terminal candidates carry mass. A single measurement
//! then collapses the branch set to an accept or reject verdict.
//!
//! Weights are either complex amplitudes (mass `|w|²`) or plain
//! probabilities, selected by the [`Weight`] type parameter.

pub mod config;
pub mod core;
pub mod machines;
pub mod observer;
pub mod oracle;
pub mod simulation;
pub mod tape;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use config::{AdaptiveConfig, BlendPolicy, MachineConfig};
pub use core::{Amplitude, AutomatonError, BranchSet, Candidate, Label, Probability, Verdict, Weight};
pub use observer::{NoopObserver, StepEvent, StepObserver, TracingObserver};
pub use oracle::{AdaptiveSource, TransitionOracle, TransitionSource, TransitionTable, TransitionTableBuilder, Transitions};
pub use simulation::{
    AdaptiveEstimator, ClassicalMachine, Machine, QuantumMachine, RunOutcome, RunState, StatisticalMachine, StepStatus,
};
pub use tape::{Tape, TapeSymbol};
pub use validation::{check_normalization, check_transitions, validate_branch_set};

// Example 1: Deterministic parity
// A single candidate walks the table; the verdict does not depend on the RNG.
/// ```
/// use qstm::{ClassicalMachine, NoopObserver, Verdict, AutomatonError};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(7);
///
/// let mut even = ClassicalMachine::classical_parity("1010")?;
/// let outcome = even.run(&mut rng, &mut NoopObserver)?;
/// assert_eq!(outcome.verdict(), Verdict::Accept);
/// assert_eq!(outcome.steps(), 5); // four symbols plus the blank
///
/// let mut odd = ClassicalMachine::classical_parity("10101")?;
/// assert_eq!(odd.run(&mut rng, &mut NoopObserver)?.verdict(), Verdict::Reject);
/// # Ok::<(), AutomatonError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Amplitude parity
// Every symbol splits each candidate in two, so the final distribution is
// an even mix of accept and reject; only the draw picks the verdict.
/// ```
/// use qstm::{QuantumMachine, Label, AutomatonError};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut machine = QuantumMachine::quantum_parity("1010")?;
/// let mut steps = Vec::new();
/// let mut observer = |event: &qstm::StepEvent<'_, char, qstm::Amplitude>| {
///     steps.push((event.step_index, event.branches.len()));
/// };
/// let outcome = machine.run(&mut StdRng::seed_from_u64(42), &mut observer)?;
///
/// assert!((outcome.acceptance_probability() - 0.5).abs() < 1e-9);
/// assert!((outcome.probability_of(&Label::reject()) - 0.5).abs() < 1e-9);
/// assert_eq!(steps.last(), Some(&(5, 16)));
/// # Ok::<(), AutomatonError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
