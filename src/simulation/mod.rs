// src/simulation/mod.rs

//! Drives a tape through a branching automaton and collapses the result.
//!
//! This module contains the [`Machine`] run controller together with the
//! pieces it orchestrates: branch evolution and normalization
//! ([`evolve`], [`normalize`]), measurement ([`measure`]) and the adaptive
//! estimator of the statistical machine ([`AdaptiveEstimator`]).

mod engine;
mod estimator;
mod measurement;
mod results;

// Re-export the main public interface types
pub use engine::{Normalization, evolve, normalize};
pub use estimator::{AdaptiveEstimator, FrequencyTable};
pub use measurement::measure;
pub use results::RunOutcome;

use crate::config::{AdaptiveConfig, MachineConfig};
use crate::core::{Amplitude, AutomatonError, BranchSet, Label, Probability, Verdict, Weight};
use crate::machines;
use crate::observer::{StepEvent, StepObserver};
use crate::oracle::{AdaptiveSource, TransitionOracle, TransitionSource, Transitions};
use crate::tape::{Tape, TapeSymbol};
use crate::validation::validate_branch_set;
use rand::Rng;
use std::fmt;

/// Lifecycle of a run.
///
/// `Ready -> Running -> Halted -> Finished(verdict)`. `Halted` means the
/// finish rule fired and the branch set awaits its single measurement.
/// Any error while stepping moves the run to `Aborted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Ready,
    Running,
    Halted,
    Finished(Verdict),
    Aborted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Ready => write!(f, "Ready"),
            RunState::Running => write!(f, "Running"),
            RunState::Halted => write!(f, "Halted"),
            RunState::Finished(verdict) => write!(f, "Finished({})", verdict),
            RunState::Aborted => write!(f, "Aborted"),
        }
    }
}

/// What a call to [`Machine::step`] left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// More input remains and live candidates still carry mass.
    Continue,
    /// The run has halted; call [`Machine::finish`] to measure it.
    Halted,
}

/// A branching tape automaton and the state of its current run.
///
/// The tape, branch set and any learning state belong to the run; `start`
/// (or `run`) rebuilds all of them from the stored input.
#[derive(Debug)]
pub struct Machine<S, W, O> {
    config: MachineConfig,
    oracle: O,
    input: Vec<S>,
    tape: Tape<S>,
    branches: BranchSet<W>,
    state: RunState,
    steps: usize,
    outcome: Option<RunOutcome<S>>,
}

/// Deterministic automaton expressed with unit probabilities.
pub type ClassicalMachine = Machine<char, Probability, TransitionOracle<char, Probability>>;
/// Amplitude-weighted automaton over a fixed table.
pub type QuantumMachine = Machine<char, Amplitude, TransitionOracle<char, Amplitude>>;
/// Probability-weighted automaton over real inputs with online learning.
pub type StatisticalMachine = Machine<f64, Probability, AdaptiveSource<f64, TransitionOracle<f64, Probability>>>;

impl<S, W, O> Machine<S, W, O>
where
    S: Clone + PartialEq + fmt::Display,
    W: Weight,
    O: TransitionSource<S, W>,
{
    /// Creates a machine for `input` in the `Ready` state.
    ///
    /// # Returns
    /// * `Err(AutomatonError::InvalidConfiguration)` if `config` fails validation.
    pub fn new<I>(input: I, oracle: O, config: MachineConfig) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = S>,
    {
        config.validate()?;
        let input: Vec<S> = input.into_iter().collect();
        let tape = Tape::new(input.iter().cloned());
        let branches = BranchSet::singleton(config.start_label.clone());
        Ok(Self {
            config,
            oracle,
            input,
            tape,
            branches,
            state: RunState::Ready,
            steps: 0,
            outcome: None,
        })
    }

    /// Begins a fresh run: new tape, a single start candidate with full
    /// weight, and a reset oracle.
    pub fn start(&mut self) {
        self.tape = Tape::new(self.input.iter().cloned());
        self.branches = BranchSet::singleton(self.config.start_label.clone());
        self.oracle.reset();
        self.steps = 0;
        self.outcome = None;
        self.state = RunState::Running;
    }

    /// Advances the run by exactly one symbol.
    ///
    /// A `Ready` machine is started first. Once halted or finished, further
    /// calls change nothing and return [`StepStatus::Halted`].
    pub fn step<Obs>(&mut self, observer: &mut Obs) -> Result<StepStatus, AutomatonError>
    where
        Obs: StepObserver<S, W> + ?Sized,
    {
        match self.state {
            RunState::Ready => self.start(),
            RunState::Running => {}
            RunState::Halted | RunState::Finished(_) => return Ok(StepStatus::Halted),
            RunState::Aborted => {
                return Err(AutomatonError::InvalidRunState {
                    message: "run was aborted by an earlier error; call start() to begin a new run".to_string(),
                });
            }
        }

        self.advance(observer).inspect_err(|_| self.state = RunState::Aborted)
    }

    fn advance<Obs>(&mut self, observer: &mut Obs) -> Result<StepStatus, AutomatonError>
    where
        Obs: StepObserver<S, W> + ?Sized,
    {
        let symbol = self.tape.current_symbol()?.clone();

        let mut next = evolve(&self.branches, &symbol, &mut self.oracle, self.config.oracle_tolerance)?;
        if normalize(&mut next).is_degenerate() {
            return Err(AutomatonError::DegenerateDistribution {
                message: format!("all probability mass vanished at step {} reading {}", self.steps + 1, symbol),
            });
        }
        validate_branch_set(&next, Some(self.config.norm_tolerance))?;

        self.tape.advance();
        self.steps += 1;
        if let Some(observed) = next.dominant_label() {
            self.oracle.observe(&symbol, &observed);
        }
        self.branches = next;

        let halted = self.tape.is_exhausted() || self.branches.is_settled(self.config.zero_mass_tolerance);

        observer.on_step(&StepEvent {
            step_index: self.steps,
            symbol: &symbol,
            branches: &self.branches,
            tape: &self.tape,
            confidence: self.oracle.estimator().map(AdaptiveEstimator::confidence),
        });

        if halted {
            self.state = RunState::Halted;
            Ok(StepStatus::Halted)
        } else {
            Ok(StepStatus::Continue)
        }
    }

    /// Measures the halted branch set and produces the verdict.
    ///
    /// Measurement happens exactly once per run; calling this again on a
    /// finished run returns the same outcome without drawing from `rng`.
    pub fn finish<R>(&mut self, rng: &mut R) -> Result<RunOutcome<S>, AutomatonError>
    where
        R: Rng + ?Sized,
    {
        match self.state {
            RunState::Halted => {}
            RunState::Finished(_) => {
                return self.outcome.clone().ok_or_else(|| AutomatonError::InvalidRunState {
                    message: "finished run has no recorded outcome".to_string(),
                });
            }
            other => {
                return Err(AutomatonError::InvalidRunState {
                    message: format!("cannot measure a run in state {}", other),
                });
            }
        }

        let measured = measure(&self.branches, rng)?;
        let mut outcome = RunOutcome::new(measured, self.steps, self.branches.aggregate());
        if let Some(estimator) = self.oracle.estimator() {
            outcome.record_statistics(
                estimator.confidence(),
                estimator.config().confidence_threshold,
                estimator.transition_counts().to_vec(),
                estimator.input_counts().to_vec(),
            );
        }

        self.state = RunState::Finished(outcome.verdict());
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// Runs the stored input from the start to a measured verdict.
    pub fn run<R, Obs>(&mut self, rng: &mut R, observer: &mut Obs) -> Result<RunOutcome<S>, AutomatonError>
    where
        R: Rng + ?Sized,
        Obs: StepObserver<S, W> + ?Sized,
    {
        self.start();
        while self.step(observer)? == StepStatus::Continue {}
        let outcome = self.finish(rng)?;
        observer.on_finish(&outcome);
        Ok(outcome)
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn branches(&self) -> &BranchSet<W> {
        &self.branches
    }

    pub fn tape(&self) -> &Tape<S> {
        &self.tape
    }

    /// Steps completed in the current run.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The measured outcome, once the run is finished.
    pub fn outcome(&self) -> Option<&RunOutcome<S>> {
        self.outcome.as_ref()
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn input(&self) -> &[S] {
        &self.input
    }
}

impl ClassicalMachine {
    /// Even-parity recognizer over `{0, 1}` with a single deterministic path.
    pub fn classical_parity(input: &str) -> Result<Self, AutomatonError> {
        Machine::new(
            input.chars(),
            TransitionOracle::Table(machines::classical_parity_table()),
            MachineConfig::default(),
        )
    }
}

impl QuantumMachine {
    /// Even-parity automaton whose every symbol splits each live candidate
    /// into an equal-amplitude pair over `{q0, q1}`.
    pub fn quantum_parity(input: &str) -> Result<Self, AutomatonError> {
        Machine::new(
            input.chars(),
            TransitionOracle::Table(machines::quantum_parity_table()),
            MachineConfig::default(),
        )
    }
}

impl StatisticalMachine {
    /// Statistical machine over real-valued `inputs` with a caller supplied
    /// transition function whose rows must sum to 1.
    pub fn statistical<I, F>(inputs: I, transition: F, adaptive: AdaptiveConfig) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = f64>,
        F: Fn(&TapeSymbol<f64>, &Label) -> Transitions<f64> + 'static,
    {
        Self::statistical_with_config(inputs, transition, adaptive, MachineConfig::default())
    }

    /// Same as [`statistical`](Self::statistical) with an explicit run configuration.
    pub fn statistical_with_config<I, F>(
        inputs: I,
        transition: F,
        adaptive: AdaptiveConfig,
        config: MachineConfig,
    ) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = f64>,
        F: Fn(&TapeSymbol<f64>, &Label) -> Transitions<f64> + 'static,
    {
        adaptive.validate()?;
        let source = AdaptiveSource::new(TransitionOracle::from_fn(transition), adaptive)
            .with_tolerance(config.oracle_tolerance);
        Machine::new(inputs, source, config)
    }

    /// Statistical machine driven by [`machines::threshold_walk`].
    pub fn threshold_walk<I>(inputs: I) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = f64>,
    {
        Self::statistical(inputs, machines::threshold_walk, AdaptiveConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_step_walks_the_lifecycle() -> Result<(), AutomatonError> {
        let mut machine = ClassicalMachine::classical_parity("11")?;
        assert_eq!(machine.state(), RunState::Ready);

        assert_eq!(machine.step(&mut NoopObserver)?, StepStatus::Continue);
        assert_eq!(machine.state(), RunState::Running);
        assert_eq!(machine.tape().head(), 1);
        assert_eq!(machine.step(&mut NoopObserver)?, StepStatus::Continue);
        assert_eq!(machine.step(&mut NoopObserver)?, StepStatus::Halted);
        assert_eq!(machine.state(), RunState::Halted);
        assert_eq!(machine.steps(), 3);

        // Halted runs do not move.
        assert_eq!(machine.step(&mut NoopObserver)?, StepStatus::Halted);
        assert_eq!(machine.steps(), 3);

        let mut rng = StdRng::seed_from_u64(1);
        let outcome = machine.finish(&mut rng)?;
        assert_eq!(outcome.verdict(), Verdict::Accept);
        assert_eq!(machine.state(), RunState::Finished(Verdict::Accept));
        Ok(())
    }

    #[test]
    fn test_finish_before_halting_is_rejected() -> Result<(), AutomatonError> {
        let mut machine = QuantumMachine::quantum_parity("10")?;
        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(machine.finish(&mut rng), Err(AutomatonError::InvalidRunState { .. })));
        machine.step(&mut NoopObserver)?;
        assert!(matches!(machine.finish(&mut rng), Err(AutomatonError::InvalidRunState { .. })));
        Ok(())
    }

    #[test]
    fn test_finish_is_idempotent() -> Result<(), AutomatonError> {
        let mut machine = QuantumMachine::quantum_parity("1")?;
        let mut rng = StdRng::seed_from_u64(5);
        let first = machine.run(&mut rng, &mut NoopObserver)?;
        // A different source must not matter: nothing is drawn a second time.
        let mut other = StdRng::seed_from_u64(99);
        for _ in 0..8 {
            assert_eq!(machine.finish(&mut other)?, first);
        }
        assert_eq!(machine.outcome(), Some(&first));
        Ok(())
    }

    #[test]
    fn test_errors_abort_the_run() -> Result<(), AutomatonError> {
        // '2' is not in the parity alphabet.
        let mut machine = ClassicalMachine::classical_parity("12")?;
        machine.step(&mut NoopObserver)?;
        let err = machine.step(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, AutomatonError::UndefinedTransition { .. }));
        assert_eq!(machine.state(), RunState::Aborted);
        assert!(matches!(machine.step(&mut NoopObserver), Err(AutomatonError::InvalidRunState { .. })));

        // A new run starts cleanly and fails at the same place again.
        machine.start();
        assert_eq!(machine.state(), RunState::Running);
        assert_eq!(machine.steps(), 0);
        Ok(())
    }

    #[test]
    fn test_invalid_config_is_rejected_at_construction() {
        let config = MachineConfig::default().with_oracle_tolerance(-1.0);
        let result = Machine::new("1".chars(), TransitionOracle::Table(machines::quantum_parity_table()), config);
        assert!(matches!(result, Err(AutomatonError::InvalidConfiguration { .. })));

        let adaptive = AdaptiveConfig::default().with_learning_rate(2.0);
        let result = StatisticalMachine::statistical(vec![0.1], machines::threshold_walk, adaptive);
        assert!(matches!(result, Err(AutomatonError::InvalidConfiguration { .. })));
    }
}
