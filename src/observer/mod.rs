// src/observer/mod.rs

//! Per-step hooks for presentation layers.
//!
//! The run controller never prints or logs. It hands a [`StepEvent`] to a
//! [`StepObserver`] after every step and the [`RunOutcome`] once the run has
//! been measured. Any `FnMut(&StepEvent)` closure is an observer; the
//! crate also ships [`NoopObserver`] and [`TracingObserver`].

use crate::core::{BranchSet, Weight};
use crate::simulation::RunOutcome;
use crate::tape::{Tape, TapeSymbol};
use std::fmt::Display;
use tracing::{Level, event};

/// Snapshot handed to observers after a completed step.
#[derive(Debug)]
pub struct StepEvent<'a, S, W> {
    /// 1-based index of the step that just completed.
    pub step_index: usize,
    /// Symbol read during this step.
    pub symbol: &'a TapeSymbol<S>,
    /// Branch set after evolution and normalization.
    pub branches: &'a BranchSet<W>,
    /// Tape with the cursor already advanced.
    pub tape: &'a Tape<S>,
    /// Pattern confidence, for machines that learn.
    pub confidence: Option<f64>,
}

/// Receives progress of a run.
pub trait StepObserver<S, W> {
    fn on_step(&mut self, event: &StepEvent<'_, S, W>);

    /// Called once with the measured outcome of a completed run.
    fn on_finish(&mut self, _outcome: &RunOutcome<S>) {}
}

impl<S, W, F> StepObserver<S, W> for F
where
    F: FnMut(&StepEvent<'_, S, W>),
{
    fn on_step(&mut self, event: &StepEvent<'_, S, W>) {
        self(event)
    }
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl<S, W> StepObserver<S, W> for NoopObserver {
    fn on_step(&mut self, _event: &StepEvent<'_, S, W>) {}
}

/// Emits every step as a structured `tracing` event at `DEBUG` level and
/// the outcome at `INFO` level. Nothing is recorded unless the host has
/// installed a subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl<S, W> StepObserver<S, W> for TracingObserver
where
    S: Display,
    W: Weight,
{
    fn on_step(&mut self, e: &StepEvent<'_, S, W>) {
        event!(
            Level::DEBUG,
            step = e.step_index,
            symbol = %e.symbol,
            tape = %e.tape,
            candidates = e.branches.len(),
            live_mass = e.branches.live_mass(),
            terminal_mass = e.branches.terminal_mass(),
            confidence = e.confidence,
            "automaton step"
        );
    }

    fn on_finish(&mut self, outcome: &RunOutcome<S>) {
        event!(
            Level::INFO,
            verdict = %outcome.verdict(),
            measured = %outcome.measured(),
            steps = outcome.steps(),
            confidence = outcome.final_confidence(),
            "automaton finished"
        );
    }
}
