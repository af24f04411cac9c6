// src/simulation/results.rs
use crate::core::{Label, Verdict};
use crate::tape::TapeSymbol;
use std::fmt;

/// The observable result of a completed run plus diagnostics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunOutcome<S> {
    verdict: Verdict,
    /// Label produced by the single measurement.
    measured: Label,
    steps: usize,
    /// Aggregated mass per label of the final branch set.
    distribution: Vec<(Label, f64)>,
    final_confidence: Option<f64>,
    confidence_threshold: Option<f64>,
    transition_counts: Vec<(Label, usize)>,
    input_counts: Vec<(TapeSymbol<S>, usize)>,
}

impl<S> RunOutcome<S> {
    /// Creates an outcome for a measured label. (Internal visibility)
    pub(crate) fn new(measured: Label, steps: usize, distribution: Vec<(Label, f64)>) -> Self {
        Self {
            verdict: Verdict::from_label(&measured),
            measured,
            steps,
            distribution,
            final_confidence: None,
            confidence_threshold: None,
            transition_counts: Vec::new(),
            input_counts: Vec::new(),
        }
    }

    /// Attaches the statistics of a learning machine. (Internal visibility)
    pub(crate) fn record_statistics(
        &mut self,
        confidence: f64,
        threshold: f64,
        transition_counts: Vec<(Label, usize)>,
        input_counts: Vec<(TapeSymbol<S>, usize)>,
    ) {
        self.final_confidence = Some(confidence);
        self.confidence_threshold = Some(threshold);
        self.transition_counts = transition_counts;
        self.input_counts = input_counts;
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn measured(&self) -> &Label {
        &self.measured
    }

    /// Number of steps taken before halting.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn distribution(&self) -> &[(Label, f64)] {
        &self.distribution
    }

    /// Probability the final branch set assigned to `label` (0 if absent).
    pub fn probability_of(&self, label: &Label) -> f64 {
        self.distribution
            .iter()
            .filter(|(l, _)| l == label)
            .map(|(_, p)| p)
            .sum()
    }

    /// Probability of measuring the accept label.
    pub fn acceptance_probability(&self) -> f64 {
        self.probability_of(&Label::accept())
    }

    /// Pattern confidence at the end of the run, for machines that learn.
    pub fn final_confidence(&self) -> Option<f64> {
        self.final_confidence
    }

    /// Whether the final confidence reached the configured threshold.
    /// `None` for machines that do not learn.
    pub fn is_confident(&self) -> Option<bool> {
        match (self.final_confidence, self.confidence_threshold) {
            (Some(c), Some(t)) => Some(c >= t),
            _ => None,
        }
    }

    pub fn transition_counts(&self) -> &[(Label, usize)] {
        &self.transition_counts
    }

    pub fn input_counts(&self) -> &[(TapeSymbol<S>, usize)] {
        &self.input_counts
    }
}

impl<S: fmt::Display> fmt::Display for RunOutcome<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run Outcome:")?;
        writeln!(f, "  Measured state: {}", self.measured)?;
        writeln!(f, "  Result: {}", self.verdict)?;
        writeln!(f, "  Steps: {}", self.steps)?;
        writeln!(f, "  Final distribution:")?;
        for (label, p) in &self.distribution {
            writeln!(f, "    {}: {:.4}", label, p)?;
        }
        if let Some(confidence) = self.final_confidence {
            writeln!(f, "  Confidence in result: {:.2}", confidence)?;
        }
        if !self.transition_counts.is_empty() {
            writeln!(f, "  Transition statistics:")?;
            for (label, count) in &self.transition_counts {
                writeln!(f, "    {}: {} times", label, count)?;
            }
        }
        if !self.input_counts.is_empty() {
            writeln!(f, "  Input counts:")?;
            for (symbol, count) in &self.input_counts {
                writeln!(f, "    {}: {}", symbol, count)?;
            }
        }
        Ok(())
    }
}
