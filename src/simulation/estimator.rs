// src/simulation/estimator.rs

//! Online frequency learning for the statistical machine.
//!
//! The estimator counts which label each step was observed to move to and
//! which inputs were read, keeps the ordered history of observed labels,
//! and blends the observed frequencies into the oracle's proposals:
//!
//! `blended[l] = (1 - α) * prior[l] + α * count[l] / Σ count`
//!
//! With [`BlendPolicy::Persistent`] the blended row replaces the prior for
//! the next query of the same `(symbol, label)` pair.

use crate::config::{AdaptiveConfig, BlendPolicy};
use crate::core::constants::qstm_constants::INITIAL_CONFIDENCE;
use crate::core::Label;
use crate::oracle::Transitions;
use crate::tape::TapeSymbol;

/// Occurrence counts keyed by equality, in order of first appearance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrequencyTable<K> {
    entries: Vec<(K, usize)>,
}

impl<K: Clone + PartialEq> FrequencyTable<K> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Increments the count of `key`.
    pub fn record(&mut self, key: &K) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((key.clone(), 1)),
        }
    }

    pub fn count(&self, key: &K) -> usize {
        self.entries.iter().find(|(k, _)| k == key).map_or(0, |(_, c)| *c)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// `count(key) / total()`, or 0 when nothing has been recorded.
    pub fn frequency(&self, key: &K) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(key) as f64 / total as f64,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (K, usize)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_vec(&self) -> Vec<(K, usize)> {
        self.entries.clone()
    }
}

impl<K: Clone + PartialEq> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct LearnedRow<S> {
    symbol: TapeSymbol<S>,
    label: Label,
    row: Transitions<f64>,
}

/// Running statistics and blended transition weights for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveEstimator<S> {
    config: AdaptiveConfig,
    transition_counts: FrequencyTable<Label>,
    input_counts: FrequencyTable<TapeSymbol<S>>,
    history: Vec<Label>,
    learned: Vec<LearnedRow<S>>,
}

impl<S: Clone + PartialEq> AdaptiveEstimator<S> {
    pub fn new(config: AdaptiveConfig) -> Self {
        Self {
            config,
            transition_counts: FrequencyTable::new(),
            input_counts: FrequencyTable::new(),
            history: Vec::new(),
            learned: Vec::new(),
        }
    }

    pub fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    /// Records that reading `input` led to `next`.
    pub fn update_statistics(&mut self, input: &TapeSymbol<S>, next: &Label) {
        self.transition_counts.record(next);
        self.input_counts.record(input);
        self.history.push(next.clone());
    }

    /// Share of observed steps that moved to `label`.
    pub fn observed_frequency(&self, label: &Label) -> f64 {
        self.transition_counts.frequency(label)
    }

    /// Blends observed frequencies into the oracle's `proposal` for `(input, label)`.
    ///
    /// Before anything has been observed the proposal is returned as is.
    /// A proposal with zero total mass annihilates the candidate and is also
    /// returned as is; it neither reads nor updates the learned row.
    /// Only labels present in the proposal are blended; the result is
    /// rescaled to unit mass so that frequency mass landing on labels the
    /// proposal does not mention is redistributed over the ones it does.
    pub fn blend(&mut self, input: &TapeSymbol<S>, label: &Label, proposal: Transitions<f64>) -> Transitions<f64> {
        if self.transition_counts.total() == 0 || proposal.total_mass() == 0.0 {
            return proposal;
        }

        let persistent = self.config.blend_policy == BlendPolicy::Persistent;
        let slot = self.learned.iter().position(|r| &r.symbol == input && &r.label == label);
        let prior = match slot {
            Some(i) if persistent => &self.learned[i].row,
            _ => &proposal,
        };

        let alpha = self.config.learning_rate;
        let mut blended: Transitions<f64> = prior
            .iter()
            .map(|(next, w)| (next.clone(), (1.0 - alpha) * w + alpha * self.observed_frequency(next)))
            .collect();

        let total = blended.total_mass();
        if total > 0.0 && (total - 1.0).abs() > f64::EPSILON {
            blended = blended.iter().map(|(next, w)| (next.clone(), w / total)).collect();
        }

        if persistent {
            match slot {
                Some(i) => self.learned[i].row = blended.clone(),
                None => self.learned.push(LearnedRow {
                    symbol: input.clone(),
                    label: label.clone(),
                    row: blended.clone(),
                }),
            }
        }
        blended
    }

    /// Pattern-based confidence over the observed history.
    ///
    /// The trailing `min(window, len)` labels form the pattern; confidence is
    /// the number of earlier occurrences of that exact pattern divided by
    /// the history length. An empty history reports 0.5.
    pub fn confidence(&self) -> f64 {
        let n = self.history.len();
        if n == 0 {
            return INITIAL_CONFIDENCE;
        }
        let width = self.config.pattern_window.min(n);
        let pattern = &self.history[n - width..];
        // Windows of history[..n-1] start strictly before the trailing pattern.
        let earlier = self.history[..n - 1]
            .windows(width)
            .filter(|w| *w == pattern)
            .count();
        earlier as f64 / n as f64
    }

    /// The blended row kept for `(input, label)` under the persistent policy.
    pub fn learned_row(&self, input: &TapeSymbol<S>, label: &Label) -> Option<&Transitions<f64>> {
        self.learned
            .iter()
            .find(|r| &r.symbol == input && &r.label == label)
            .map(|r| &r.row)
    }

    pub fn history(&self) -> &[Label] {
        &self.history
    }

    pub fn transition_counts(&self) -> &FrequencyTable<Label> {
        &self.transition_counts
    }

    pub fn input_counts(&self) -> &FrequencyTable<TapeSymbol<S>> {
        &self.input_counts
    }

    /// Clears counts, history and learned rows. Configuration is kept.
    pub fn reset(&mut self) {
        self.transition_counts.clear();
        self.input_counts.clear();
        self.history.clear();
        self.learned.clear();
    }
}
