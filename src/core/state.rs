// src/core/state.rs

use super::label::Label;
use super::weight::Weight;
use std::fmt;

/// One weighted possibility: the machine is in `label` with weight `weight`.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<W> {
    pub label: Label,
    pub weight: W,
}

impl<W: Weight> Candidate<W> {
    /// Creates a candidate at `label` carrying `weight`.
    pub fn new(label: impl Into<Label>, weight: W) -> Self {
        Self { label: label.into(), weight }
    }

    /// Probability mass carried by this candidate.
    pub fn mass(&self) -> f64 {
        self.weight.probability_mass()
    }

    /// Whether the candidate has reached accept or reject and is frozen.
    pub fn is_terminal(&self) -> bool {
        self.label.is_terminal()
    }
}

/// The population of weighted candidates alive at a given step.
///
/// Candidates are kept in the order they were produced. Several candidates
/// may share a label; they are never merged here. Aggregation by label only
/// happens when probability mass is read out for measurement or
/// diagnostics (see [`BranchSet::aggregate`]).
#[derive(Debug, Clone, PartialEq)]
pub struct BranchSet<W> {
    candidates: Vec<Candidate<W>>,
}

impl<W: Weight> BranchSet<W> {
    /// Creates an empty branch set.
    pub fn new() -> Self {
        Self { candidates: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { candidates: Vec::with_capacity(capacity) }
    }

    /// A branch set holding a single candidate with full weight.
    /// This is how every run starts.
    pub fn singleton(label: impl Into<Label>) -> Self {
        let mut set = Self::with_capacity(1);
        set.push(label, W::one());
        set
    }

    pub fn push(&mut self, label: impl Into<Label>, weight: W) {
        self.candidates.push(Candidate::new(label, weight));
    }

    pub fn push_candidate(&mut self, candidate: Candidate<W>) {
        self.candidates.push(candidate);
    }

    /// Read-only view of the candidates in production order.
    pub fn candidates(&self) -> &[Candidate<W>] {
        &self.candidates
    }

    /// Mutable access for the normalizer.
    pub(crate) fn candidates_mut(&mut self) -> &mut [Candidate<W>] {
        &mut self.candidates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate<W>> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Sum of probability mass over all candidates.
    pub fn total_mass(&self) -> f64 {
        self.candidates.iter().map(Candidate::mass).sum()
    }

    /// Mass carried by candidates that have not reached a terminal label.
    pub fn live_mass(&self) -> f64 {
        self.candidates.iter().filter(|c| !c.is_terminal()).map(Candidate::mass).sum()
    }

    /// Mass carried by accept/reject candidates.
    pub fn terminal_mass(&self) -> f64 {
        self.candidates.iter().filter(|c| c.is_terminal()).map(Candidate::mass).sum()
    }

    /// Returns `true` when every non-terminal candidate has (numerically) zero
    /// mass and at least one terminal candidate still carries mass.
    pub fn is_settled(&self, zero_mass_tolerance: f64) -> bool {
        let live_dead = self
            .candidates
            .iter()
            .filter(|c| !c.is_terminal())
            .all(|c| c.mass() <= zero_mass_tolerance);
        live_dead && self.terminal_mass() > zero_mass_tolerance
    }

    /// Probability mass summed per distinct label, in order of first appearance.
    /// The totals are not rescaled.
    pub fn aggregate(&self) -> Vec<(Label, f64)> {
        let mut totals: Vec<(Label, f64)> = Vec::new();
        for candidate in &self.candidates {
            match totals.iter_mut().find(|(label, _)| *label == candidate.label) {
                Some((_, mass)) => *mass += candidate.mass(),
                None => totals.push((candidate.label.clone(), candidate.mass())),
            }
        }
        totals
    }

    /// The label with the greatest aggregated mass. Ties go to the label
    /// that appeared first.
    pub fn dominant_label(&self) -> Option<Label> {
        let mut best: Option<(Label, f64)> = None;
        for (label, mass) in self.aggregate() {
            let replace = match &best {
                Some((_, best_mass)) => mass > *best_mass,
                None => true,
            };
            if replace {
                best = Some((label, mass));
            }
        }
        best.map(|(label, _)| label)
    }
}

impl<W: Weight> Default for BranchSet<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Weight> FromIterator<Candidate<W>> for BranchSet<W> {
    fn from_iter<I: IntoIterator<Item = Candidate<W>>>(iter: I) -> Self {
        Self { candidates: iter.into_iter().collect() }
    }
}

impl<'a, W: Weight> IntoIterator for &'a BranchSet<W> {
    type Item = &'a Candidate<W>;
    type IntoIter = std::slice::Iter<'a, Candidate<W>>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

impl<W: Weight> fmt::Display for BranchSet<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.candidates.is_empty() {
            return write!(f, "∅");
        }
        for (i, c) in self.candidates.iter().enumerate() {
            write!(f, "{}{:.2}|{}⟩", if i > 0 { " + " } else { "" }, c.weight, c.label)?;
        }
        Ok(())
    }
}

/// The externally observed result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verdict {
    Accept,
    Reject,
}

impl Verdict {
    /// Maps a measured label to a verdict. Anything other than the accept
    /// label, including a non-terminal label left when the tape ran out,
    /// is a rejection.
    pub fn from_label(label: &Label) -> Self {
        if label.is_accept() { Verdict::Accept } else { Verdict::Reject }
    }

    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accept => write!(f, "ACCEPT"),
            Verdict::Reject => write!(f, "REJECT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::weight::Amplitude;
    use num_complex::Complex;

    #[test]
    fn test_aggregate_sums_shared_labels_in_first_seen_order() {
        let mut set: BranchSet<f64> = BranchSet::new();
        set.push("q1", 0.2);
        set.push("q0", 0.3);
        set.push("q1", 0.1);
        set.push(Label::accept(), 0.4);

        let agg = set.aggregate();
        assert_eq!(agg.len(), 3);
        assert_eq!(agg[0].0, Label::new("q1"));
        assert!((agg[0].1 - 0.3).abs() < 1e-12);
        assert_eq!(agg[1].0, Label::new("q0"));
        assert_eq!(agg[2].0, Label::accept());
        // Candidates themselves stay distinct.
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_dominant_label_prefers_first_on_tie() {
        let mut set: BranchSet<f64> = BranchSet::new();
        set.push("q0", 0.5);
        set.push("q1", 0.5);
        assert_eq!(set.dominant_label(), Some(Label::new("q0")));

        set.push("q1", 0.1);
        assert_eq!(set.dominant_label(), Some(Label::new("q1")));

        let empty: BranchSet<f64> = BranchSet::new();
        assert_eq!(empty.dominant_label(), None);
    }

    #[test]
    fn test_live_and_terminal_mass() {
        let mut set: BranchSet<Amplitude> = BranchSet::new();
        set.push("q0", Complex::new(0.6, 0.0));
        set.push(Label::reject(), Complex::new(0.0, 0.8));
        assert!((set.live_mass() - 0.36).abs() < 1e-12);
        assert!((set.terminal_mass() - 0.64).abs() < 1e-12);
        assert!(!set.is_settled(1e-12));

        let mut settled: BranchSet<Amplitude> = BranchSet::new();
        settled.push("q0", Complex::new(0.0, 0.0));
        settled.push(Label::accept(), Complex::new(1.0, 0.0));
        assert!(settled.is_settled(1e-12));
    }

    #[test]
    fn test_display_renders_superposition() {
        let mut set: BranchSet<f64> = BranchSet::new();
        set.push("q0", 0.3);
        set.push("q1", 0.7);
        assert_eq!(set.to_string(), "0.30|q0⟩ + 0.70|q1⟩");
        assert_eq!(BranchSet::<f64>::new().to_string(), "∅");
    }

    #[test]
    fn test_verdict_from_label() {
        assert_eq!(Verdict::from_label(&Label::accept()), Verdict::Accept);
        assert_eq!(Verdict::from_label(&Label::reject()), Verdict::Reject);
        assert_eq!(Verdict::from_label(&Label::new("q1")), Verdict::Reject);
    }
}
