// src/oracle/mod.rs

//! Weighted transition sources.
//!
//! An oracle maps `(symbol, label)` to the weights of the labels the machine
//! may move to. The quantum machine binds its oracle ahead of time as a
//! fixed [`TransitionTable`]; the statistical machine receives a caller
//! supplied function. Both are variants of [`TransitionOracle`], and both
//! satisfy the [`TransitionSource`] capability the evolution engine talks to.

mod adaptive;

pub use adaptive::AdaptiveSource;

use crate::core::{AutomatonError, Label, Weight};
use crate::simulation::AdaptiveEstimator;
use crate::tape::TapeSymbol;
use std::fmt;

/// Ordered mapping `next label -> weight` proposed for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Transitions<W> {
    entries: Vec<(Label, W)>,
}

impl<W: Weight> Transitions<W> {
    /// An empty row. A candidate evolved with it is annihilated.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// A deterministic row sending all weight to `label`.
    pub fn single(label: impl Into<Label>) -> Self {
        Self::new().with(label, W::one())
    }

    /// Appends an entry, returning `self` for chaining.
    pub fn with(mut self, label: impl Into<Label>, weight: W) -> Self {
        self.push(label, weight);
        self
    }

    pub fn push(&mut self, label: impl Into<Label>, weight: W) {
        self.entries.push((label.into(), weight));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (Label, W)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weight proposed for `label`, summed if it appears more than once.
    pub fn weight_of(&self, label: &Label) -> Option<W> {
        self.entries
            .iter()
            .filter(|(l, _)| l == label)
            .map(|(_, w)| *w)
            .reduce(|a, b| a + b)
    }

    /// Sum of the probability mass of every entry.
    pub fn total_mass(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w.probability_mass()).sum()
    }
}

impl<W: Weight> Default for Transitions<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Weight, L: Into<Label>> FromIterator<(L, W)> for Transitions<W> {
    fn from_iter<I: IntoIterator<Item = (L, W)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(l, w)| (l.into(), w)).collect(),
        }
    }
}

impl<'a, W: Weight> IntoIterator for &'a Transitions<W> {
    type Item = &'a (Label, W);
    type IntoIter = std::slice::Iter<'a, (Label, W)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The capability the evolution engine queries for transition weights.
///
/// Besides answering queries, a source is told which label the run was
/// observed to move to after each step, and is reset at the start of every
/// run. Plain tables ignore both; [`AdaptiveSource`] learns from them.
pub trait TransitionSource<S, W> {
    /// Proposes the weighted next labels for a candidate at `label` reading `symbol`.
    fn transitions(&mut self, symbol: &TapeSymbol<S>, label: &Label) -> Result<Transitions<W>, AutomatonError>;

    /// Records the observed outcome of a completed step.
    fn observe(&mut self, _symbol: &TapeSymbol<S>, _next: &Label) {}

    /// Discards anything learned during a previous run.
    fn reset(&mut self) {}

    /// Running statistics, for sources that keep them.
    fn estimator(&self) -> Option<&AdaptiveEstimator<S>> {
        None
    }
}

/// One row of a fixed table.
#[derive(Debug, Clone, PartialEq)]
struct TableRow<S, W> {
    label: Label,
    symbol: TapeSymbol<S>,
    transitions: Transitions<W>,
}

/// A transition table fixed ahead of time: `(label, symbol) -> transitions`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionTable<S, W> {
    rows: Vec<TableRow<S, W>>,
}

impl<S: PartialEq, W: Weight> TransitionTable<S, W> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Starts building a table with method chaining.
    pub fn builder() -> TransitionTableBuilder<S, W> {
        TransitionTableBuilder::new()
    }

    /// Inserts or replaces the row for `(label, symbol)`.
    pub fn insert(&mut self, label: Label, symbol: TapeSymbol<S>, transitions: Transitions<W>) {
        match self.rows.iter_mut().find(|r| r.label == label && r.symbol == symbol) {
            Some(row) => row.transitions = transitions,
            None => self.rows.push(TableRow { label, symbol, transitions }),
        }
    }

    /// Looks up the row for `(label, symbol)`.
    pub fn get(&self, label: &Label, symbol: &TapeSymbol<S>) -> Option<&Transitions<W>> {
        self.rows
            .iter()
            .find(|r| &r.label == label && &r.symbol == symbol)
            .map(|r| &r.transitions)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<S: PartialEq, W: Weight> Default for TransitionTable<S, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, W> TransitionSource<S, W> for TransitionTable<S, W>
where
    S: PartialEq + fmt::Display,
    W: Weight,
{
    fn transitions(&mut self, symbol: &TapeSymbol<S>, label: &Label) -> Result<Transitions<W>, AutomatonError> {
        self.get(label, symbol)
            .cloned()
            .ok_or_else(|| AutomatonError::UndefinedTransition {
                label: label.clone(),
                symbol: symbol.to_string(),
            })
    }
}

/// A helper struct for programmatically constructing `TransitionTable` instances.
pub struct TransitionTableBuilder<S, W> {
    table: TransitionTable<S, W>,
}

impl<S: PartialEq, W: Weight> TransitionTableBuilder<S, W> {
    pub fn new() -> Self {
        Self { table: TransitionTable::new() }
    }

    /// Adds the row for `(label, symbol)`.
    ///
    /// Returns `self` to allow for continued method chaining.
    pub fn rule<L, I, N>(mut self, label: L, symbol: impl Into<TapeSymbol<S>>, row: I) -> Self
    where
        L: Into<Label>,
        N: Into<Label>,
        I: IntoIterator<Item = (N, W)>,
    {
        self.table.insert(label.into(), symbol.into(), row.into_iter().collect());
        self
    }

    /// Adds the row taken when `label` reads the blank sentinel.
    pub fn on_blank<L, I, N>(self, label: L, row: I) -> Self
    where
        L: Into<Label>,
        N: Into<Label>,
        I: IntoIterator<Item = (N, W)>,
    {
        self.rule(label, TapeSymbol::Blank, row)
    }

    /// Finalizes and returns the table.
    pub fn build(self) -> TransitionTable<S, W> {
        self.table
    }
}

impl<S: PartialEq, W: Weight> Default for TransitionTableBuilder<S, W> {
    fn default() -> Self {
        Self::new()
    }
}

/// Signature of a caller supplied transition function.
pub type TransitionFn<S, W> = dyn Fn(&TapeSymbol<S>, &Label) -> Transitions<W>;

/// A weighted transition source bound either ahead of time or at call time.
pub enum TransitionOracle<S, W> {
    /// Fixed lookup table.
    Table(TransitionTable<S, W>),
    /// Function evaluated on every query.
    Callable(Box<TransitionFn<S, W>>),
}

impl<S, W> TransitionOracle<S, W> {
    /// Wraps a transition function.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&TapeSymbol<S>, &Label) -> Transitions<W> + 'static,
    {
        TransitionOracle::Callable(Box::new(f))
    }
}

impl<S, W> From<TransitionTable<S, W>> for TransitionOracle<S, W> {
    fn from(table: TransitionTable<S, W>) -> Self {
        TransitionOracle::Table(table)
    }
}

impl<S, W> TransitionSource<S, W> for TransitionOracle<S, W>
where
    S: PartialEq + fmt::Display,
    W: Weight,
{
    fn transitions(&mut self, symbol: &TapeSymbol<S>, label: &Label) -> Result<Transitions<W>, AutomatonError> {
        match self {
            TransitionOracle::Table(table) => table.transitions(symbol, label),
            TransitionOracle::Callable(f) => Ok(f(symbol, label)),
        }
    }
}

impl<S: fmt::Debug, W: fmt::Debug> fmt::Debug for TransitionOracle<S, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionOracle::Table(table) => f.debug_tuple("Table").field(table).finish(),
            TransitionOracle::Callable(_) => f.write_str("Callable(<fn>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Amplitude;
    use num_complex::Complex;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn toggle_table() -> TransitionTable<char, f64> {
        TransitionTable::builder()
            .rule("q0", '1', [("q1", 1.0)])
            .rule("q0", '0', [("q0", 1.0)])
            .on_blank("q0", [(Label::accept(), 1.0)])
            .build()
    }

    #[test]
    fn test_table_lookup() -> Result<(), AutomatonError> {
        let mut table = toggle_table();
        assert_eq!(table.len(), 3);
        let row = table.transitions(&TapeSymbol::Symbol('1'), &Label::new("q0"))?;
        assert_eq!(row.weight_of(&Label::new("q1")), Some(1.0));
        let blank = table.transitions(&TapeSymbol::Blank, &Label::new("q0"))?;
        assert_eq!(blank.weight_of(&Label::accept()), Some(1.0));
        Ok(())
    }

    #[test]
    fn test_missing_row_is_undefined_transition() {
        let mut table = toggle_table();
        let err = table.transitions(&TapeSymbol::Symbol('1'), &Label::new("q7")).unwrap_err();
        assert_eq!(
            err,
            AutomatonError::UndefinedTransition { label: Label::new("q7"), symbol: "1".to_string() }
        );
    }

    #[test]
    fn test_insert_replaces_existing_row() {
        let mut table = toggle_table();
        table.insert(Label::new("q0"), TapeSymbol::Symbol('1'), Transitions::single("q0"));
        assert_eq!(table.len(), 3);
        let row = table.get(&Label::new("q0"), &TapeSymbol::Symbol('1')).unwrap();
        assert_eq!(row.weight_of(&Label::new("q0")), Some(1.0));
        assert_eq!(row.weight_of(&Label::new("q1")), None);
    }

    #[test]
    fn test_callable_oracle() -> Result<(), AutomatonError> {
        let mut oracle: TransitionOracle<f64, f64> = TransitionOracle::from_fn(|symbol: &TapeSymbol<f64>, _label: &Label| match symbol.value() {
            Some(v) if *v > 0.5 => Transitions::new().with("q1", 0.7).with("q0", 0.3),
            _ => Transitions::single("q0"),
        });
        let row = oracle.transitions(&TapeSymbol::Symbol(0.9), &Label::start())?;
        assert_eq!(row.len(), 2);
        assert!((row.total_mass() - 1.0).abs() < 1e-12);
        let row = oracle.transitions(&TapeSymbol::Blank, &Label::start())?;
        assert_eq!(row.weight_of(&Label::start()), Some(1.0));
        assert_eq!(format!("{:?}", oracle), "Callable(<fn>)");
        Ok(())
    }

    #[test]
    fn test_amplitude_row_mass() {
        let h = Complex::new(FRAC_1_SQRT_2, 0.0);
        let row: Transitions<Amplitude> = [("q0", h), ("q1", -h)].into_iter().collect();
        assert!((row.total_mass() - 1.0).abs() < 1e-12);
    }
}
