// src/oracle/adaptive.rs

use super::{TransitionSource, Transitions};
use crate::config::AdaptiveConfig;
use crate::core::constants::qstm_constants::DEFAULT_ORACLE_TOLERANCE;
use crate::core::{AutomatonError, Label};
use crate::simulation::AdaptiveEstimator;
use crate::tape::TapeSymbol;
use crate::validation::check_transitions;
use std::fmt::Display;

/// Wraps a probability oracle with an [`AdaptiveEstimator`].
///
/// Raw rows from the inner oracle are checked first, so an oracle bug is
/// reported as `InvalidOracleOutput` before blending could hide it. The
/// row handed to the engine is the blended one.
#[derive(Debug)]
pub struct AdaptiveSource<S, O> {
    inner: O,
    estimator: AdaptiveEstimator<S>,
    tolerance: f64,
}

impl<S, O> AdaptiveSource<S, O>
where
    S: Clone + PartialEq,
{
    pub fn new(inner: O, config: AdaptiveConfig) -> Self {
        Self {
            inner,
            estimator: AdaptiveEstimator::new(config),
            tolerance: DEFAULT_ORACLE_TOLERANCE,
        }
    }

    /// Sets the tolerance applied to the inner oracle's rows.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<S, O> TransitionSource<S, f64> for AdaptiveSource<S, O>
where
    S: Clone + PartialEq + Display,
    O: TransitionSource<S, f64>,
{
    fn transitions(&mut self, symbol: &TapeSymbol<S>, label: &Label) -> Result<Transitions<f64>, AutomatonError> {
        let proposal = self.inner.transitions(symbol, label)?;
        check_transitions(&proposal, label, symbol, Some(self.tolerance))?;
        Ok(self.estimator.blend(symbol, label, proposal))
    }

    fn observe(&mut self, symbol: &TapeSymbol<S>, next: &Label) {
        self.estimator.update_statistics(symbol, next);
        self.inner.observe(symbol, next);
    }

    fn reset(&mut self) {
        self.estimator.reset();
        self.inner.reset();
    }

    fn estimator(&self) -> Option<&AdaptiveEstimator<S>> {
        Some(&self.estimator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::TransitionOracle;

    fn biased() -> TransitionOracle<f64, f64> {
        TransitionOracle::from_fn(|_: &TapeSymbol<f64>, _: &Label| Transitions::new().with("q1", 0.7).with("q0", 0.3))
    }

    #[test]
    fn test_observations_shift_proposals() -> Result<(), AutomatonError> {
        let mut source = AdaptiveSource::new(biased(), AdaptiveConfig::default());
        let input = TapeSymbol::Symbol(0.9);
        let q0 = Label::start();

        let before = source.transitions(&input, &q0)?;
        assert_eq!(before.weight_of(&Label::new("q1")), Some(0.7));

        source.observe(&input, &Label::new("q0"));
        let after = source.transitions(&input, &q0)?;
        let w = after.weight_of(&Label::new("q0")).unwrap();
        assert!((w - (0.9 * 0.3 + 0.1)).abs() < 1e-12);

        source.reset();
        assert!(source.estimator().unwrap().history().is_empty());
        assert_eq!(source.transitions(&input, &q0)?, before);
        Ok(())
    }

    #[test]
    fn test_raw_rows_are_checked_before_blending() {
        let broken: TransitionOracle<f64, f64> =
            TransitionOracle::from_fn(|_: &TapeSymbol<f64>, _: &Label| Transitions::new().with("q1", 1.4).with("q0", -0.4));
        let mut source = AdaptiveSource::new(broken, AdaptiveConfig::default());
        source.observe(&TapeSymbol::Symbol(0.1), &Label::start());
        let result = source.transitions(&TapeSymbol::Symbol(0.1), &Label::start());
        assert!(matches!(result, Err(AutomatonError::InvalidOracleOutput { .. })));
    }
}
