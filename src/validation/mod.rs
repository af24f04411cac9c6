// src/validation/mod.rs

//! Checks on branch sets and oracle rows.

use crate::core::constants::qstm_constants::{DEFAULT_NORM_TOLERANCE, DEFAULT_ORACLE_TOLERANCE};
use crate::core::{AutomatonError, BranchSet, Label, Weight};
use crate::oracle::Transitions;
use crate::tape::TapeSymbol;
use std::fmt::Display;

/// Checks that the total probability mass of `branches` is 1 within tolerance.
///
/// # Arguments
/// * `branches` - The branch set to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to 1e-9.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(AutomatonError::Unnormalized)` otherwise.
pub fn check_normalization<W: Weight>(branches: &BranchSet<W>, tolerance: Option<f64>) -> Result<(), AutomatonError> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    let total = branches.total_mass();
    if (total - 1.0).abs() > effective_tolerance {
        Err(AutomatonError::Unnormalized {
            message: format!("Sum of candidate mass = {} (Deviation > {})", total, effective_tolerance),
        })
    } else {
        Ok(())
    }
}

/// Checks a row proposed by an oracle before it is applied.
///
/// Every weight must be admissible (finite, and non-negative for
/// probabilities) and the row's mass must sum to 1 within tolerance. A row
/// with zero total mass is accepted: it annihilates the queried candidate,
/// and the normalizer reports a degenerate distribution if nothing else
/// survives.
///
/// # Returns
/// * `Ok(())` if the row can be applied.
/// * `Err(AutomatonError::InvalidOracleOutput)` otherwise.
pub fn check_transitions<S, W>(
    row: &Transitions<W>,
    label: &Label,
    symbol: &TapeSymbol<S>,
    tolerance: Option<f64>,
) -> Result<(), AutomatonError>
where
    S: Display,
    W: Weight,
{
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_ORACLE_TOLERANCE);
    let invalid = |message: String| AutomatonError::InvalidOracleOutput {
        label: label.clone(),
        symbol: symbol.to_string(),
        message,
    };

    if let Some((next, weight)) = row.iter().find(|(_, w)| !w.is_admissible()) {
        return Err(invalid(format!("weight {} for {} is negative or not finite", weight, next)));
    }

    let total = row.total_mass();
    if total == 0.0 {
        return Ok(());
    }
    if (total - 1.0).abs() > effective_tolerance {
        return Err(invalid(format!("row mass sums to {} (Deviation > {})", total, effective_tolerance)));
    }
    Ok(())
}

/// Performs the checks that must hold right after normalization: every
/// weight admissible and total mass 1.
pub fn validate_branch_set<W: Weight>(branches: &BranchSet<W>, norm_tolerance: Option<f64>) -> Result<(), AutomatonError> {
    if let Some(bad) = branches.iter().find(|c| !c.weight.is_admissible()) {
        return Err(AutomatonError::Unnormalized {
            message: format!("candidate {} carries inadmissible weight {}", bad.label, bad.weight),
        });
    }
    check_normalization(branches, norm_tolerance)
}
