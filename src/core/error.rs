//! Error handling logic

use thiserror::Error;

use super::label::Label;

/// Failures a run can surface to its caller.
///
/// The core never retries: every condition below comes from a pure
/// computation, so repeating the same call reproduces the same error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomatonError {
    /// The cursor was read after it had already consumed the blank sentinel.
    /// A correct transition table always halts before this happens, so this
    /// points at an oracle or controller bug.
    #[error("Out of Bounds: cursor at {position} is past the end of a tape of length {len}")]
    OutOfBounds {
        /// Cursor position at the time of the read
        position: usize,
        /// Tape length including the sentinel
        len: usize,
    },

    /// All probability mass collapsed to zero, so no outcome can be measured.
    #[error("Degenerate Distribution: {message}")]
    DegenerateDistribution {
        /// DegenerateDistribution failure message
        message: String,
    },

    /// The oracle proposed a negative or non-finite weight, or a row whose
    /// mass does not sum to one.
    #[error("Invalid Oracle Output ({label} on {symbol}): {message}")]
    InvalidOracleOutput {
        /// Label the oracle was queried for
        label: Label,
        /// Rendered symbol the oracle was queried with
        symbol: String,
        /// InvalidOracleOutput failure message
        message: String,
    },

    /// A fixed transition table has no row for the queried pair.
    #[error("Undefined Transition: no row for {label} on {symbol}")]
    UndefinedTransition {
        /// Label the table was queried for
        label: Label,
        /// Rendered symbol the table was queried with
        symbol: String,
    },

    /// A branch set that should be normalized is not.
    #[error("Unnormalized Branch Set: {message}")]
    Unnormalized {
        /// Unnormalized failure message
        message: String,
    },

    /// A configuration value is outside its admissible range.
    #[error("Invalid Configuration: {message}")]
    InvalidConfiguration {
        /// InvalidConfiguration failure message
        message: String,
    },

    /// The run controller was driven out of order (e.g. measured before halting).
    #[error("Invalid Run State: {message}")]
    InvalidRunState {
        /// InvalidRunState failure message
        message: String,
    },
}
