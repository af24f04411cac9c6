// src/core/mod.rs

//! Core data structures and types

// Declare modules within core
pub mod error;
pub mod label;
pub mod state;
pub mod weight;

// Re-export public types for convenient access via `qstm::core::TypeName`
pub use error::AutomatonError;
pub use label::Label;
pub use state::{BranchSet, Candidate, Verdict};
pub use weight::{Amplitude, Probability, Weight};

pub mod constants;
pub use constants::qstm_constants::{ACCEPT_LABEL, BLANK_SYMBOL, REJECT_LABEL, START_LABEL}; // Re-export
