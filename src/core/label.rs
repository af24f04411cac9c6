// src/core/label.rs

use super::constants::qstm_constants::{ACCEPT_LABEL, REJECT_LABEL, START_LABEL};
use std::fmt;

/// Identifier of a logical automaton state.
///
/// Labels are compared by equality only. Two of them are reserved as
/// terminal labels: [`Label::accept`] and [`Label::reject`]. Candidates
/// carrying a terminal label are frozen by the evolution engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Label(String);

impl Label {
    /// Creates a label from any string-like name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The default start label, `q0`.
    pub fn start() -> Self {
        Self::new(START_LABEL)
    }

    /// The terminal accept label.
    pub fn accept() -> Self {
        Self::new(ACCEPT_LABEL)
    }

    /// The terminal reject label.
    pub fn reject() -> Self {
        Self::new(REJECT_LABEL)
    }

    /// The label's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the terminal accept label.
    pub fn is_accept(&self) -> bool {
        self.0 == ACCEPT_LABEL
    }

    /// Returns `true` for the terminal reject label.
    pub fn is_reject(&self) -> bool {
        self.0 == REJECT_LABEL
    }

    /// Returns `true` for the two reserved terminal labels.
    pub fn is_terminal(&self) -> bool {
        self.is_accept() || self.is_reject()
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
