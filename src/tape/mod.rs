// src/tape/mod.rs

//! The read-only input tape and its single-direction cursor.
//!
//! A tape is built from an input sequence with one blank sentinel appended.
//! The cursor starts on the first cell and only ever moves right; once it
//! has moved past the sentinel the tape is exhausted and further reads fail
//! with `OutOfBounds`.

use crate::core::{AutomatonError, BLANK_SYMBOL};
use std::fmt;

/// A cell of the tape: either an input symbol or the blank sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TapeSymbol<S> {
    Symbol(S),
    Blank,
}

impl<S> TapeSymbol<S> {
    pub fn is_blank(&self) -> bool {
        matches!(self, TapeSymbol::Blank)
    }

    /// The input value, or `None` for the sentinel.
    pub fn value(&self) -> Option<&S> {
        match self {
            TapeSymbol::Symbol(s) => Some(s),
            TapeSymbol::Blank => None,
        }
    }
}

impl<S> From<S> for TapeSymbol<S> {
    fn from(symbol: S) -> Self {
        TapeSymbol::Symbol(symbol)
    }
}

impl<S: fmt::Display> fmt::Display for TapeSymbol<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TapeSymbol::Symbol(s) => write!(f, "{}", s),
            TapeSymbol::Blank => f.write_str(BLANK_SYMBOL),
        }
    }
}

/// Input symbols followed by a blank sentinel, plus the read cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Tape<S> {
    cells: Vec<TapeSymbol<S>>,
    head: usize,
}

impl<S> Tape<S> {
    /// Builds a tape from the input sequence and appends the blank sentinel.
    pub fn new<I>(input: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut cells: Vec<TapeSymbol<S>> = input.into_iter().map(TapeSymbol::Symbol).collect();
        cells.push(TapeSymbol::Blank);
        Self { cells, head: 0 }
    }

    /// The symbol under the cursor.
    pub fn current_symbol(&self) -> Result<&TapeSymbol<S>, AutomatonError> {
        self.cells.get(self.head).ok_or(AutomatonError::OutOfBounds {
            position: self.head,
            len: self.cells.len(),
        })
    }

    /// Moves the cursor one cell to the right. Advancing an exhausted tape
    /// leaves the cursor where it is.
    pub fn advance(&mut self) {
        if self.head < self.cells.len() {
            self.head += 1;
        }
    }

    /// Current cursor position.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Number of cells, sentinel included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: every tape holds at least the blank sentinel.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of input symbols, sentinel excluded.
    pub fn input_len(&self) -> usize {
        self.cells.len() - 1
    }

    /// Returns `true` once the cursor has consumed the sentinel.
    pub fn is_exhausted(&self) -> bool {
        self.head >= self.cells.len()
    }

    pub fn cells(&self) -> &[TapeSymbol<S>] {
        &self.cells
    }
}

impl From<&str> for Tape<char> {
    fn from(input: &str) -> Self {
        Tape::new(input.chars())
    }
}

impl<S: fmt::Display> fmt::Display for Tape<S> {
    /// Renders the cells with the cell under the cursor in brackets, e.g. `10[1]0B`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cell) in self.cells.iter().enumerate() {
            if i == self.head {
                write!(f, "[{}]", cell)?;
            } else {
                write!(f, "{}", cell)?;
            }
        }
        Ok(())
    }
}
