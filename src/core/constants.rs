//! Constants shared by every machine variant.

/// Reserved labels and default numeric settings
pub mod qstm_constants {
    /// Label every run starts in unless configured otherwise.
    pub const START_LABEL: &str = "q0";
    /// Terminal label meaning the input is accepted.
    pub const ACCEPT_LABEL: &str = "q_accept";
    /// Terminal label meaning the input is rejected.
    pub const REJECT_LABEL: &str = "q_reject";
    /// How the blank sentinel renders on a tape.
    pub const BLANK_SYMBOL: &str = "B";

    /// Allowed deviation of a normalized branch set's mass from 1.
    pub const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;
    /// Allowed deviation of an oracle row's mass from 1.
    pub const DEFAULT_ORACLE_TOLERANCE: f64 = 1e-9;
    /// Mass at or below which a candidate counts as annihilated.
    pub const DEFAULT_ZERO_MASS_TOLERANCE: f64 = 1e-12;

    /// Learning rate α blending observed frequencies into oracle weights.
    pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
    /// Number of trailing history labels forming the confidence pattern.
    pub const DEFAULT_PATTERN_WINDOW: usize = 3;
    /// Confidence at or above which a statistical verdict is reported as confident.
    pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.8;
    /// Confidence reported before any label has been observed.
    pub const INITIAL_CONFIDENCE: f64 = 0.5;
}
