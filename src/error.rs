//! Error types for analysis operations

use thiserror::Error;

/// Errors surfaced by analysis entry points.
///
/// Degenerate aggregates (an empty formant slot, a zero-width comfortable
/// range, too few frames for a tremor estimate) are not errors; those paths
/// substitute documented defaults and continue.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No voiced frames were found during pitch analysis. Fatal to the
    /// call; the caller decides whether to re-sample and retry.
    #[error("Insufficient signal: no voiced frames detected")]
    InsufficientSignal,

    /// Input rejected before any computation began.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
