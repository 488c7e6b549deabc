//! Error types.
//!
//! Construction and evaluation failures of a [`Program`](crate::program::Program)
//! are kept apart: a malformed token stream can never enter a population,
//! while an evaluation failure only penalises one individual.

use thiserror::Error;

/// A token stream that does not describe exactly one expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// No tokens at all.
    #[error("program has no tokens")]
    Empty,

    /// A token that is neither an operator, a literal nor a `$<index>` variable.
    #[error("unknown token `{token}` at position {position}")]
    UnknownToken { token: String, position: usize },

    /// The stream ran out before an operator received all of its operands.
    #[error("operator `{op}` at position {position} is missing operands")]
    ArityUnderflow { op: &'static str, position: usize },

    /// A complete tree was read but tokens remain.
    #[error("only {consumed} of {total} tokens form the expression")]
    TrailingTokens { consumed: usize, total: usize },
}

/// A variable reference that cannot be resolved against the supplied data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The program reads a variable but no data table was supplied.
    #[error("variable ${index} referenced but no data was supplied")]
    MissingData { index: usize },

    /// The variable index is past the last supplied column.
    #[error("variable ${index} out of range: {available} variable(s) supplied")]
    VariableOutOfRange { index: usize, available: usize },

    /// Sample counts disagree between variables, or between predictions and targets.
    #[error("shape mismatch: expected {expected} samples, found {found}")]
    ShapeMismatch { expected: usize, found: usize },
}

/// An invalid configuration value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("population_size must be at least 1")]
    PopulationTooSmall,

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidSpread { name: &'static str, value: f64 },

    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("mutation probabilities sum to {0}, which exceeds 1.0")]
    ProbabilityOverflow(f64),

    #[error("max_size must be at least 1")]
    MaxSizeTooSmall,

    #[error("tournament size must be at least 1")]
    TournamentTooSmall,

    #[error("time_limit_ms must be positive or None")]
    ZeroTimeLimit,

    #[error("no stopping condition: set max_generations, time_limit_ms or stagnation_limit")]
    Unbounded,
}

/// Failure to set up a search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Variable rows of the input table disagree with the target length.
    #[error("variable ${variable} has {found} samples but the target has {expected}")]
    RaggedData {
        variable: usize,
        expected: usize,
        found: usize,
    },

    #[error("target has no samples")]
    EmptyTarget,
}
