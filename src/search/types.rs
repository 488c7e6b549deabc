//! Records returned by a search.

use crate::fitness::Score;
use crate::program::Program;
use std::fmt;
use std::time::Duration;

/// One member of the first Pareto front.
#[derive(Debug, Clone, PartialEq)]
pub struct ParetoRecord {
    /// Mean absolute error on the training data.
    pub error: f64,
    /// Token count.
    pub complexity: usize,
    pub program: Program,
}

impl ParetoRecord {
    pub(crate) fn new(program: &Program, score: &Score) -> Self {
        Self {
            error: score.error(),
            complexity: score.complexity(),
            program: program.clone(),
        }
    }
}

impl fmt::Display for ParetoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>3}] {:<12.6} {}", self.complexity, self.error, self.program)
    }
}

/// Why a full run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The step counter reached `max_generations`.
    GenerationLimit,
    /// `time_limit_ms` elapsed.
    TimeLimit,
    /// The first front stayed unchanged for `stagnation_limit` steps.
    Stagnated,
    /// The cancellation flag was raised.
    Cancelled,
}

/// Outcome of [`Search::run`](super::Search::run).
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// First Pareto front, by ascending complexity.
    pub front: Vec<ParetoRecord>,

    /// Value of the step counter when the run ended.
    pub generations: usize,

    /// Steps taken during this run.
    pub steps_this_run: usize,

    /// Consecutive steps without a change to the first front.
    pub stagnated_generations: usize,

    /// Wall-clock duration of this run.
    pub elapsed: Duration,

    pub stop_reason: StopReason,
}

impl SearchResult {
    /// The front member with the lowest error.
    pub fn best(&self) -> Option<&ParetoRecord> {
        self.front
            .iter()
            .min_by(|a, b| a.error.total_cmp(&b.error))
    }
}
