//! Fitness: mapping a program to its (error, complexity) objective pair.
//!
//! Both objectives are minimised. `error` is the mean absolute error of the
//! program's predictions; `complexity` is its token count. A program that
//! produces NaN anywhere, or cannot be evaluated at all, scores an error of
//! `+inf` so it is dominated by every well-behaved program of equal size.

use crate::error::EvalError;
use crate::program::Program;

/// An (error, complexity) objective pair.
///
/// Stored as a two-element array so it can be handed to the
/// [`pareto`](crate::pareto) functions as an objective slice.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score([f64; 2]);

impl Score {
    pub fn new(error: f64, complexity: usize) -> Self {
        Self([error, complexity as f64])
    }

    pub fn error(&self) -> f64 {
        self.0[0]
    }

    pub fn complexity(&self) -> usize {
        self.0[1] as usize
    }

    /// The objective tuple `[error, complexity]`.
    pub fn objectives(&self) -> &[f64] {
        &self.0
    }
}

impl AsRef<[f64]> for Score {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// Scores `program` against targets `y`.
///
/// `x` has one row per variable and one column per sample, aligned with `y`.
/// Evaluation errors are not propagated: the individual is scored with an
/// error of `+inf` and its usual complexity.
///
/// ```
/// use symreg::fitness::{fitness, Score};
/// use symreg::program::Program;
///
/// let x = [vec![1.0]];
/// assert_eq!(fitness(&Program::new("$0", 1).unwrap(), Some(&x), &[1.0]), Score::new(0.0, 1));
/// assert_eq!(fitness(&Program::new("0", 1).unwrap(), Some(&x), &[1.0]), Score::new(1.0, 1));
/// ```
pub fn fitness(program: &Program, x: Option<&[Vec<f64>]>, y: &[f64]) -> Score {
    try_fitness(program, x, y).unwrap_or_else(|err| {
        log::debug!("scoring `{program}` failed: {err}");
        Score::new(f64::INFINITY, program.complexity())
    })
}

/// Like [`fitness`], but reports evaluation failures.
pub fn try_fitness(program: &Program, x: Option<&[Vec<f64>]>, y: &[f64]) -> Result<Score, EvalError> {
    let value = program.eval(x)?;
    let error = if value.has_nan() {
        f64::INFINITY
    } else {
        mean_absolute_error(&value.into_samples(y.len())?, y)
    };
    Ok(Score::new(error, program.complexity()))
}

/// Mean absolute deviation between predictions and targets.
///
/// Returns `+inf` for empty input, mismatched lengths, or any NaN in the result.
pub fn mean_absolute_error(predictions: &[f64], targets: &[f64]) -> f64 {
    if predictions.is_empty() || predictions.len() != targets.len() {
        return f64::INFINITY;
    }
    let total: f64 = predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| (p - t).abs())
        .sum();
    let mae = total / predictions.len() as f64;
    if mae.is_nan() {
        f64::INFINITY
    } else {
        mae
    }
}
