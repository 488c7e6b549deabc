//! Multi-objective survivor selection (NSGA-II).
//!
//! All objectives are **minimised**. Every function takes a scored population
//! `BTreeMap<K, O>` where `O` exposes its objective tuple as `&[f64]`, and
//! returns a fresh map. Key order fixes the iteration order, so results are
//! deterministic for a given input, including tie-breaks.
//!
//! # Algorithms
//!
//! - [`dominates`]: Pareto dominance with NaN treated as `+inf`
//! - [`fast_non_dominated_sort`]: peel the population into ranked fronts
//! - [`crowding_distance_assignment`]: per-individual sparsity in objective space
//! - [`cull`]: keep the best `n_out` individuals by (front, crowding distance)
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use symreg::pareto::{cull, fast_non_dominated_sort};
//!
//! let scores = BTreeMap::from([("a", [1.0, 2.0]), ("b", [2.0, 1.0]), ("c", [3.0, 3.0])]);
//!
//! let fronts = fast_non_dominated_sort(&scores);
//! assert_eq!(fronts[&1].iter().copied().collect::<Vec<_>>(), vec!["a", "b"]);
//! assert_eq!(fronts[&2].iter().copied().collect::<Vec<_>>(), vec!["c"]);
//!
//! let survivors = cull(&scores, 2);
//! assert!(survivors.contains_key("a") && survivors.contains_key("b"));
//! ```
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

mod crowding;
mod cull;
mod dominance;
mod sort;

pub use crowding::crowding_distance_assignment;
pub use cull::cull;
pub use dominance::{dominates, SolutionScore};
pub use sort::{fast_non_dominated_sort, Fronts};

use std::collections::BTreeMap;

/// Number of objectives shared by every entry, or `None` for an empty population.
///
/// # Panics
///
/// Panics if two entries have objective tuples of different lengths.
fn objective_count<K, O: AsRef<[f64]>>(scores: &BTreeMap<K, O>) -> Option<usize> {
    let mut lengths = scores.values().map(|o| o.as_ref().len());
    let m = lengths.next()?;
    assert!(
        lengths.all(|len| len == m),
        "all objective tuples must have the same length"
    );
    Some(m)
}
