//! Parent selection for the search loop.
//!
//! Parents are drawn from the current population. Tournament selection uses
//! the NSGA-II crowded-comparison operator: a lower front rank wins, and
//! within a rank the larger crowding distance wins.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective GA: NSGA-II"
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use crate::pareto::{crowding_distance_assignment, fast_non_dominated_sort};
use rand::Rng;
use std::collections::BTreeMap;

/// Selection strategy for choosing parents.
///
/// ```
/// use symreg::search::Selection;
///
/// // binary crowded tournament (the default)
/// let sel = Selection::Tournament(2);
///
/// // every member equally likely
/// let sel = Selection::Uniform;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Every member of the population is equally likely.
    Uniform,

    /// Pick `k` members at random, keep the best by crowded comparison.
    ///
    /// - k=1: same as uniform
    /// - k=2: standard NSGA-II binary tournament
    /// - k>2: stronger pressure towards the first front
    Tournament(usize),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(2)
    }
}

/// Front rank and crowding distance of one population member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Standing {
    pub rank: usize,
    pub crowding: f64,
}

impl Standing {
    /// Crowded comparison: `self` is preferred over `other`.
    pub fn beats(&self, other: &Standing) -> bool {
        self.rank < other.rank || (self.rank == other.rank && self.crowding > other.crowding)
    }
}

/// Standings for every member, in key order.
pub(crate) fn standings<K, O>(population: &BTreeMap<K, O>) -> Vec<Standing>
where
    K: Ord + Clone,
    O: AsRef<[f64]>,
{
    let crowding = crowding_distance_assignment(population);
    let mut rank_of: BTreeMap<&K, usize> = BTreeMap::new();
    let fronts = fast_non_dominated_sort(population);
    for (&rank, members) in &fronts {
        for member in members {
            if let Some((key, _)) = population.get_key_value(member) {
                rank_of.insert(key, rank);
            }
        }
    }
    population
        .keys()
        .map(|k| Standing {
            rank: rank_of.get(k).copied().unwrap_or(usize::MAX),
            crowding: crowding.get(k).copied().unwrap_or(0.0),
        })
        .collect()
}

impl Selection {
    /// Whether [`select`](Self::select) needs standings.
    pub(crate) fn needs_standings(&self) -> bool {
        matches!(self, Selection::Tournament(k) if *k > 1)
    }

    /// Select a parent index in `0..n`.
    ///
    /// `standings` must hold one entry per member when
    /// [`needs_standings`](Self::needs_standings) is true.
    ///
    /// # Panics
    /// Panics if `n` is zero.
    pub(crate) fn select<R: Rng>(&self, n: usize, standings: &[Standing], rng: &mut R) -> usize {
        assert!(n > 0, "cannot select from empty population");

        match *self {
            Selection::Tournament(k) if k > 1 && standings.len() == n => {
                let mut best = rng.random_range(0..n);
                for _ in 1..k {
                    let idx = rng.random_range(0..n);
                    if standings[idx].beats(&standings[best]) {
                        best = idx;
                    }
                }
                best
            }
            _ => rng.random_range(0..n),
        }
    }
}
