//! Fast non-dominated sorting.

use super::dominance::{dominance_cmp, Dominance, SolutionScore};
use super::objective_count;
use std::collections::{BTreeMap, BTreeSet};

/// Individuals grouped by Pareto rank. Rank 1 is the non-dominated front.
pub type Fronts<K> = BTreeMap<usize, BTreeSet<K>>;

/// Fast non-dominated sorting.
///
/// Groups individuals into fronts: front 1 holds everything no other
/// individual dominates, front 2 what is dominated only by front 1, and so on.
/// Every individual appears in exactly one front, and only non-empty fronts
/// are returned. An empty population gives an empty map.
///
/// # Algorithm (Deb et al., 2002)
///
/// 1. For each pair, record who dominates whom
/// 2. Individuals dominated by nobody form front 1
/// 3. Remove the current front, decrementing the domination counts of
///    everything it dominated; counts reaching zero form the next front
///
/// # Complexity
///
/// O(m * n²) where m = number of objectives, n = number of individuals
///
/// # Panics
///
/// Panics if objective tuples differ in length.
pub fn fast_non_dominated_sort<K, O>(scores: &BTreeMap<K, O>) -> Fronts<K>
where
    K: Ord + Clone,
    O: AsRef<[f64]>,
{
    let mut fronts = Fronts::new();
    if objective_count(scores).is_none() {
        return fronts;
    }

    let entries = SolutionScore::scores_from_map(scores);
    let n = entries.len();

    // dominated_by[i]: individuals i dominates; domination_count[i]: how many dominate i
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut domination_count = vec![0usize; n];

    for i in 0..n {
        for j in (i + 1)..n {
            match dominance_cmp(entries[i].scores, entries[j].scores) {
                Dominance::Left => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }
    }

    let mut current: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();
    let mut rank = 1;
    while !current.is_empty() {
        let mut next = Vec::new();
        for &i in &current {
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    next.push(j);
                }
            }
        }
        fronts.insert(rank, current.iter().map(|&i| entries[i].individual.clone()).collect());
        rank += 1;
        current = next;
    }

    fronts
}
