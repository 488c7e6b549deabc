//! Pareto dominance.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// `p` dominates `q` if it is no worse in every objective and strictly
/// better in at least one (minimisation).
///
/// NaN components are treated as `+inf` on both sides, so a NaN objective is
/// the worst possible value rather than an incomparable one.
///
/// ```
/// use symreg::pareto::dominates;
///
/// assert!(dominates(&[1.0, 2.0], &[1.0, 3.0]));
/// assert!(!dominates(&[1.0, 2.0], &[1.0, 2.0]));
/// assert!(!dominates(&[1.0, 3.0], &[2.0, 1.0]));
/// assert!(dominates(&[5.0, 1.0], &[f64::NAN, 1.0]));
/// ```
pub fn dominates(p: &[f64], q: &[f64]) -> bool {
    dominance_cmp(p, q) == Dominance::Left
}

/// Dominance comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

/// Compares two objective tuples for dominance in a single pass.
pub(crate) fn dominance_cmp(a: &[f64], b: &[f64]) -> Dominance {
    debug_assert_eq!(a.len(), b.len(), "objective tuples differ in length");

    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        let (va, vb) = (nan_as_inf(va), nan_as_inf(vb));
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

pub(crate) fn nan_as_inf(v: f64) -> f64 {
    if v.is_nan() {
        f64::INFINITY
    } else {
        v
    }
}

/// An individual paired with its objective tuple.
///
/// [`fast_non_dominated_sort`](super::fast_non_dominated_sort) compares
/// populations in this form.
///
/// Two entries are equal only if both the individual and the scores match
/// (scores compare bitwise), so the same individual under different scores
/// stays distinguishable.
#[derive(Debug, Clone, Copy)]
pub struct SolutionScore<'a, K> {
    pub individual: &'a K,
    pub scores: &'a [f64],
}

impl<'a, K> SolutionScore<'a, K> {
    pub fn new(individual: &'a K, scores: &'a [f64]) -> Self {
        Self { individual, scores }
    }

    /// Whether this entry dominates `other`. See [`dominates`].
    pub fn dominates(&self, other: &SolutionScore<'_, K>) -> bool {
        dominates(self.scores, other.scores)
    }

    /// Borrows every entry of a scored population, in key order.
    pub fn scores_from_map<O: AsRef<[f64]>>(
        scores: &'a std::collections::BTreeMap<K, O>,
    ) -> Vec<Self> {
        scores
            .iter()
            .map(|(k, o)| SolutionScore::new(k, o.as_ref()))
            .collect()
    }
}

impl<K: PartialEq> PartialEq for SolutionScore<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        self.individual == other.individual
            && self.scores.len() == other.scores.len()
            && self
                .scores
                .iter()
                .zip(other.scores)
                .all(|(a, b)| a.total_cmp(b) == Ordering::Equal)
    }
}

impl<K: Eq> Eq for SolutionScore<'_, K> {}

impl<K: Hash> Hash for SolutionScore<'_, K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.individual.hash(state);
        for s in self.scores {
            s.to_bits().hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::{BTreeMap, HashSet};

    #[test]
    fn test_basic_dominance() {
        assert!(dominates(&[1.0, 1.0], &[2.0, 2.0]));
        assert!(dominates(&[1.0, 2.0], &[2.0, 2.0]));
        assert!(!dominates(&[2.0, 2.0], &[1.0, 2.0]));
        assert!(!dominates(&[1.0, 3.0], &[3.0, 1.0]));
        assert!(!dominates(&[3.0, 1.0], &[1.0, 3.0]));
    }

    #[test]
    fn test_nan_is_worst() {
        assert!(dominates(&[f64::INFINITY, 1.0], &[f64::NAN, 2.0]));
        assert!(!dominates(&[f64::NAN, 1.0], &[f64::INFINITY, 1.0]));
        assert!(!dominates(&[f64::INFINITY, 1.0], &[f64::NAN, 1.0]));
        assert!(!dominates(&[f64::NAN], &[f64::NAN]));
    }

    #[test]
    fn test_dominance_cmp() {
        assert_eq!(dominance_cmp(&[1.0, 1.0], &[2.0, 2.0]), Dominance::Left);
        assert_eq!(dominance_cmp(&[2.0, 2.0], &[1.0, 1.0]), Dominance::Right);
        assert_eq!(dominance_cmp(&[1.0, 2.0], &[2.0, 1.0]), Dominance::Neither);
        assert_eq!(dominance_cmp(&[1.0, 2.0], &[1.0, 2.0]), Dominance::Neither);
    }

    #[test]
    fn test_solution_score_identity() {
        let scores = BTreeMap::from([("a", [1.0, 2.0]), ("b", [1.0, 2.0])]);
        let entries = SolutionScore::scores_from_map(&scores);
        assert_eq!(entries.len(), 2);
        assert_ne!(entries[0], entries[1]);

        let same_a = [1.0, 2.0];
        let other_a = [1.0, 3.0];
        assert_eq!(entries[0], SolutionScore::new(&"a", &same_a));
        assert_ne!(entries[0], SolutionScore::new(&"a", &other_a));

        let set: HashSet<_> = [entries[0], SolutionScore::new(&"a", &same_a)].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert!(SolutionScore::new(&"x", &[0.0, 0.0][..]).dominates(&entries[0]));
    }

    fn objective() -> impl Strategy<Value = f64> {
        prop_oneof![8 => -100.0..100.0f64, 1 => Just(f64::INFINITY), 1 => Just(f64::NAN)]
    }

    proptest! {
        #[test]
        fn prop_irreflexive(p in prop::collection::vec(objective(), 1..5)) {
            prop_assert!(!dominates(&p, &p));
        }

        #[test]
        fn prop_asymmetric(
            p in prop::collection::vec(objective(), 3),
            q in prop::collection::vec(objective(), 3),
        ) {
            prop_assert!(!(dominates(&p, &q) && dominates(&q, &p)));
        }

        #[test]
        fn prop_transitive_chain(
            r in prop::collection::vec(-100.0..100.0f64, 2),
            d1 in prop::collection::vec(0.0..10.0f64, 2),
            d2 in prop::collection::vec(0.0..10.0f64, 2),
        ) {
            // q = r - d1, p = q - d2 so each step is no worse in every objective
            let q: Vec<f64> = r.iter().zip(&d1).map(|(a, b)| a - b).collect();
            let p: Vec<f64> = q.iter().zip(&d2).map(|(a, b)| a - b).collect();
            if dominates(&p, &q) && dominates(&q, &r) {
                prop_assert!(dominates(&p, &r));
            }
        }
    }
}
