//! Crowding distance.

use super::dominance::nan_as_inf;
use super::objective_count;
use std::collections::BTreeMap;

/// Crowding distance assignment for diversity preservation.
///
/// Measures how isolated each individual is in objective space; larger is
/// sparser. Values are non-negative or `f64::INFINITY`.
///
/// # Algorithm (Deb et al., 2002)
///
/// For each objective:
/// 1. Sort individuals by that objective (NaN as `+inf`)
/// 2. The lowest and highest individual get `+inf`
/// 3. Every interior individual adds `(next - prev) / (max - min)`
///
/// # Degenerate axes
///
/// The normalising range is taken over the finite values of the axis. When
/// it is zero (all finite values tied) finite gaps contribute nothing. A gap
/// to an infinite neighbour contributes `+inf`; a gap between two infinite
/// neighbours (`inf - inf`) contributes nothing.
///
/// # Complexity
///
/// O(m * n * log n) where m = number of objectives, n = number of individuals
///
/// # Panics
///
/// Panics if objective tuples differ in length.
///
/// ```
/// use std::collections::BTreeMap;
/// use symreg::pareto::crowding_distance_assignment;
///
/// let scores = BTreeMap::from([("a", [1.0, 5.0]), ("b", [3.0, 3.0]), ("c", [5.0, 1.0])]);
/// let d = crowding_distance_assignment(&scores);
/// assert!(d["a"].is_infinite() && d["c"].is_infinite());
/// assert_eq!(d["b"], 2.0);
/// ```
pub fn crowding_distance_assignment<K, O>(scores: &BTreeMap<K, O>) -> BTreeMap<K, f64>
where
    K: Ord + Clone,
    O: AsRef<[f64]>,
{
    let Some(m) = objective_count(scores) else {
        return BTreeMap::new();
    };

    let entries: Vec<(&K, &[f64])> = scores.iter().map(|(k, o)| (k, o.as_ref())).collect();
    let n = entries.len();
    let mut distances = vec![0.0f64; n];

    for obj in 0..m {
        let value = |i: usize| nan_as_inf(entries[i].1[obj]);

        // stable: ties keep key order
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| value(a).total_cmp(&value(b)));

        distances[order[0]] = f64::INFINITY;
        distances[order[n - 1]] = f64::INFINITY;

        let range = finite_range(order.iter().map(|&i| value(i)));
        for w in order.windows(3) {
            let gap = value(w[2]) - value(w[0]);
            distances[w[1]] += normalised_gap(gap, range);
        }
    }

    entries
        .into_iter()
        .zip(distances)
        .map(|((k, _), d)| (k.clone(), d))
        .collect()
}

/// `max - min` over the finite values, or zero if there are none.
fn finite_range(values: impl Iterator<Item = f64>) -> f64 {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo <= hi {
        hi - lo
    } else {
        0.0
    }
}

fn normalised_gap(gap: f64, range: f64) -> f64 {
    if gap.is_nan() {
        0.0
    } else if gap.is_infinite() {
        f64::INFINITY
    } else if range > 0.0 {
        gap / range
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty() {
        let scores: BTreeMap<&str, [f64; 2]> = BTreeMap::new();
        assert!(crowding_distance_assignment(&scores).is_empty());
    }

    #[test]
    fn test_single_and_pair_are_boundaries() {
        let one = BTreeMap::from([("a", [1.0, 2.0])]);
        assert!(crowding_distance_assignment(&one)["a"].is_infinite());

        let two = BTreeMap::from([("a", [1.0, 3.0]), ("b", [3.0, 1.0])]);
        let d = crowding_distance_assignment(&two);
        assert!(d["a"].is_infinite() && d["b"].is_infinite());
    }

    #[test]
    fn test_evenly_spaced() {
        let scores = BTreeMap::from([
            (0, [0.0, 4.0]),
            (1, [1.0, 3.0]),
            (2, [2.0, 2.0]),
            (3, [3.0, 1.0]),
            (4, [4.0, 0.0]),
        ]);
        let d = crowding_distance_assignment(&scores);
        assert!(d[&0].is_infinite());
        assert!(d[&4].is_infinite());
        for i in 1..4 {
            // (2/4) per objective, two objectives
            assert!((d[&i] - 1.0).abs() < 1e-12, "{i}: {}", d[&i]);
        }
    }

    #[test]
    fn test_single_objective() {
        let scores = BTreeMap::from([("a", [5.0]), ("b", [1.0]), ("c", [2.0]), ("d", [4.0])]);
        let d = crowding_distance_assignment(&scores);
        assert!(d["a"].is_infinite());
        assert!(d["b"].is_infinite());
        // sorted: b(1) c(2) d(4) a(5), range 4
        assert!((d["c"] - 0.75).abs() < 1e-12);
        assert!((d["d"] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_fully_tied_objective_contributes_zero() {
        let scores = BTreeMap::from([("a", [1.0, 5.0]), ("b", [2.0, 5.0]), ("c", [3.0, 5.0])]);
        let d = crowding_distance_assignment(&scores);
        assert!(d["a"].is_infinite());
        assert!(d["c"].is_infinite());
        assert!((d["b"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_identical() {
        let scores = BTreeMap::from([("a", [2.0, 2.0]), ("b", [2.0, 2.0]), ("c", [2.0, 2.0])]);
        let d = crowding_distance_assignment(&scores);
        // first and last in key order are boundaries, the middle is fully crowded
        assert!(d["a"].is_infinite());
        assert!(d["c"].is_infinite());
        assert_eq!(d["b"], 0.0);
    }

    #[test]
    fn test_infinite_values() {
        let scores = BTreeMap::from([
            ("a", [0.0]),
            ("b", [1.0]),
            ("c", [2.0]),
            ("d", [f64::INFINITY]),
            ("e", [f64::INFINITY]),
            ("f", [f64::NAN]),
        ]);
        let d = crowding_distance_assignment(&scores);
        assert!(d.values().all(|v| !v.is_nan() && *v >= 0.0));
        assert!(d["a"].is_infinite());
        assert!(d["f"].is_infinite());
        // normalised by the finite range 0..2
        assert!((d["b"] - 1.0).abs() < 1e-12);
        // next to an infinite neighbour
        assert!(d["c"].is_infinite());
        assert!(d["d"].is_infinite());
        // between two infinite neighbours
        assert_eq!(d["e"], 0.0);
    }

    proptest! {
        #[test]
        fn prop_extremes_infinite_interior_non_negative(
            values in prop::collection::btree_map(0u32..500, -50.0..50.0f64, 1..30)
        ) {
            let scores: BTreeMap<u32, [f64; 1]> = values.iter().map(|(&k, &v)| (k, [v])).collect();
            let d = crowding_distance_assignment(&scores);
            prop_assert_eq!(d.len(), scores.len());

            let min = values.values().copied().fold(f64::INFINITY, f64::min);
            let max = values.values().copied().fold(f64::NEG_INFINITY, f64::max);
            let min_key = values.iter().find(|e| *e.1 == min).map(|e| *e.0).unwrap();
            let max_key = values.iter().rev().find(|e| *e.1 == max).map(|e| *e.0).unwrap();
            prop_assert!(d[&min_key].is_infinite());
            prop_assert!(d[&max_key].is_infinite());
            prop_assert!(d.values().all(|v| *v >= 0.0));
        }
    }
}
