//! NSGA-II survivor selection.

use super::{crowding_distance_assignment, fast_non_dominated_sort};
use std::collections::BTreeMap;

/// Shrinks a scored population to at most `n_out` survivors.
///
/// Fronts are admitted in rank order, each sorted by descending crowding
/// distance, until `n_out` individuals are collected; the last admitted front
/// is cut so that its most isolated members survive. Scores are returned
/// unchanged.
///
/// The crowding distance is computed once over the whole input population
/// rather than separately for each front.
///
/// # Guarantees
///
/// - the output holds `min(n_out, population.len())` entries
/// - output keys are a subset of input keys
/// - front 1 survives entirely whenever `n_out >= |front 1|`
///
/// # Panics
///
/// Panics if objective tuples differ in length.
pub fn cull<K, O>(population: &BTreeMap<K, O>, n_out: usize) -> BTreeMap<K, O>
where
    K: Ord + Clone,
    O: AsRef<[f64]> + Clone,
{
    if n_out >= population.len() {
        return population.clone();
    }

    let fronts = fast_non_dominated_sort(population);
    let crowding = crowding_distance_assignment(population);

    let mut survivors: Vec<&K> = Vec::with_capacity(population.len());
    for members in fronts.values() {
        let mut members: Vec<&K> = members.iter().collect();
        // stable: equal distances keep key order
        members.sort_by(|a, b| crowding[*b].total_cmp(&crowding[*a]));
        survivors.extend(members);
        if survivors.len() >= n_out {
            break;
        }
    }
    survivors.truncate(n_out);

    log::trace!(
        "cull kept {} of {} across {} front(s)",
        survivors.len(),
        population.len(),
        fronts.len()
    );

    survivors
        .into_iter()
        .map(|k| (k.clone(), population[k].clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn keys<O>(map: &BTreeMap<&'static str, O>) -> Vec<&'static str> {
        map.keys().copied().collect()
    }

    #[test]
    fn test_keeps_first_front() {
        let pop = BTreeMap::from([("A", [1.0, 2.0]), ("B", [2.0, 1.0]), ("C", [3.0, 3.0])]);
        assert_eq!(keys(&cull(&pop, 2)), vec!["A", "B"]);
    }

    #[test]
    fn test_n_out_at_least_population_is_identity() {
        let pop = BTreeMap::from([("A", [1.0, 2.0]), ("B", [2.0, 1.0]), ("C", [3.0, 3.0])]);
        assert_eq!(cull(&pop, 3), pop);
        assert_eq!(cull(&pop, 10), pop);
    }

    #[test]
    fn test_zero_and_empty() {
        let pop = BTreeMap::from([("A", [1.0, 2.0])]);
        assert!(cull(&pop, 0).is_empty());
        let empty: BTreeMap<&str, [f64; 2]> = BTreeMap::new();
        assert!(cull(&empty, 5).is_empty());
    }

    #[test]
    fn test_boundary_front_prefers_isolated() {
        // front 1: a, b, c, d, e on a line; f is dominated
        let pop = BTreeMap::from([
            ("a", [0.0, 4.0]),
            ("b", [1.0, 3.0]),
            ("c", [1.1, 2.9]),
            ("d", [3.0, 1.0]),
            ("e", [4.0, 0.0]),
            ("f", [5.0, 5.0]),
        ]);
        // a and e are the front's extremes; f is a global extreme but in front 2
        let out = cull(&pop, 3);
        assert_eq!(out.len(), 3);
        assert!(out.contains_key("a"));
        assert!(out.contains_key("e"));
        assert!(!out.contains_key("f"));
        // b and c crowd each other; d is the most isolated interior member
        assert!(out.contains_key("d"));
    }

    #[test]
    fn test_second_front_partially_admitted() {
        let pop = BTreeMap::from([
            ("a", [1.0, 1.0]),
            ("b", [2.0, 5.0]),
            ("c", [3.0, 3.0]),
            ("d", [5.0, 2.0]),
            ("e", [9.0, 9.0]),
        ]);
        let out = cull(&pop, 3);
        assert_eq!(out.len(), 3);
        assert!(out.contains_key("a"));
        assert!(!out.contains_key("e"));
        // b and d are more isolated than c in the global crowding map
        assert!(out.contains_key("b") && out.contains_key("d"));
    }

    #[test]
    fn test_crowding_measured_over_whole_population() {
        // e stretches the error axis, which shrinks b's and c's error gaps.
        // Across the whole population b (~0.55) is more isolated than c (~0.46);
        // within front 1 alone the order would flip (c 1.4, b 1.1).
        let pop = BTreeMap::from([
            ("a", [0.0, 10.0]),
            ("b", [1.0, 5.0]),
            ("c", [5.0, 4.0]),
            ("d", [10.0, 0.0]),
            ("e", [1000.0, 11.0]),
        ]);
        assert_eq!(keys(&cull(&pop, 3)), vec!["a", "b", "d"]);
    }

    #[test]
    fn test_scores_unchanged() {
        let pop = BTreeMap::from([("x", vec![0.5, 3.0]), ("y", vec![0.1, 9.0]), ("z", vec![1.0, 10.0])]);
        let out = cull(&pop, 2);
        for (k, v) in &out {
            assert_eq!(&pop[k], v);
        }
    }

    proptest! {
        #[test]
        fn prop_cull_laws(
            points in prop::collection::btree_map(0u32..1000, (0.0..10.0f64, 1u32..15), 0..40),
            n_out in 0usize..50,
        ) {
            let pop: BTreeMap<u32, [f64; 2]> = points
                .into_iter()
                .map(|(k, (e, c))| (k, [e, f64::from(c)]))
                .collect();
            let out = cull(&pop, n_out);

            prop_assert_eq!(out.len(), n_out.min(pop.len()));
            prop_assert!(out.keys().all(|k| pop.contains_key(k)));
            if n_out >= pop.len() {
                prop_assert_eq!(&out, &pop);
            }

            let fronts = fast_non_dominated_sort(&pop);
            if let Some(first) = fronts.get(&1) {
                if n_out >= first.len() {
                    let kept: BTreeSet<u32> = out.keys().copied().collect();
                    prop_assert!(first.is_subset(&kept));
                }
            }
        }
    }
}
