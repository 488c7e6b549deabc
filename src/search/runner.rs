//! Evolutionary loop execution.
//!
//! [`Search`] owns the scored population and advances it one generation at a
//! time: select parents → mutate → score offspring → merge → cull.

use super::config::SearchConfig;
use super::selection::standings;
use super::types::{ParetoRecord, SearchResult, StopReason};
use crate::error::{EvalError, SearchError};
use crate::fitness::{fitness, Score};
use crate::pareto::{cull, fast_non_dominated_sort};
use crate::program::{Program, Value};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A resumable symbolic regression search over a fixed dataset.
///
/// The population maps each distinct [`Program`] to its [`Score`]. Every
/// call to [`step`](Self::step) runs exactly one generation, so callers can
/// interleave their own stopping checks; [`run`](Self::run) applies the
/// stopping policy from [`SearchConfig`].
///
/// # Usage
///
/// ```
/// use symreg::search::{Search, SearchConfig};
///
/// let x = vec![vec![0.0, 1.0, 2.0, 3.0]];
/// let y = vec![1.0, 2.0, 3.0, 4.0];
/// let config = SearchConfig::default().with_max_generations(20).with_seed(42);
///
/// let mut search = Search::new(config, x, y).unwrap();
/// let result = search.run();
/// assert_eq!(result.generations, 20);
/// assert!(!result.front.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Search {
    config: SearchConfig,
    x: Vec<Vec<f64>>,
    y: Vec<f64>,
    population: BTreeMap<Program, Score>,
    steps_taken: usize,
    stagnated_generations: usize,
    last_front: Vec<ParetoRecord>,
    rng: StdRng,
}

impl Search {
    /// Validates the inputs and scores an initial population of single leaves.
    ///
    /// `x` holds one row per variable, each as long as `y`. Programs may
    /// reference variables `$0 .. $(x.len() - 1)`.
    pub fn new(config: SearchConfig, x: Vec<Vec<f64>>, y: Vec<f64>) -> Result<Self, SearchError> {
        config.validate()?;
        if y.is_empty() {
            return Err(SearchError::EmptyTarget);
        }
        if let Some((variable, row)) = x.iter().enumerate().find(|(_, row)| row.len() != y.len()) {
            return Err(SearchError::RaggedData {
                variable,
                expected: y.len(),
                found: row.len(),
            });
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        log::info!(
            "starting search: {} variable(s), {} sample(s), population {}, seed {seed}",
            x.len(),
            y.len(),
            config.population_size
        );

        let max_arity = x.len();
        let leaves: BTreeSet<Program> = (0..config.population_size)
            .map(|_| Program::from_valid(vec![config.mutation.fresh_leaf(max_arity, &mut rng)], max_arity))
            .collect();
        let population = score_all(leaves.into_iter().collect(), &x, &y, config.parallel)
            .into_iter()
            .collect();

        let mut search = Self {
            config,
            x,
            y,
            population,
            steps_taken: 0,
            stagnated_generations: 0,
            last_front: Vec::new(),
            rng,
        };
        search.last_front = search.results();
        Ok(search)
    }

    /// Runs one generation.
    ///
    /// Breeds `population_size` offspring by mutating selected parents, scores
    /// the ones not already present, and culls the merged pool back to
    /// `population_size`.
    pub fn step(&mut self) {
        let parents: Vec<&Program> = self.population.keys().collect();
        let standings = if self.config.selection.needs_standings() {
            standings(&self.population)
        } else {
            Vec::new()
        };

        let mut offspring = BTreeSet::new();
        for _ in 0..self.config.population_size {
            let idx = self
                .config
                .selection
                .select(parents.len(), &standings, &mut self.rng);
            let child = parents[idx].mutate(&self.config.mutation, &mut self.rng);
            if !self.population.contains_key(&child) {
                offspring.insert(child);
            }
        }

        let bred = offspring.len();
        let mut merged = self.population.clone();
        merged.extend(score_all(
            offspring.into_iter().collect(),
            &self.x,
            &self.y,
            self.config.parallel,
        ));
        self.population = cull(&merged, self.config.population_size);
        self.steps_taken += 1;

        let front = self.results();
        if front == self.last_front {
            self.stagnated_generations += 1;
        } else {
            self.stagnated_generations = 0;
            self.last_front = front;
        }

        log::debug!(
            "generation {}: {} new offspring, front size {}, best error {}",
            self.steps_taken,
            bred,
            self.last_front.len(),
            self.last_front.iter().map(|r| r.error).fold(f64::INFINITY, f64::min)
        );
    }

    /// Runs until a stopping condition from the configuration holds.
    pub fn run(&mut self) -> SearchResult {
        self.run_with_cancel(None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// Stopping conditions are checked before every generation, so a run
    /// whose conditions already hold takes no steps. The generation budget
    /// counts every step since creation, including manual ones; the time
    /// budget applies to this call only.
    pub fn run_with_cancel(&mut self, cancel: Option<Arc<AtomicBool>>) -> SearchResult {
        let start = Instant::now();
        let first_step = self.steps_taken;

        let stop_reason = loop {
            if let Some(reason) = self.stop_reason(start.elapsed(), cancel.as_deref()) {
                break reason;
            }
            self.step();
        };

        let result = SearchResult {
            front: self.results(),
            generations: self.steps_taken,
            steps_this_run: self.steps_taken - first_step,
            stagnated_generations: self.stagnated_generations,
            elapsed: start.elapsed(),
            stop_reason,
        };
        log::info!(
            "search stopped ({:?}) after {} generation(s) in {:?}; front size {}",
            result.stop_reason,
            result.generations,
            result.elapsed,
            result.front.len()
        );
        result
    }

    fn stop_reason(&self, elapsed: Duration, cancel: Option<&AtomicBool>) -> Option<StopReason> {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Some(StopReason::Cancelled);
        }
        if self
            .config
            .max_generations
            .is_some_and(|max| self.steps_taken >= max)
        {
            return Some(StopReason::GenerationLimit);
        }
        if self
            .config
            .time_limit_ms
            .is_some_and(|ms| elapsed >= Duration::from_millis(ms))
        {
            return Some(StopReason::TimeLimit);
        }
        if self
            .config
            .stagnation_limit
            .is_some_and(|limit| self.stagnated_generations >= limit)
        {
            return Some(StopReason::Stagnated);
        }
        None
    }

    /// The first Pareto front of the current population, by ascending complexity.
    pub fn results(&self) -> Vec<ParetoRecord> {
        let fronts = fast_non_dominated_sort(&self.population);
        let mut front: Vec<ParetoRecord> = fronts
            .get(&1)
            .into_iter()
            .flatten()
            .map(|p| ParetoRecord::new(p, &self.population[p]))
            .collect();
        front.sort_by_key(|r| r.complexity);
        front
    }

    /// The first-front member with the lowest error; the simplest on ties.
    pub fn best(&self) -> Option<ParetoRecord> {
        self.results()
            .into_iter()
            .min_by(|a, b| a.error.total_cmp(&b.error))
    }

    /// Evaluates [`best`](Self::best) on new data.
    ///
    /// Returns `None` only for an empty population.
    pub fn predict(&self, x: Option<&[Vec<f64>]>) -> Option<Result<Value, EvalError>> {
        self.best().map(|record| record.program.eval(x))
    }

    /// Number of generations run so far.
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Consecutive generations that left the first front unchanged.
    pub fn stagnated_generations(&self) -> usize {
        self.stagnated_generations
    }

    /// The current scored population.
    pub fn population(&self) -> &BTreeMap<Program, Score> {
        &self.population
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

/// Scores `programs`, preserving their order.
#[cfg(feature = "parallel")]
fn score_all(programs: Vec<Program>, x: &[Vec<f64>], y: &[f64], parallel: bool) -> Vec<(Program, Score)> {
    if parallel {
        programs
            .into_par_iter()
            .map(|p| {
                let score = fitness(&p, Some(x), y);
                (p, score)
            })
            .collect()
    } else {
        score_sequential(programs, x, y)
    }
}

/// Scores `programs`, preserving their order.
#[cfg(not(feature = "parallel"))]
fn score_all(programs: Vec<Program>, x: &[Vec<f64>], y: &[f64], _parallel: bool) -> Vec<(Program, Score)> {
    score_sequential(programs, x, y)
}

fn score_sequential(programs: Vec<Program>, x: &[Vec<f64>], y: &[f64]) -> Vec<(Program, Score)> {
    programs
        .into_iter()
        .map(|p| {
            let score = fitness(&p, Some(x), y);
            (p, score)
        })
        .collect()
}
