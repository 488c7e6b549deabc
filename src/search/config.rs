//! Search configuration.
//!
//! [`SearchConfig`] holds every parameter of the evolutionary loop, including
//! the stopping policy used by [`Search::run`](super::Search::run).

use super::selection::Selection;
use crate::error::ConfigError;
use crate::program::MutationConfig;

/// Configuration for a symbolic regression search.
///
/// # Defaults
///
/// ```
/// use symreg::search::SearchConfig;
///
/// let config = SearchConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.max_generations, Some(100));
/// ```
///
/// # Builder Pattern
///
/// ```
/// use symreg::search::{SearchConfig, Selection};
///
/// let config = SearchConfig::default()
///     .with_population_size(200)
///     .with_selection(Selection::Tournament(3))
///     .with_stagnation_limit(25)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Number of programs kept after each cull.
    ///
    /// Each step breeds as many offspring as there are survivors, so the
    /// merged pool handed to `cull` is at most twice this size.
    pub population_size: usize,

    /// Total number of steps a full run may take.
    ///
    /// Counted from the creation of the search, so a run resumed after manual
    /// steps only takes the remainder. `None` disables the generation budget.
    pub max_generations: Option<usize>,

    /// Wall-clock budget of one call to `run`, in milliseconds.
    ///
    /// Checked between generations, so a run may overshoot by one step.
    pub time_limit_ms: Option<u64>,

    /// Consecutive steps with an unchanged first front before a run stops.
    pub stagnation_limit: Option<usize>,

    /// Parent selection strategy.
    pub selection: Selection,

    /// Whether offspring are scored in parallel using rayon.
    ///
    /// Has no effect without the `parallel` feature. Results are identical
    /// either way.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Mutation operator weights and literal spreads.
    pub mutation: MutationConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: Some(100),
            time_limit_ms: None,
            stagnation_limit: None,
            selection: Selection::default(),
            parallel: true,
            seed: None,
            mutation: MutationConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the generation budget.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = Some(n);
        self
    }

    /// Removes the generation budget.
    pub fn without_generation_limit(mut self) -> Self {
        self.max_generations = None;
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets the stagnation limit.
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = Some(limit);
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Equivalent to `.with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    /// Enables or disables parallel scoring.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the mutation configuration.
    pub fn with_mutation(mut self, mutation: MutationConfig) -> Self {
        self.mutation = mutation;
        self
    }

    /// Preset for quick exploratory fits.
    ///
    /// - Population: 30, Generations: 50, Time limit: 5s
    /// - Stagnation limit: 15
    pub fn fast() -> Self {
        Self {
            population_size: 30,
            max_generations: Some(50),
            stagnation_limit: Some(15),
            time_limit_ms: Some(5_000),
            ..Self::default()
        }
    }

    /// Preset trading fit quality against run time.
    ///
    /// - Population: 100, Generations: 300, Time limit: 30s
    /// - Stagnation limit: 50
    pub fn balanced() -> Self {
        Self {
            population_size: 100,
            max_generations: Some(300),
            stagnation_limit: Some(50),
            time_limit_ms: Some(30_000),
            ..Self::default()
        }
    }

    /// Preset for thorough searches over larger expression spaces.
    ///
    /// - Population: 200, Generations: 1000, Time limit: 120s
    /// - Stagnation limit: 150, max program size: 128
    pub fn quality() -> Self {
        Self {
            population_size: 200,
            max_generations: Some(1_000),
            stagnation_limit: Some(150),
            time_limit_ms: Some(120_000),
            mutation: MutationConfig::default().with_max_size(128),
            ..Self::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::PopulationTooSmall);
        }
        if self.selection == Selection::Tournament(0) {
            return Err(ConfigError::TournamentTooSmall);
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        if self.max_generations.is_none()
            && self.time_limit_ms.is_none()
            && self.stagnation_limit.is_none()
        {
            return Err(ConfigError::Unbounded);
        }
        self.mutation.validate()
    }
}
