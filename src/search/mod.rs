//! Evolutionary search loop.
//!
//! A resumable genetic programming loop that keeps a population of scored
//! programs and culls it with NSGA-II after every generation. Callers either
//! drive it one generation at a time with [`Search::step`], or let
//! [`Search::run`] apply a generation, time and stagnation budget.
//!
//! # Key Types
//!
//! - [`SearchConfig`]: population size, stopping policy, presets
//! - [`Selection`]: parent selection by crowded tournament or uniformly
//! - [`Search`]: owns the population; single step, full run, results
//! - [`SearchResult`]: the final front with run statistics
//!
//! # References
//!
//! - Koza (1992), *Genetic Programming*
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*

mod config;
mod runner;
mod selection;
mod types;

pub use config::SearchConfig;
pub use runner::Search;
pub use selection::Selection;
pub use types::{ParetoRecord, SearchResult, StopReason};
