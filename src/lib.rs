//! Symbolic regression by genetic programming.
//!
//! Searches for closed-form expressions that fit a dataset while staying
//! small, treating prediction error and expression size as two objectives
//! and keeping the Pareto-optimal trade-offs.
//!
//! - **Program**: immutable prefix-notation expression trees with
//!   vectorised evaluation and point, growth and shrink mutations.
//! - **Fitness**: maps a program to its (error, complexity) pair.
//! - **Pareto**: NSGA-II dominance, non-dominated sorting, crowding
//!   distance and survivor culling over any scored population.
//! - **Search**: a resumable evolutionary loop tying these together.
//!
//! # Example
//!
//! ```
//! use symreg::search::{Search, SearchConfig};
//!
//! let x = vec![vec![1.0, 2.0, 3.0, 4.0]];
//! let y = vec![2.0, 4.0, 6.0, 8.0];
//!
//! let config = SearchConfig::fast().with_max_generations(30).with_seed(1);
//! let mut search = Search::new(config, x, y).unwrap();
//! let result = search.run();
//!
//! for record in &result.front {
//!     println!("{record}");
//! }
//! ```
//!
//! # Features
//!
//! - `parallel` (default): score offspring with rayon
//! - `serde`: `Serialize`/`Deserialize` for configuration types and scores

pub mod error;
pub mod fitness;
pub mod pareto;
pub mod program;
pub mod search;
