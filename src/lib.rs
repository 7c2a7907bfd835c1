//! Evolab - Generation-by-generation evolutionary computation for teaching.
//!
//! This crate implements the generation-step engine behind an interactive
//! visualizer for five classic algorithms: a knapsack Genetic Algorithm,
//! Differential Evolution, Particle Swarm Optimization, a self-adaptive
//! Evolution Strategy and linear Genetic Programming. Every step returns a
//! brand-new population together with a structured log of what each
//! reproduction event did, ready to be tabulated or plotted.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, population and step-log types
//! - `compute`: Fitness functions, randomness and the reproduction operators
//!
//! # Example
//!
//! ```rust,no_run
//! use evolab::{Algorithm, EAConfig, EaRng};
//!
//! // Adjust the genome length to the algorithm's encoding
//! let config = Algorithm::De.reconcile(&EAConfig::default());
//! let mut rng = EaRng::new(42);
//!
//! let mut population = Algorithm::De.init(&config, &mut rng)?;
//! for _ in 0..config.max_generations {
//!     let outcome = Algorithm::De.step(&population, &config, &mut rng)?;
//!     println!("{} trial vectors evaluated", outcome.log.len());
//!     population = outcome.next_population;
//! }
//! # Ok::<(), evolab::EaError>(())
//! ```

pub mod compute;
pub mod error;
pub mod schema;

// Re-export commonly used types
pub use compute::{Algorithm, EaRng, RandomSource, Runner, StepOutcome, decode_expression};
pub use error::EaError;
pub use schema::{EAConfig, Population, StepLog};
