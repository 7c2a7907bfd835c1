//! Compute module - Evaluators, randomness and the five reproduction operators.
//!
//! Each algorithm module exposes the same pair of pure functions:
//!
//! - `init(config, rng) -> population`
//! - `step(population, config, rng) -> (next_population, log)`
//!
//! [`Algorithm`] dispatches to them over the tagged [`Population`](crate::schema::Population),
//! and [`Runner`] is a ready-made driver that calls `step` in a loop.

pub mod de;
pub mod es;
pub mod ga;
pub mod gp;
pub mod problems;
pub mod pso;
mod random;
mod registry;
mod runner;
mod selection;

pub use problems::{KnapsackEvaluation, decode_expression};
pub use random::{EaRng, RandomSource};
pub use registry::{Algorithm, StepOutcome};
pub use runner::{RunHistory, RunProgress, RunSummary, Runner, StopReason};
