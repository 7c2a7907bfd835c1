//! Schema module - Configuration, population and log types for evolutionary runs.

mod config;
mod population;
mod step_log;

pub use config::*;
pub use population::*;
pub use step_log::*;
