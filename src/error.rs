//! Crate-level error type.

use crate::compute::Algorithm;
use crate::schema::ConfigError;

/// Errors raised by `init`/`step`. All of them are caller defects: nothing
/// here is worth retrying.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EaError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Population has {actual} individuals, configuration expects {expected}")]
    PopulationSizeMismatch { expected: usize, actual: usize },
    #[error("Individual {id} has {actual} genes, configuration expects {expected}")]
    GeneLengthMismatch {
        id: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Individual {id} gene {index} is {value}, knapsack genes must be 0 or 1")]
    InvalidGene { id: usize, index: usize, value: u8 },
    #[error("{algorithm} cannot step a {found} population")]
    PopulationKindMismatch {
        algorithm: Algorithm,
        found: &'static str,
    },
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}
