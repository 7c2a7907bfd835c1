//! Configuration types for evolutionary runs.

use serde::{Deserialize, Serialize};

use crate::compute::Algorithm;

/// Lower bound of the real-valued search domain (Sphere/Ackley).
pub const DOMAIN_MIN: f64 = -5.0;
/// Upper bound of the real-valued search domain (Sphere/Ackley).
pub const DOMAIN_MAX: f64 = 5.0;

/// Top-level configuration shared by every algorithm.
///
/// Immutable for the duration of a run: algorithm modules only read it.
/// Field names serialize in camelCase so configurations written for the
/// browser visualizer load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EAConfig {
    /// Number of individuals per generation.
    pub population_size: usize,
    /// Length of each genome. Must match the encoding the algorithm expects.
    pub genes_count: usize,
    /// Generations the driver runs before stopping.
    pub max_generations: usize,
    /// Mutation probability (per gene for GA, per child for GP).
    pub mutation_rate: f64,
    /// Crossover probability (DE binomial crossover).
    pub crossover_rate: f64,
    /// DE differential weight.
    #[serde(rename = "F")]
    pub f: f64,
    /// PSO inertia weight.
    pub w: f64,
    /// PSO cognitive coefficient.
    pub c1: f64,
    /// PSO social coefficient.
    pub c2: f64,
    /// Benchmark used by DE, PSO and ES.
    pub problem_type: ProblemType,
    /// Target used by GP.
    pub gp_problem: GpProblem,
    /// Operation table indexed (modulo its length) by GP genes.
    pub gp_operations: Vec<GpOperation>,
    /// Items available to the GA knapsack.
    pub knapsack_items: Vec<KnapsackItem>,
    /// Knapsack weight limit (inclusive).
    pub knapsack_capacity: f64,
    /// GA tournament size.
    pub tournament_size: usize,
    /// ES offspring per generation (lambda).
    pub offspring_size: usize,
    /// ES initial mutation strength.
    pub sigma: f64,
    /// ES survivor selection.
    pub es_selection: EsSelection,
    /// ES learning rate. Defaults to `1 / sqrt(genesCount)`.
    pub tau: Option<f64>,
    /// Random seed for reproducibility.
    pub random_seed: Option<u64>,
}

impl Default for EAConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            genes_count: 2,
            max_generations: 20,
            mutation_rate: 0.1,
            crossover_rate: 0.7,
            f: 0.5,
            w: 0.5,
            c1: 1.5,
            c2: 1.5,
            problem_type: ProblemType::Sphere,
            gp_problem: GpProblem::Linear,
            gp_operations: GpOpKind::ALL.iter().map(|&kind| GpOperation::new(kind)).collect(),
            knapsack_items: default_knapsack_items(),
            knapsack_capacity: 15.0,
            tournament_size: 2,
            offspring_size: 20,
            sigma: 1.0,
            es_selection: EsSelection::Plus,
            tau: None,
            random_seed: None,
        }
    }
}

fn default_knapsack_items() -> Vec<KnapsackItem> {
    [(2.0, 3.0), (3.0, 4.0), (4.0, 5.0), (5.0, 8.0), (9.0, 10.0), (1.0, 1.0)]
        .into_iter()
        .map(|(weight, value)| KnapsackItem { weight, value })
        .collect()
}

/// Real-valued benchmark function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProblemType {
    #[default]
    #[serde(alias = "sphere")]
    Sphere,
    #[serde(alias = "ackley")]
    Ackley,
}

/// Symbolic regression target for GP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GpProblem {
    /// Drive the accumulator (starting at 50) to 0.
    #[default]
    Linear,
    /// Fit `sin(x)` on [0, 2π] starting from `x`.
    Sine,
}

/// Kind of a GP operation; decides how it transforms the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GpOpKind {
    #[serde(rename = "ADD_1")]
    Add1,
    #[serde(rename = "SUB_1")]
    Sub1,
    #[serde(rename = "SUB_10")]
    Sub10,
    #[serde(rename = "DIV_2")]
    Div2,
    #[serde(rename = "MUL_2")]
    Mul2,
    #[serde(rename = "ADD_X")]
    AddX,
    #[serde(rename = "SIN")]
    Sin,
    #[serde(rename = "COS")]
    Cos,
    #[serde(rename = "ADD_CONST")]
    AddConst,
    /// Unrecognized tag: leaves the accumulator unchanged.
    #[serde(other)]
    Nop,
}

impl GpOpKind {
    /// Every operation that has an effect, in table order.
    pub const ALL: [GpOpKind; 9] = [
        GpOpKind::Add1,
        GpOpKind::Sub1,
        GpOpKind::Sub10,
        GpOpKind::Div2,
        GpOpKind::Mul2,
        GpOpKind::AddX,
        GpOpKind::Sin,
        GpOpKind::Cos,
        GpOpKind::AddConst,
    ];

    /// Default display label.
    pub fn label(self) -> &'static str {
        match self {
            GpOpKind::Add1 => "+1",
            GpOpKind::Sub1 => "-1",
            GpOpKind::Sub10 => "-10",
            GpOpKind::Div2 => "/2",
            GpOpKind::Mul2 => "*2",
            GpOpKind::AddX => "+x",
            GpOpKind::Sin => "sin",
            GpOpKind::Cos => "cos",
            GpOpKind::AddConst => "+5",
            GpOpKind::Nop => "nop",
        }
    }
}

/// Entry of the GP operation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpOperation {
    #[serde(rename = "type")]
    pub kind: GpOpKind,
    pub label: String,
}

impl GpOperation {
    pub fn new(kind: GpOpKind) -> Self {
        Self {
            kind,
            label: kind.label().to_string(),
        }
    }
}

/// Item that may be packed into the knapsack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnapsackItem {
    pub weight: f64,
    pub value: f64,
}

/// Survivor selection for the evolution strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EsSelection {
    /// (mu + lambda): parents compete with offspring.
    #[default]
    Plus,
    /// (mu, lambda): only offspring survive.
    Comma,
}

impl EAConfig {
    /// ES learning rate, falling back to `1 / sqrt(genesCount)`.
    pub fn es_tau(&self) -> f64 {
        self.tau
            .unwrap_or_else(|| 1.0 / (self.genes_count.max(1) as f64).sqrt())
    }

    /// Validate configuration parameters for the given algorithm.
    ///
    /// Runs before any population is built so a bad configuration never
    /// yields a partial result.
    pub fn validate_for(&self, algorithm: Algorithm) -> Result<(), ConfigError> {
        let min_population = algorithm.min_population_size();
        if self.population_size < min_population {
            return Err(ConfigError::PopulationTooSmall {
                algorithm,
                min: min_population,
                actual: self.population_size,
            });
        }
        for (name, rate) in [
            ("mutationRate", self.mutation_rate),
            ("crossoverRate", self.crossover_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::InvalidRate { name, value: rate });
            }
        }

        match algorithm {
            Algorithm::Ga => {
                if self.genes_count != self.knapsack_items.len() {
                    return Err(ConfigError::GenesCountMismatch {
                        algorithm,
                        expected: self.knapsack_items.len(),
                        actual: self.genes_count,
                    });
                }
                if self.genes_count < 2 {
                    return Err(ConfigError::GenomeTooShort {
                        algorithm,
                        min: 2,
                        actual: self.genes_count,
                    });
                }
                if self.tournament_size == 0 {
                    return Err(ConfigError::InvalidTournamentSize);
                }
                if !(self.knapsack_capacity >= 0.0) {
                    return Err(ConfigError::InvalidCapacity(self.knapsack_capacity));
                }
                let bad_item = self.knapsack_items.iter().enumerate().find(|(_, item)| {
                    !(item.weight.is_finite() && item.weight >= 0.0 && item.value.is_finite())
                });
                if let Some((index, item)) = bad_item {
                    return Err(ConfigError::InvalidKnapsackItem {
                        index,
                        weight: item.weight,
                        value: item.value,
                    });
                }
            }
            Algorithm::Gp => {
                if self.genes_count < 2 {
                    return Err(ConfigError::GenomeTooShort {
                        algorithm,
                        min: 2,
                        actual: self.genes_count,
                    });
                }
            }
            Algorithm::De => {
                self.require_genes(algorithm)?;
                require_finite("F", self.f)?;
            }
            Algorithm::Pso => {
                self.require_genes(algorithm)?;
                require_finite("w", self.w)?;
                require_finite("c1", self.c1)?;
                require_finite("c2", self.c2)?;
            }
            Algorithm::Es => {
                self.require_genes(algorithm)?;
                if self.offspring_size == 0 {
                    return Err(ConfigError::NoOffspring);
                }
                if self.es_selection == EsSelection::Comma
                    && self.offspring_size < self.population_size
                {
                    return Err(ConfigError::TooFewOffspring {
                        offspring: self.offspring_size,
                        population: self.population_size,
                    });
                }
                if !(self.sigma.is_finite() && self.sigma > 0.0) {
                    return Err(ConfigError::InvalidSigma(self.sigma));
                }
                require_finite("tau", self.es_tau())?;
            }
        }
        Ok(())
    }

    fn require_genes(&self, algorithm: Algorithm) -> Result<(), ConfigError> {
        if self.genes_count == 0 {
            return Err(ConfigError::GenomeTooShort {
                algorithm,
                min: 1,
                actual: 0,
            });
        }
        Ok(())
    }
}

fn require_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFiniteCoefficient { name, value })
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{algorithm} needs a population of at least {min}, got {actual}")]
    PopulationTooSmall {
        algorithm: Algorithm,
        min: usize,
        actual: usize,
    },
    #[error("{algorithm} expects genesCount = {expected}, got {actual}")]
    GenesCountMismatch {
        algorithm: Algorithm,
        expected: usize,
        actual: usize,
    },
    #[error("{algorithm} needs at least {min} genes, got {actual}")]
    GenomeTooShort {
        algorithm: Algorithm,
        min: usize,
        actual: usize,
    },
    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidRate { name: &'static str, value: f64 },
    #[error("{name} must be finite, got {value}")]
    NonFiniteCoefficient { name: &'static str, value: f64 },
    #[error("Tournament size must be non-zero")]
    InvalidTournamentSize,
    #[error("Knapsack capacity must be non-negative, got {0}")]
    InvalidCapacity(f64),
    #[error("Knapsack item {index} has weight {weight} and value {value}; both must be finite, weight non-negative")]
    InvalidKnapsackItem { index: usize, weight: f64, value: f64 },
    #[error("ES offspring size must be non-zero")]
    NoOffspring,
    #[error("Comma selection needs offspringSize ({offspring}) >= populationSize ({population})")]
    TooFewOffspring { offspring: usize, population: usize },
    #[error("ES sigma must be positive and finite, got {0}")]
    InvalidSigma(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid_after_reconcile() {
        let config = EAConfig::default();
        for algorithm in Algorithm::ALL {
            let reconciled = algorithm.reconcile(&config);
            assert_eq!(reconciled.validate_for(algorithm), Ok(()), "{algorithm}");
        }
    }

    #[test]
    fn test_ga_genes_must_match_items() {
        let config = EAConfig {
            genes_count: 2,
            ..Default::default()
        };
        assert!(matches!(
            config.validate_for(Algorithm::Ga),
            Err(ConfigError::GenesCountMismatch { expected: 6, actual: 2, .. })
        ));
    }

    #[test]
    fn test_ga_rejects_bad_knapsack_items() {
        let base = EAConfig::default();
        for (weight, value) in [(f64::NAN, 1.0), (-1.0, 1.0), (1.0, f64::INFINITY)] {
            let mut config = base.clone();
            config.knapsack_items[2] = KnapsackItem { weight, value };
            assert!(matches!(
                config.validate_for(Algorithm::Ga),
                Err(ConfigError::InvalidKnapsackItem { index: 2, .. })
            ));
        }
        // Zero weight and negative value are allowed.
        let mut config = base;
        config.knapsack_items[0] = KnapsackItem {
            weight: 0.0,
            value: -3.0,
        };
        assert_eq!(config.validate_for(Algorithm::Ga), Ok(()));
    }

    #[test]
    fn test_zero_population_rejected() {
        let config = EAConfig {
            population_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate_for(Algorithm::Pso),
            Err(ConfigError::PopulationTooSmall { .. })
        ));
    }

    #[test]
    fn test_comma_selection_needs_offspring() {
        let config = EAConfig {
            es_selection: EsSelection::Comma,
            population_size: 10,
            offspring_size: 5,
            ..Default::default()
        };
        assert_eq!(
            config.validate_for(Algorithm::Es),
            Err(ConfigError::TooFewOffspring {
                offspring: 5,
                population: 10
            })
        );
    }

    #[test]
    fn test_gp_empty_operation_table_is_valid() {
        let config = EAConfig {
            gp_operations: Vec::new(),
            genes_count: 3,
            ..Default::default()
        };
        assert_eq!(config.validate_for(Algorithm::Gp), Ok(()));
    }

    #[test]
    fn test_json_uses_camel_case_field_names() {
        let json = r#"{
            "populationSize": 4,
            "genesCount": 3,
            "F": 0.8,
            "problemType": "ackley",
            "gpProblem": "Sine",
            "gpOperations": [
                {"type": "ADD_1", "label": "+1"},
                {"type": "SQRT", "label": "sqrt"}
            ],
            "knapsackItems": [{"weight": 2, "value": 3}],
            "esSelection": "comma"
        }"#;
        let config: EAConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.population_size, 4);
        assert_eq!(config.f, 0.8);
        assert_eq!(config.problem_type, ProblemType::Ackley);
        assert_eq!(config.gp_problem, GpProblem::Sine);
        assert_eq!(config.gp_operations[0].kind, GpOpKind::Add1);
        assert_eq!(config.gp_operations[1].kind, GpOpKind::Nop);
        assert_eq!(config.knapsack_items[0].weight, 2.0);
        assert_eq!(config.es_selection, EsSelection::Comma);
        // Unspecified fields keep their defaults.
        assert_eq!(config.w, 0.5);
    }

    #[test]
    fn test_default_tau() {
        let config = EAConfig {
            genes_count: 4,
            ..Default::default()
        };
        assert!((config.es_tau() - 0.5).abs() < 1e-12);
    }
}
