//! Algorithm registry: one entry point for `init`/`step` across all five
//! algorithms, plus the display metadata a driver needs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EaError;
use crate::schema::{EAConfig, FitnessDirection, GpProblem, Individual, Population, StepLog};

use super::random::RandomSource;
use super::{de, es, ga, gp, pso};

/// The evolutionary algorithms available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Algorithm {
    Ga,
    De,
    Pso,
    Gp,
    Es,
}

/// Result of one `step`: the next generation and what happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    pub next_population: Population,
    pub log: StepLog,
}

impl Algorithm {
    /// Registry order.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Ga,
        Algorithm::De,
        Algorithm::Pso,
        Algorithm::Gp,
        Algorithm::Es,
    ];

    /// Short identifier ("GA", "DE", ...).
    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Ga => "GA",
            Algorithm::De => "DE",
            Algorithm::Pso => "PSO",
            Algorithm::Gp => "GP",
            Algorithm::Es => "ES",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Algorithm::Ga => "Genetic Algorithm",
            Algorithm::De => "Differential Evolution",
            Algorithm::Pso => "Particle Swarm Optimization",
            Algorithm::Gp => "Genetic Programming",
            Algorithm::Es => "Evolution Strategies",
        }
    }

    /// GA maximizes knapsack value; everything else minimizes.
    pub fn fitness_direction(self) -> FitnessDirection {
        match self {
            Algorithm::Ga => FitnessDirection::Maximize,
            _ => FitnessDirection::Minimize,
        }
    }

    /// Genome length this algorithm expects under `config`.
    pub fn default_genes_count(self, config: &EAConfig) -> usize {
        match self {
            Algorithm::Ga => config.knapsack_items.len(),
            Algorithm::De | Algorithm::Pso | Algorithm::Es => 2,
            Algorithm::Gp => match config.gp_problem {
                GpProblem::Linear => 2,
                GpProblem::Sine => 5,
            },
        }
    }

    /// Smallest population the reproduction operator can work with.
    pub fn min_population_size(self) -> usize {
        match self {
            // Two elites.
            Algorithm::Ga | Algorithm::Gp => 2,
            // Target plus three distinct donors.
            Algorithm::De => 4,
            Algorithm::Pso | Algorithm::Es => 1,
        }
    }

    /// Copy of `config` with `genesCount` set to this algorithm's encoding.
    ///
    /// Drivers call this when switching algorithm or problem; `init` and
    /// `step` themselves never adjust the configuration.
    pub fn reconcile(self, config: &EAConfig) -> EAConfig {
        EAConfig {
            genes_count: self.default_genes_count(config),
            ..config.clone()
        }
    }

    /// Build generation 0.
    pub fn init<R: RandomSource + ?Sized>(
        self,
        config: &EAConfig,
        rng: &mut R,
    ) -> Result<Population, EaError> {
        let population = match self {
            Algorithm::Ga => Population::Knapsack(ga::init(config, rng)?),
            Algorithm::De => Population::RealValued(de::init(config, rng)?),
            Algorithm::Pso => Population::Swarm(pso::init(config, rng)?),
            Algorithm::Gp => Population::Program(gp::init(config, rng)?),
            Algorithm::Es => Population::Strategy(es::init(config, rng)?),
        };
        log::debug!(
            "{}: initialized {} individuals ({} genes)",
            self.id(),
            population.len(),
            config.genes_count
        );
        Ok(population)
    }

    /// Advance `population` by one generation. The input is left untouched.
    pub fn step<R: RandomSource + ?Sized>(
        self,
        population: &Population,
        config: &EAConfig,
        rng: &mut R,
    ) -> Result<StepOutcome, EaError> {
        let (next_population, log) = match (self, population) {
            (Algorithm::Ga, Population::Knapsack(p)) => {
                let (next, entries) = ga::step(p, config, rng)?;
                (Population::Knapsack(next), StepLog::Ga(entries))
            }
            (Algorithm::De, Population::RealValued(p)) => {
                let (next, entries) = de::step(p, config, rng)?;
                (Population::RealValued(next), StepLog::De(entries))
            }
            (Algorithm::Pso, Population::Swarm(p)) => {
                let (next, entries) = pso::step(p, config, rng)?;
                (Population::Swarm(next), StepLog::Pso(entries))
            }
            (Algorithm::Gp, Population::Program(p)) => {
                let (next, entries) = gp::step(p, config, rng)?;
                (Population::Program(next), StepLog::Gp(entries))
            }
            (Algorithm::Es, Population::Strategy(p)) => {
                let (next, entries) = es::step(p, config, rng)?;
                (Population::Strategy(next), StepLog::Es(entries))
            }
            (algorithm, population) => {
                return Err(EaError::PopulationKindMismatch {
                    algorithm,
                    found: population.kind(),
                });
            }
        };
        Ok(StepOutcome {
            next_population,
            log,
        })
    }
}

/// Fail fast when a population does not fit the configuration.
pub(crate) fn check_population<G, X>(
    population: &[Individual<G, X>],
    config: &EAConfig,
) -> Result<(), EaError> {
    if population.len() != config.population_size {
        return Err(EaError::PopulationSizeMismatch {
            expected: config.population_size,
            actual: population.len(),
        });
    }
    if let Some(bad) = population
        .iter()
        .find(|ind| ind.genes.len() != config.genes_count)
    {
        return Err(EaError::GeneLengthMismatch {
            id: bad.id,
            expected: config.genes_count,
            actual: bad.genes.len(),
        });
    }
    Ok(())
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = EaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| EaError::UnknownAlgorithm(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::random::EaRng;
    use proptest::prelude::*;

    #[test]
    fn test_parse_ids() {
        assert_eq!("pso".parse::<Algorithm>().unwrap(), Algorithm::Pso);
        assert_eq!("GA".parse::<Algorithm>().unwrap(), Algorithm::Ga);
        assert!(matches!(
            "SA".parse::<Algorithm>(),
            Err(EaError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn test_reconcile_sets_encoding() {
        let config = EAConfig {
            gp_problem: GpProblem::Sine,
            ..Default::default()
        };
        assert_eq!(Algorithm::Ga.reconcile(&config).genes_count, 6);
        assert_eq!(Algorithm::Gp.reconcile(&config).genes_count, 5);
        assert_eq!(Algorithm::Pso.reconcile(&config).genes_count, 2);
    }

    #[test]
    fn test_step_rejects_foreign_population() {
        let config = Algorithm::De.reconcile(&EAConfig::default());
        let mut rng = EaRng::new(1);
        let population = Algorithm::De.init(&config, &mut rng).unwrap();
        let err = Algorithm::Es.step(&population, &config, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            EaError::PopulationKindMismatch {
                algorithm: Algorithm::Es,
                found: "RealValued"
            }
        ));
    }

    #[test]
    fn test_step_leaves_input_untouched() {
        let mut rng = EaRng::new(8);
        for algorithm in Algorithm::ALL {
            let config = algorithm.reconcile(&EAConfig::default());
            let population = algorithm.init(&config, &mut rng).unwrap();
            let snapshot = population.clone();
            let outcome = algorithm.step(&population, &config, &mut rng).unwrap();
            assert_eq!(population, snapshot, "{algorithm}");
            assert!(!outcome.log.is_empty(), "{algorithm}");
        }
    }

    #[test]
    fn test_gene_length_mismatch() {
        let config = Algorithm::Pso.reconcile(&EAConfig::default());
        let mut rng = EaRng::new(2);
        let population = Algorithm::Pso.init(&config, &mut rng).unwrap();
        let wider = EAConfig {
            genes_count: 3,
            ..config
        };
        assert!(matches!(
            Algorithm::Pso.step(&population, &wider, &mut rng),
            Err(EaError::GeneLengthMismatch {
                expected: 3,
                actual: 2,
                ..
            })
        ));
    }

    proptest! {
        #[test]
        fn prop_population_size_invariance(seed in any::<u64>(), size in 4usize..16) {
            for algorithm in Algorithm::ALL {
                let config = EAConfig {
                    population_size: size,
                    ..algorithm.reconcile(&EAConfig::default())
                };
                let mut rng = EaRng::new(seed);
                let population = algorithm.init(&config, &mut rng).unwrap();
                prop_assert_eq!(population.len(), size);
                let outcome = algorithm.step(&population, &config, &mut rng).unwrap();
                prop_assert_eq!(outcome.next_population.len(), size);
            }
        }
    }
}
