//! Differential evolution (DE/rand/1/bin) on Sphere or Ackley (minimize).

use crate::error::EaError;
use crate::schema::{DOMAIN_MAX, DOMAIN_MIN, DeLogEntry, EAConfig, Individual, RealValuedIndividual};

use super::problems::real_fitness;
use super::random::RandomSource;
use super::registry::{Algorithm, check_population};

/// Uniform real genes in the search domain.
pub fn init<R: RandomSource + ?Sized>(
    config: &EAConfig,
    rng: &mut R,
) -> Result<Vec<RealValuedIndividual>, EaError> {
    config.validate_for(Algorithm::De)?;

    Ok((0..config.population_size)
        .map(|id| {
            let genes: Vec<f64> = (0..config.genes_count)
                .map(|_| DOMAIN_MIN + rng.random_uniform() * (DOMAIN_MAX - DOMAIN_MIN))
                .collect();
            let fitness = real_fitness(config.problem_type, &genes);
            Individual::new(id, genes, fitness)
        })
        .collect())
}

/// One generation. Each slot is replaced by its trial vector only when the
/// trial is at least as good, so no slot ever gets worse.
pub fn step<R: RandomSource + ?Sized>(
    population: &[RealValuedIndividual],
    config: &EAConfig,
    rng: &mut R,
) -> Result<(Vec<RealValuedIndividual>, Vec<DeLogEntry>), EaError> {
    config.validate_for(Algorithm::De)?;
    check_population(population, config)?;

    let mut next = Vec::with_capacity(population.len());
    let mut entries = Vec::with_capacity(population.len());

    for (i, target) in population.iter().enumerate() {
        let [r1, r2, r3] = pick_donors(i, population.len(), rng);
        let (base, a, b) = (&population[r1], &population[r2], &population[r3]);

        let difference: Vec<f64> = a.genes.iter().zip(&b.genes).map(|(x, y)| x - y).collect();
        let j_rand = rng.random_index(config.genes_count);
        let trial: Vec<f64> = target
            .genes
            .iter()
            .enumerate()
            .map(|(j, &current)| {
                let mutant = (base.genes[j] + config.f * difference[j]).clamp(DOMAIN_MIN, DOMAIN_MAX);
                if rng.random_uniform() < config.crossover_rate || j == j_rand {
                    mutant
                } else {
                    current
                }
            })
            .collect();

        let trial_fitness = real_fitness(config.problem_type, &trial);
        let accepted = trial_fitness <= target.fitness;
        log::trace!(
            "DE target {i}: donors ({r1}, {r2}, {r3}) trial {trial_fitness} vs {} -> {}",
            target.fitness,
            if accepted { "accept" } else { "reject" }
        );

        entries.push(DeLogEntry {
            id: i,
            donors: [base.id, a.id, b.id],
            difference,
            trial: trial.clone(),
            trial_fitness,
            target_fitness: target.fitness,
            accepted,
        });
        next.push(if accepted {
            Individual::new(i, trial, trial_fitness)
        } else {
            Individual::new(i, target.genes.clone(), target.fitness)
        });
    }

    Ok((next, entries))
}

/// Three distinct indices, all different from `target`.
fn pick_donors<R: RandomSource + ?Sized>(target: usize, len: usize, rng: &mut R) -> [usize; 3] {
    let mut picked = [target; 3];
    for slot in 0..3 {
        picked[slot] = loop {
            let candidate = rng.random_index(len);
            if candidate != target && !picked[..slot].contains(&candidate) {
                break candidate;
            }
        };
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::random::EaRng;
    use crate::schema::ProblemType;
    use proptest::prelude::*;

    fn scenario() -> (Vec<RealValuedIndividual>, EAConfig) {
        let config = EAConfig {
            population_size: 4,
            genes_count: 2,
            f: 0.5,
            crossover_rate: 0.9,
            problem_type: ProblemType::Sphere,
            ..Default::default()
        };
        let pop = [[1.0, 1.0], [2.0, 2.0], [-1.0, -1.0], [0.0, 0.0]]
            .iter()
            .enumerate()
            .map(|(id, g)| Individual::new(id, g.to_vec(), real_fitness(config.problem_type, g)))
            .collect();
        (pop, config)
    }

    #[test]
    fn test_scenario_fitness() {
        let (pop, _) = scenario();
        let fitness: Vec<f64> = pop.iter().map(|i| i.fitness).collect();
        assert_eq!(fitness, vec![2.0, 8.0, 2.0, 0.0]);
    }

    #[test]
    fn test_scenario_step_never_worsens() {
        let (pop, config) = scenario();
        for seed in 0..20 {
            let mut rng = EaRng::new(seed);
            let (next, log) = step(&pop, &config, &mut rng).unwrap();
            assert_eq!(next.len(), 4);
            assert_eq!(log.len(), 4);
            for ((before, after), entry) in pop.iter().zip(&next).zip(&log) {
                assert!(after.fitness <= before.fitness);
                assert!(!entry.donors.contains(&entry.id));
                assert_eq!(entry.accepted, after.genes == entry.trial);
            }
        }
    }

    #[test]
    fn test_donors_distinct() {
        let mut rng = EaRng::new(9);
        for target in 0..4 {
            let [a, b, c] = pick_donors(target, 4, &mut rng);
            assert!(a != b && b != c && a != c);
            assert!(![a, b, c].contains(&target));
        }
    }

    #[test]
    fn test_zero_crossover_rate_takes_one_mutant_gene() {
        let (pop, config) = scenario();
        let config = EAConfig {
            crossover_rate: 0.0,
            ..config
        };
        let mut rng = EaRng::new(4);
        let (_, log) = step(&pop, &config, &mut rng).unwrap();
        for (entry, target) in log.iter().zip(&pop) {
            let differing = entry.trial.iter().zip(&target.genes).filter(|(a, b)| a != b).count();
            assert!(differing <= 1);
        }
    }

    #[test]
    fn test_init_in_domain() {
        let config = EAConfig {
            problem_type: ProblemType::Ackley,
            ..Default::default()
        };
        let mut rng = EaRng::new(2);
        let pop = init(&config, &mut rng).unwrap();
        assert_eq!(pop.len(), config.population_size);
        assert!(pop.iter().flat_map(|i| &i.genes).all(|g| (DOMAIN_MIN..=DOMAIN_MAX).contains(g)));
    }

    #[test]
    fn test_too_small_population_fails_fast() {
        let config = EAConfig {
            population_size: 3,
            ..Default::default()
        };
        let mut rng = EaRng::new(2);
        assert!(matches!(init(&config, &mut rng), Err(EaError::Config(_))));
    }

    proptest! {
        #[test]
        fn prop_greedy_acceptance(seed in any::<u64>(), ackley in any::<bool>()) {
            let config = EAConfig {
                population_size: 6,
                genes_count: 3,
                problem_type: if ackley { ProblemType::Ackley } else { ProblemType::Sphere },
                ..Default::default()
            };
            let mut rng = EaRng::new(seed);
            let pop = init(&config, &mut rng).unwrap();
            let (next, _) = step(&pop, &config, &mut rng).unwrap();
            prop_assert_eq!(next.len(), pop.len());
            for (before, after) in pop.iter().zip(&next) {
                prop_assert!(after.fitness <= before.fitness);
            }
        }
    }
}
