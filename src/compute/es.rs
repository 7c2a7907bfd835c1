//! Self-adaptive evolution strategy on Sphere or Ackley (minimize).
//!
//! Each individual carries its own step size. Offspring first mutate the
//! step size log-normally, then perturb every gene with the new one:
//!
//! ```text
//! sigma' = sigma * exp(tau * N(0, 1))
//! gene'  = gene + sigma' * N(0, 1)
//! ```
//!
//! Survivors are the best `populationSize` of parents + offspring
//! ("plus", default) or of offspring alone ("comma").

use crate::error::EaError;
use crate::schema::{
    DOMAIN_MAX, DOMAIN_MIN, EAConfig, EsLogEntry, EsSelection, Individual, StrategyIndividual,
    StrategyParams,
};

use super::problems::real_fitness;
use super::random::RandomSource;
use super::registry::{Algorithm, check_population};

/// Floor for the step size so it can never collapse to zero.
pub const MIN_SIGMA: f64 = 1e-6;

/// Uniform real genes, every individual starting at the configured sigma.
pub fn init<R: RandomSource + ?Sized>(
    config: &EAConfig,
    rng: &mut R,
) -> Result<Vec<StrategyIndividual>, EaError> {
    config.validate_for(Algorithm::Es)?;

    Ok((0..config.population_size)
        .map(|id| {
            let genes: Vec<f64> = (0..config.genes_count)
                .map(|_| DOMAIN_MIN + rng.random_uniform() * (DOMAIN_MAX - DOMAIN_MIN))
                .collect();
            let fitness = real_fitness(config.problem_type, &genes);
            Individual {
                id,
                genes,
                fitness,
                ext: StrategyParams {
                    sigma: config.sigma,
                },
            }
        })
        .collect())
}

/// Produce `offspringSize` mutants and keep the best `populationSize`.
pub fn step<R: RandomSource + ?Sized>(
    population: &[StrategyIndividual],
    config: &EAConfig,
    rng: &mut R,
) -> Result<(Vec<StrategyIndividual>, Vec<EsLogEntry>), EaError> {
    config.validate_for(Algorithm::Es)?;
    check_population(population, config)?;

    let tau = config.es_tau();
    let mut offspring = Vec::with_capacity(config.offspring_size);
    let mut entries = Vec::with_capacity(config.offspring_size);

    for k in 0..config.offspring_size {
        let parent = &population[rng.random_index(population.len())];
        let sigma = (parent.ext.sigma * (tau * rng.random_gaussian(0.0, 1.0)).exp()).max(MIN_SIGMA);
        let genes: Vec<f64> = parent
            .genes
            .iter()
            .map(|g| (g + sigma * rng.random_gaussian(0.0, 1.0)).clamp(DOMAIN_MIN, DOMAIN_MAX))
            .collect();
        let fitness = real_fitness(config.problem_type, &genes);

        entries.push(EsLogEntry {
            offspring: k,
            parent: parent.id,
            parent_sigma: parent.ext.sigma,
            sigma,
            genes: genes.clone(),
            fitness,
            survived_as: None,
        });
        offspring.push(Individual {
            id: k,
            genes,
            fitness,
            ext: StrategyParams { sigma },
        });
    }

    // Pool entries remember which offspring (if any) they came from.
    let mut pool: Vec<(Option<usize>, StrategyIndividual)> = match config.es_selection {
        EsSelection::Plus => population
            .iter()
            .map(|p| (None, p.clone()))
            .chain(offspring.into_iter().map(|o| (Some(o.id), o)))
            .collect(),
        EsSelection::Comma => offspring.into_iter().map(|o| (Some(o.id), o)).collect(),
    };
    pool.sort_by(|a, b| a.1.fitness.total_cmp(&b.1.fitness));
    pool.truncate(config.population_size);

    let next: Vec<StrategyIndividual> = pool
        .into_iter()
        .enumerate()
        .map(|(id, (origin, individual))| {
            if let Some(k) = origin {
                entries[k].survived_as = Some(id);
            }
            Individual { id, ..individual }
        })
        .collect();

    log::trace!(
        "ES: {} of {} offspring survived",
        entries.iter().filter(|e| e.survived_as.is_some()).count(),
        entries.len()
    );

    Ok((next, entries))
}
