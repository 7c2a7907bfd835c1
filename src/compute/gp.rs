//! Linear genetic programming for symbolic regression (minimize).
//!
//! A genome is a sequence of indices into the operation table, applied left
//! to right to an accumulator (see [`evaluate_gp`](super::problems::evaluate_gp)).

use crate::error::EaError;
use crate::schema::{EAConfig, FitnessDirection, GpLogEntry, Individual, ProgramIndividual};

use super::problems::{decode_expression, gp_fitness};
use super::random::RandomSource;
use super::registry::{Algorithm, check_population};
use super::selection::{elites, single_point_crossover, tournament};

/// Random programs. With an empty operation table every gene is 0.
pub fn init<R: RandomSource + ?Sized>(
    config: &EAConfig,
    rng: &mut R,
) -> Result<Vec<ProgramIndividual>, EaError> {
    config.validate_for(Algorithm::Gp)?;
    let op_count = config.gp_operations.len();

    Ok((0..config.population_size)
        .map(|id| {
            let genes: Vec<usize> = (0..config.genes_count)
                .map(|_| {
                    if op_count > 0 {
                        rng.random_index(op_count)
                    } else {
                        0
                    }
                })
                .collect();
            let fitness = gp_fitness(&genes, config);
            Individual::new(id, genes, fitness)
        })
        .collect())
}

/// One generation: two elites, then binary-tournament pairs with
/// single-point crossover and at most one point mutation per child.
pub fn step<R: RandomSource + ?Sized>(
    population: &[ProgramIndividual],
    config: &EAConfig,
    rng: &mut R,
) -> Result<(Vec<ProgramIndividual>, Vec<GpLogEntry>), EaError> {
    config.validate_for(Algorithm::Gp)?;
    check_population(population, config)?;

    let mut next = elites(population, FitnessDirection::Minimize);
    let mut entries = Vec::new();

    while next.len() < config.population_size {
        let p1 = tournament(population, 2, FitnessDirection::Minimize, rng);
        let p2 = tournament(population, 2, FitnessDirection::Minimize, rng);
        let point = rng.random_int(1, config.genes_count as i64 - 1) as usize;
        let (child1, child2) = single_point_crossover(&p1.genes, &p2.genes, point);

        for (genes, parents) in [(child1, [p1.id, p2.id]), (child2, [p2.id, p1.id])] {
            if next.len() >= config.population_size {
                break;
            }
            let id = next.len();
            let expression_before = decode_expression(&genes, config);
            let (genes, mutation_index) = mutate(genes, config, rng);
            let expression_after = decode_expression(&genes, config);
            let fitness = gp_fitness(&genes, config);
            log::trace!("GP child {id}: {expression_after} = {fitness}");

            entries.push(GpLogEntry {
                id,
                parents,
                crossover_point: point,
                mutation_index,
                expression_before,
                expression_after,
            });
            next.push(Individual::new(id, genes, fitness));
        }
    }

    Ok((next, entries))
}

/// With probability `mutationRate`, replace one random gene by a fresh
/// operation index. Never mutates when the table is empty.
fn mutate<R: RandomSource + ?Sized>(
    mut genes: Vec<usize>,
    config: &EAConfig,
    rng: &mut R,
) -> (Vec<usize>, Option<usize>) {
    let op_count = config.gp_operations.len();
    if rng.random_uniform() < config.mutation_rate && op_count > 0 {
        let idx = rng.random_index(config.genes_count);
        genes[idx] = rng.random_index(op_count);
        (genes, Some(idx))
    } else {
        (genes, None)
    }
}
