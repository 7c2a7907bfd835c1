//! Genetic algorithm over the 0/1 knapsack encoding (maximize).

use crate::error::EaError;
use crate::schema::{
    EAConfig, FitnessDirection, GaChildLog, GaLogEntry, Individual, KnapsackIndividual,
};

use super::problems::knapsack;
use super::random::RandomSource;
use super::registry::{Algorithm, check_population};
use super::selection::{elites, single_point_crossover, tournament};

fn knapsack_fitness(genes: &[u8], config: &EAConfig) -> f64 {
    knapsack(genes, &config.knapsack_items, config.knapsack_capacity).fitness
}

/// Random knapsack selections, one flag per item.
pub fn init<R: RandomSource + ?Sized>(
    config: &EAConfig,
    rng: &mut R,
) -> Result<Vec<KnapsackIndividual>, EaError> {
    config.validate_for(Algorithm::Ga)?;

    Ok((0..config.population_size)
        .map(|id| {
            let genes: Vec<u8> = (0..config.genes_count)
                .map(|_| rng.random_int(0, 1) as u8)
                .collect();
            let fitness = knapsack_fitness(&genes, config);
            Individual::new(id, genes, fitness)
        })
        .collect())
}

/// One generation: two elites, then tournament pairs with single-point
/// crossover and per-gene bit-flip mutation.
pub fn step<R: RandomSource + ?Sized>(
    population: &[KnapsackIndividual],
    config: &EAConfig,
    rng: &mut R,
) -> Result<(Vec<KnapsackIndividual>, Vec<GaLogEntry>), EaError> {
    config.validate_for(Algorithm::Ga)?;
    check_population(population, config)?;
    for individual in population {
        let bad_gene = individual.genes.iter().enumerate().find(|&(_, &g)| g > 1);
        if let Some((index, &value)) = bad_gene {
            return Err(EaError::InvalidGene {
                id: individual.id,
                index,
                value,
            });
        }
    }

    let mut next = elites(population, FitnessDirection::Maximize);
    let mut entries = Vec::new();

    while next.len() < config.population_size {
        let p1 = tournament(population, config.tournament_size, FitnessDirection::Maximize, rng);
        let p2 = tournament(population, config.tournament_size, FitnessDirection::Maximize, rng);
        let point = rng.random_int(1, config.genes_count as i64 - 1) as usize;
        let (child1, child2) = single_point_crossover(&p1.genes, &p2.genes, point);

        let mut entry = GaLogEntry {
            parents: [p1.id, p2.id],
            crossover_point: point,
            children: Vec::with_capacity(2),
        };

        for genes in [child1, child2] {
            if next.len() >= config.population_size {
                break;
            }
            let (genes, mutated_genes) = mutate(genes, config.mutation_rate, rng);
            let id = next.len();
            let fitness = knapsack_fitness(&genes, config);
            log::trace!(
                "GA child {id}: parents {:?} cut {point} flips {mutated_genes:?} -> {fitness}",
                entry.parents
            );
            entry.children.push(GaChildLog { id, mutated_genes });
            next.push(Individual::new(id, genes, fitness));
        }
        entries.push(entry);
    }

    Ok((next, entries))
}

/// Flip each bit with probability `rate`; returns the flipped indices.
fn mutate<R: RandomSource + ?Sized>(
    mut genes: Vec<u8>,
    rate: f64,
    rng: &mut R,
) -> (Vec<u8>, Vec<usize>) {
    let mut flipped = Vec::new();
    for (idx, gene) in genes.iter_mut().enumerate() {
        if rng.random_uniform() < rate {
            *gene ^= 1;
            flipped.push(idx);
        }
    }
    (genes, flipped)
}
