//! Selection and recombination helpers shared by GA and GP.

use crate::schema::{FitnessDirection, Individual};

use super::random::RandomSource;

/// Tournament selection: draw `size` random contestants, keep the fittest.
///
/// A later contestant replaces the current winner when it is at least as
/// fit, so for `size == 2` ties go to the second draw.
pub fn tournament<'a, G, X, R>(
    population: &'a [Individual<G, X>],
    size: usize,
    direction: FitnessDirection,
    rng: &mut R,
) -> &'a Individual<G, X>
where
    R: RandomSource + ?Sized,
{
    let mut winner = &population[rng.random_index(population.len())];
    for _ in 1..size {
        let contestant = &population[rng.random_index(population.len())];
        if !direction.is_better(winner.fitness, contestant.fitness) {
            winner = contestant;
        }
    }
    winner
}

/// Indices of `population` stably sorted by ascending fitness.
pub fn ascending_order<G, X>(population: &[Individual<G, X>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&a, &b| population[a].fitness.total_cmp(&population[b].fitness));
    order
}

/// The two best individuals, re-numbered 0 and 1.
pub fn elites<G: Clone, X: Clone>(
    population: &[Individual<G, X>],
    direction: FitnessDirection,
) -> Vec<Individual<G, X>> {
    let order = ascending_order(population);
    let picks: Vec<usize> = match direction {
        FitnessDirection::Minimize => order.iter().take(2).copied().collect(),
        FitnessDirection::Maximize => order.iter().rev().take(2).copied().collect(),
    };
    picks
        .into_iter()
        .enumerate()
        .map(|(id, idx)| Individual {
            id,
            ..population[idx].clone()
        })
        .collect()
}

/// Single-point crossover producing two complementary children.
pub fn single_point_crossover<G: Clone>(a: &[G], b: &[G], point: usize) -> (Vec<G>, Vec<G>) {
    let child1 = a[..point].iter().chain(&b[point..]).cloned().collect();
    let child2 = b[..point].iter().chain(&a[point..]).cloned().collect();
    (child1, child2)
}
