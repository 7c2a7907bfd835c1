//! Particle swarm optimization on Sphere or Ackley (minimize).
//!
//! The swarm lives on the integer lattice of [-5, 5]: initial positions and
//! velocities are integer draws and every new velocity is rounded, so
//! positions stay whole numbers for discrete plotting.

use crate::error::EaError;
use crate::schema::{
    DOMAIN_MAX, DOMAIN_MIN, EAConfig, Individual, Particle, ParticleState, PsoLogEntry,
};

use super::problems::real_fitness;
use super::random::RandomSource;
use super::registry::{Algorithm, check_population};

/// Velocity components are clamped to this magnitude before rounding.
pub const MAX_VELOCITY: f64 = 5.0;
/// Initial velocity components are drawn from `[-INITIAL_VELOCITY, INITIAL_VELOCITY]`.
const INITIAL_VELOCITY: i64 = 2;

/// Particles at random lattice points with small random velocities.
pub fn init<R: RandomSource + ?Sized>(
    config: &EAConfig,
    rng: &mut R,
) -> Result<Vec<Particle>, EaError> {
    config.validate_for(Algorithm::Pso)?;

    Ok((0..config.population_size)
        .map(|id| {
            let genes: Vec<f64> = (0..config.genes_count)
                .map(|_| rng.random_int(DOMAIN_MIN as i64, DOMAIN_MAX as i64) as f64)
                .collect();
            let velocity: Vec<f64> = (0..config.genes_count)
                .map(|_| rng.random_int(-INITIAL_VELOCITY, INITIAL_VELOCITY) as f64)
                .collect();
            let fitness = real_fitness(config.problem_type, &genes);
            Individual {
                id,
                ext: ParticleState {
                    velocity,
                    best_position: genes.clone(),
                    best_fitness: fitness,
                },
                genes,
                fitness,
            }
        })
        .collect())
}

/// Move every particle once. Particle slots keep their ids.
pub fn step<R: RandomSource + ?Sized>(
    population: &[Particle],
    config: &EAConfig,
    rng: &mut R,
) -> Result<(Vec<Particle>, Vec<PsoLogEntry>), EaError> {
    config.validate_for(Algorithm::Pso)?;
    check_population(population, config)?;
    for particle in population {
        let bad_len = [particle.ext.velocity.len(), particle.ext.best_position.len()]
            .into_iter()
            .find(|&len| len != config.genes_count);
        if let Some(actual) = bad_len {
            return Err(EaError::GeneLengthMismatch {
                id: particle.id,
                expected: config.genes_count,
                actual,
            });
        }
    }

    // Computed once per generation from personal bests.
    let global_best = population
        .iter()
        .fold(&population[0], |best, p| {
            if p.ext.best_fitness < best.ext.best_fitness {
                p
            } else {
                best
            }
        })
        .ext
        .best_position
        .clone();

    let mut next = Vec::with_capacity(population.len());
    let mut entries = Vec::with_capacity(population.len());

    for particle in population {
        let state = &particle.ext;
        let dims = particle.genes.len();
        let mut inertia_term = Vec::with_capacity(dims);
        let mut cognitive_term = Vec::with_capacity(dims);
        let mut social_term = Vec::with_capacity(dims);
        let mut velocity = Vec::with_capacity(dims);

        for (d, &x) in particle.genes.iter().enumerate() {
            let r1 = rng.random_uniform();
            let r2 = rng.random_uniform();

            let inertia = config.w * state.velocity[d];
            let cognitive = config.c1 * r1 * (state.best_position[d] - x);
            let social = config.c2 * r2 * (global_best[d] - x);

            inertia_term.push(round2(inertia));
            cognitive_term.push(round2(cognitive));
            social_term.push(round2(social));

            let v = (inertia + cognitive + social).clamp(-MAX_VELOCITY, MAX_VELOCITY);
            velocity.push(round_half_up(v));
        }

        let genes: Vec<f64> = particle
            .genes
            .iter()
            .zip(&velocity)
            .map(|(x, v)| (x + v).clamp(DOMAIN_MIN, DOMAIN_MAX))
            .collect();
        let fitness = real_fitness(config.problem_type, &genes);

        let (best_position, best_fitness) = if fitness < state.best_fitness {
            (genes.clone(), fitness)
        } else {
            (state.best_position.clone(), state.best_fitness)
        };

        log::trace!(
            "PSO particle {}: v {:?} -> {velocity:?}, x -> {genes:?} ({fitness})",
            particle.id,
            state.velocity
        );

        entries.push(PsoLogEntry {
            id: particle.id,
            old_velocity: state.velocity.clone(),
            inertia_term,
            cognitive_term,
            social_term,
            new_velocity: velocity.clone(),
            new_position: genes.clone(),
        });
        next.push(Individual {
            id: particle.id,
            genes,
            fitness,
            ext: ParticleState {
                velocity,
                best_position,
                best_fitness,
            },
        });
    }

    Ok((next, entries))
}

/// Round to 2 decimals for display.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to the nearest integer, halves toward +∞ (-2.5 -> -2, 2.5 -> 3).
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
