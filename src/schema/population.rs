//! Population model shared by every algorithm.
//!
//! An [`Individual`] is a common record (id, genes, fitness) plus an
//! algorithm-owned extension. Each algorithm works on its own concrete
//! alias, and [`Population`] tags the whole generation with the algorithm
//! that produced it.

use serde::{Deserialize, Serialize};

/// Optimization direction of an algorithm/problem pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessDirection {
    Maximize,
    Minimize,
}

impl FitnessDirection {
    /// Whether `a` is strictly better than `b`.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            FitnessDirection::Maximize => a > b,
            FitnessDirection::Minimize => a < b,
        }
    }
}

/// One candidate solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual<G, X = ()> {
    /// Position within the generation it belongs to.
    pub id: usize,
    pub genes: Vec<G>,
    pub fitness: f64,
    /// Algorithm-specific state.
    #[serde(flatten)]
    pub ext: X,
}

impl<G> Individual<G> {
    pub fn new(id: usize, genes: Vec<G>, fitness: f64) -> Self {
        Self {
            id,
            genes,
            fitness,
            ext: (),
        }
    }
}

/// Per-particle swarm state. A particle's position is its genes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleState {
    pub velocity: Vec<f64>,
    pub best_position: Vec<f64>,
    pub best_fitness: f64,
}

/// Self-adaptive mutation strength carried by ES individuals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    pub sigma: f64,
}

/// GA individual: one 0/1 flag per knapsack item.
pub type KnapsackIndividual = Individual<u8>;
/// DE individual: real-valued genes.
pub type RealValuedIndividual = Individual<f64>;
/// PSO particle.
pub type Particle = Individual<f64, ParticleState>;
/// ES individual with its own step size.
pub type StrategyIndividual = Individual<f64, StrategyParams>;
/// GP individual: genes index the operation table.
pub type ProgramIndividual = Individual<usize>;

/// A generation, tagged by the encoding that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "individuals")]
pub enum Population {
    Knapsack(Vec<KnapsackIndividual>),
    RealValued(Vec<RealValuedIndividual>),
    Swarm(Vec<Particle>),
    Strategy(Vec<StrategyIndividual>),
    Program(Vec<ProgramIndividual>),
}

impl Population {
    /// Encoding name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Population::Knapsack(_) => "Knapsack",
            Population::RealValued(_) => "RealValued",
            Population::Swarm(_) => "Swarm",
            Population::Strategy(_) => "Strategy",
            Population::Program(_) => "Program",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Population::Knapsack(p) => p.len(),
            Population::RealValued(p) => p.len(),
            Population::Swarm(p) => p.len(),
            Population::Strategy(p) => p.len(),
            Population::Program(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fitness values in population order.
    pub fn fitness_values(&self) -> Vec<f64> {
        match self {
            Population::Knapsack(p) => p.iter().map(|i| i.fitness).collect(),
            Population::RealValued(p) => p.iter().map(|i| i.fitness).collect(),
            Population::Swarm(p) => p.iter().map(|i| i.fitness).collect(),
            Population::Strategy(p) => p.iter().map(|i| i.fitness).collect(),
            Population::Program(p) => p.iter().map(|i| i.fitness).collect(),
        }
    }

    /// Genes of every individual as real rows, for plotting and tables.
    pub fn genes_matrix(&self) -> Vec<Vec<f64>> {
        match self {
            Population::Knapsack(p) => p
                .iter()
                .map(|i| i.genes.iter().map(|&g| f64::from(g)).collect())
                .collect(),
            Population::RealValued(p) => p.iter().map(|i| i.genes.clone()).collect(),
            Population::Swarm(p) => p.iter().map(|i| i.genes.clone()).collect(),
            Population::Strategy(p) => p.iter().map(|i| i.genes.clone()).collect(),
            Population::Program(p) => p
                .iter()
                .map(|i| i.genes.iter().map(|&g| g as f64).collect())
                .collect(),
        }
    }

    /// Index and fitness of the best individual (first one on ties).
    pub fn best(&self, direction: FitnessDirection) -> Option<(usize, f64)> {
        self.fitness_values()
            .into_iter()
            .enumerate()
            .fold(None, |best, (idx, fitness)| match best {
                Some((_, best_fitness)) if !direction.is_better(fitness, best_fitness) => best,
                _ => Some((idx, fitness)),
            })
    }

    pub fn average_fitness(&self) -> f64 {
        let values = self.fitness_values();
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }
}
