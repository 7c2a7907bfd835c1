//! Step log types: what happened during one generation.
//!
//! Logs exist for display only. No algorithm reads a log back.

use serde::{Deserialize, Serialize};

/// GA: one entry per crossover pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaLogEntry {
    /// Ids (in the previous generation) of the two tournament winners.
    pub parents: [usize; 2],
    pub crossover_point: usize,
    /// Children appended for this pair; one entry for an odd tail.
    pub children: Vec<GaChildLog>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaChildLog {
    pub id: usize,
    /// Flipped gene indices; empty when nothing mutated.
    pub mutated_genes: Vec<usize>,
}

/// DE: one entry per target individual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeLogEntry {
    pub id: usize,
    /// Base, and the two difference vectors' donors (r1, r2, r3).
    pub donors: [usize; 3],
    /// Raw `r2 - r3`, before scaling by F.
    pub difference: Vec<f64>,
    pub trial: Vec<f64>,
    pub trial_fitness: f64,
    pub target_fitness: f64,
    pub accepted: bool,
}

/// PSO: one entry per particle. Decomposed terms are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsoLogEntry {
    pub id: usize,
    pub old_velocity: Vec<f64>,
    pub inertia_term: Vec<f64>,
    pub cognitive_term: Vec<f64>,
    pub social_term: Vec<f64>,
    pub new_velocity: Vec<f64>,
    pub new_position: Vec<f64>,
}

/// ES: one entry per offspring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsLogEntry {
    /// Offspring index within this generation.
    pub offspring: usize,
    pub parent: usize,
    pub parent_sigma: f64,
    pub sigma: f64,
    pub genes: Vec<f64>,
    pub fitness: f64,
    /// New id if this offspring made it into the next generation.
    pub survived_as: Option<usize>,
}

/// GP: one entry per child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpLogEntry {
    pub id: usize,
    pub parents: [usize; 2],
    pub crossover_point: usize,
    pub mutation_index: Option<usize>,
    pub expression_before: String,
    pub expression_after: String,
}

/// Log of a single `step`, tagged by algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", content = "entries")]
pub enum StepLog {
    Ga(Vec<GaLogEntry>),
    De(Vec<DeLogEntry>),
    Pso(Vec<PsoLogEntry>),
    Es(Vec<EsLogEntry>),
    Gp(Vec<GpLogEntry>),
}

impl StepLog {
    /// Number of reproduction events recorded.
    pub fn len(&self) -> usize {
        match self {
            StepLog::Ga(e) => e.len(),
            StepLog::De(e) => e.len(),
            StepLog::Pso(e) => e.len(),
            StepLog::Es(e) => e.len(),
            StepLog::Gp(e) => e.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
