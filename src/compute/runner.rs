//! Generation driver: owns the current population and repeatedly steps it.
//!
//! Algorithms stay pure functions; the runner is the caller that keeps
//! state between generations and records per-generation statistics.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::EaError;
use crate::schema::{EAConfig, Population, StepLog};

use super::random::EaRng;
use super::registry::Algorithm;

/// Best and average fitness per generation (index 0 = initial population).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunHistory {
    pub best_fitness: Vec<f64>,
    pub avg_fitness: Vec<f64>,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    MaxGenerations,
    Cancelled,
}

/// Snapshot passed to progress callbacks.
#[derive(Debug)]
pub struct RunProgress<'a> {
    pub generation: usize,
    pub best_fitness: f64,
    pub avg_fitness: f64,
    pub population: &'a Population,
    /// `None` for the initial population.
    pub log: Option<&'a StepLog>,
}

/// Final statistics of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub algorithm: Algorithm,
    pub generations: usize,
    pub best_id: usize,
    pub best_fitness: f64,
    pub best_genes: Vec<f64>,
    pub final_avg_fitness: f64,
    pub stop_reason: StopReason,
    pub elapsed_seconds: f64,
}

/// Drives one algorithm over one configuration.
pub struct Runner {
    algorithm: Algorithm,
    config: EAConfig,
    rng: EaRng,
    population: Population,
    last_log: Option<StepLog>,
    history: RunHistory,
    generation: usize,
    cancelled: Arc<AtomicBool>,
}

impl Runner {
    /// Validate the configuration and build generation 0.
    pub fn new(algorithm: Algorithm, config: EAConfig) -> Result<Self, EaError> {
        let mut rng = EaRng::from_seed_option(config.random_seed);
        let population = algorithm.init(&config, &mut rng)?;

        let mut runner = Self {
            algorithm,
            config,
            rng,
            population,
            last_log: None,
            history: RunHistory::default(),
            generation: 0,
            cancelled: Arc::new(AtomicBool::new(false)),
        };
        runner.record_history();
        Ok(runner)
    }

    /// Get cancellation handle.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn config(&self) -> &EAConfig {
        &self.config
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn last_log(&self) -> Option<&StepLog> {
        self.last_log.as_ref()
    }

    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Index and fitness of the current best individual.
    pub fn best(&self) -> Option<(usize, f64)> {
        self.population.best(self.algorithm.fitness_direction())
    }

    /// Advance one generation and return its log.
    pub fn step(&mut self) -> Result<&StepLog, EaError> {
        let outcome = self
            .algorithm
            .step(&self.population, &self.config, &mut self.rng)?;
        self.population = outcome.next_population;
        self.generation += 1;
        self.record_history();

        log::debug!(
            "{} generation {}: best {:.4}, avg {:.4}",
            self.algorithm,
            self.generation,
            self.history.best_fitness.last().copied().unwrap_or(f64::NAN),
            self.history.avg_fitness.last().copied().unwrap_or(f64::NAN),
        );

        Ok(&*self.last_log.insert(outcome.log))
    }

    fn record_history(&mut self) {
        let best = self.best().map_or(f64::NAN, |(_, fitness)| fitness);
        self.history.best_fitness.push(best);
        self.history.avg_fitness.push(self.population.average_fitness());
    }

    fn progress(&self) -> RunProgress<'_> {
        RunProgress {
            generation: self.generation,
            best_fitness: self.history.best_fitness.last().copied().unwrap_or(f64::NAN),
            avg_fitness: self.population.average_fitness(),
            population: &self.population,
            log: self.last_log.as_ref(),
        }
    }

    /// Run until `maxGenerations` or cancellation, reporting every generation.
    ///
    /// The first error aborts the run; no further generations are stepped.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<RunSummary, EaError>
    where
        F: FnMut(&RunProgress<'_>),
    {
        let start_time = std::time::Instant::now();
        callback(&self.progress());

        let stop_reason = loop {
            if self.cancelled.load(Ordering::Relaxed) {
                break StopReason::Cancelled;
            }
            if self.generation >= self.config.max_generations {
                break StopReason::MaxGenerations;
            }
            self.step()?;
            callback(&self.progress());
        };

        let (best_id, best_fitness) = self.best().unwrap_or((0, f64::NAN));
        let best_genes = self
            .population
            .genes_matrix()
            .into_iter()
            .nth(best_id)
            .unwrap_or_default();

        Ok(RunSummary {
            algorithm: self.algorithm,
            generations: self.generation,
            best_id,
            best_fitness,
            best_genes,
            final_avg_fitness: self.population.average_fitness(),
            stop_reason,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
        })
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> Result<RunSummary, EaError> {
        self.run_with_callback(|_| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(algorithm: Algorithm) -> EAConfig {
        EAConfig {
            max_generations: 5,
            random_seed: Some(42),
            ..algorithm.reconcile(&EAConfig::default())
        }
    }

    #[test]
    fn test_run_all_algorithms() {
        for algorithm in Algorithm::ALL {
            let mut runner = Runner::new(algorithm, config(algorithm)).unwrap();
            let mut reports = 0;
            let summary = runner.run_with_callback(|_| reports += 1).unwrap();

            assert_eq!(summary.generations, 5);
            assert_eq!(summary.stop_reason, StopReason::MaxGenerations);
            assert_eq!(reports, 6);
            assert_eq!(runner.history().best_fitness.len(), 6);
            assert_eq!(summary.best_genes.len(), runner.config().genes_count);
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let a = Runner::new(Algorithm::Gp, config(Algorithm::Gp))
            .unwrap()
            .run()
            .unwrap();
        let b = Runner::new(Algorithm::Gp, config(Algorithm::Gp))
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(a.best_fitness, b.best_fitness);
        assert_eq!(a.best_genes, b.best_genes);
    }

    #[test]
    fn test_elitist_history_is_monotonic() {
        // GA maximizes, GP and plus-ES minimize; all keep their best.
        let mut ga = Runner::new(Algorithm::Ga, config(Algorithm::Ga)).unwrap();
        ga.run().unwrap();
        assert!(ga.history().best_fitness.windows(2).all(|w| w[1] >= w[0]));

        for algorithm in [Algorithm::Gp, Algorithm::Es, Algorithm::De] {
            let mut runner = Runner::new(algorithm, config(algorithm)).unwrap();
            runner.run().unwrap();
            assert!(
                runner.history().best_fitness.windows(2).all(|w| w[1] <= w[0]),
                "{algorithm}"
            );
        }
    }

    #[test]
    fn test_cancellation() {
        let mut runner = Runner::new(Algorithm::Pso, config(Algorithm::Pso)).unwrap();
        runner.cancel_handle().store(true, Ordering::Relaxed);
        let summary = runner.run().unwrap();
        assert_eq!(summary.stop_reason, StopReason::Cancelled);
        assert_eq!(summary.generations, 0);
    }

    #[test]
    fn test_invalid_config_fails_before_init() {
        let config = EAConfig {
            genes_count: 2,
            ..Default::default()
        };
        assert!(matches!(
            Runner::new(Algorithm::Ga, config),
            Err(EaError::Config(_))
        ));
    }

    #[test]
    fn test_step_exposes_log() {
        let mut runner = Runner::new(Algorithm::De, config(Algorithm::De)).unwrap();
        assert!(runner.last_log().is_none());
        let entries = runner.step().unwrap().len();
        assert_eq!(entries, runner.config().population_size);
        assert_eq!(runner.generation(), 1);
    }
}
