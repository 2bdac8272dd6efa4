//! Diagnostics and statistics
//!
//! This module provides statistics collection for evolutionary runs and
//! the performance metrics used to compare configurations.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, GenomeError};
use crate::population::individual::Individual;
use crate::population::population::Population;
use crate::problem::traits::Direction;

/// Statistics for a single generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number
    pub generation: usize,
    /// Total fitness evaluations so far
    pub evaluations: usize,
    /// Best fitness in this generation
    pub best_fitness: f64,
    /// Worst fitness in this generation
    pub worst_fitness: f64,
    /// Mean fitness
    pub mean_fitness: f64,
    /// Median fitness
    pub median_fitness: f64,
    /// Fitness standard deviation (sample), 0 for fewer than two values
    pub fitness_std: f64,
    /// Number of evaluated individuals the statistics cover
    pub evaluated: usize,
}

impl GenerationStats {
    /// Compute statistics from the evaluated members of a population
    ///
    /// "Best" and "worst" follow `direction`. Populations without any
    /// evaluated individual yield the direction's worst value for both.
    pub fn from_population<G, P>(
        population: &Population<G, P>,
        generation: usize,
        evaluations: usize,
        direction: Direction,
    ) -> Self {
        let mut fitnesses = population.fitness_values();

        if fitnesses.is_empty() {
            let worst = direction.worst_value();
            return Self {
                generation,
                evaluations,
                best_fitness: worst,
                worst_fitness: worst,
                mean_fitness: 0.0,
                median_fitness: 0.0,
                fitness_std: 0.0,
                evaluated: 0,
            };
        }

        // Ascending by quality, so the best value ends up last
        fitnesses.sort_by(|a, b| direction.compare(*a, *b));

        let n = fitnesses.len();
        let best = fitnesses[n - 1];
        let worst = fitnesses[0];
        let mean = fitnesses.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (fitnesses[n / 2 - 1] + fitnesses[n / 2]) / 2.0
        } else {
            fitnesses[n / 2]
        };

        Self {
            generation,
            evaluations,
            best_fitness: best,
            worst_fitness: worst,
            mean_fitness: mean,
            median_fitness: median,
            fitness_std: population.fitness_std().unwrap_or(0.0),
            evaluated: n,
        }
    }
}

/// Statistics collector for an entire evolution run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Statistics per generation
    pub generations: Vec<GenerationStats>,
    /// Optimization direction the statistics were collected under
    pub direction: Direction,
    /// Total runtime in milliseconds
    pub total_runtime_ms: f64,
    /// Reason for termination
    pub termination_reason: Option<String>,
}

impl EvolutionStats {
    /// Create a new stats collector
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    /// Record a generation's statistics
    pub fn record(&mut self, stats: GenerationStats) {
        self.generations.push(stats);
    }

    /// Get the number of generations recorded
    pub fn num_generations(&self) -> usize {
        self.generations.len()
    }

    /// Get the best fitness across all generations
    pub fn best_fitness(&self) -> Option<f64> {
        self.generations
            .iter()
            .map(|g| g.best_fitness)
            .max_by(|a, b| self.direction.compare(*a, *b))
    }

    /// Get the final best fitness
    pub fn final_best_fitness(&self) -> Option<f64> {
        self.generations.last().map(|g| g.best_fitness)
    }

    /// Get the history of best fitness values
    pub fn best_fitness_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.best_fitness).collect()
    }

    /// Get the history of mean fitness values
    pub fn mean_fitness_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.mean_fitness).collect()
    }

    /// Generation indices, as a step axis for [`area_under_curve`]
    pub fn steps(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.generation as f64).collect()
    }

    /// Area under the best-fitness curve of this run
    pub fn best_fitness_auc(&self) -> f64 {
        left_riemann_sum(&self.steps(), &self.best_fitness_history())
    }

    /// Set the termination reason
    pub fn set_termination_reason(&mut self, reason: &str) {
        self.termination_reason = Some(reason.to_string());
    }

    /// Set the total runtime
    pub fn set_runtime(&mut self, duration: Duration) {
        self.total_runtime_ms = duration.as_secs_f64() * 1000.0;
    }

    /// Get a summary of the evolution run
    pub fn summary(&self) -> String {
        let worst = self.direction.worst_value();
        let best = self.best_fitness().unwrap_or(worst);
        let final_best = self.final_best_fitness().unwrap_or(worst);
        let generations = self.num_generations();
        let runtime = self.total_runtime_ms;

        format!(
            "Evolution Summary:\n\
             - Generations: {}\n\
             - Best fitness: {:.6}\n\
             - Final best: {:.6}\n\
             - Runtime: {:.2}ms\n\
             - Termination: {}",
            generations,
            best,
            final_best,
            runtime,
            self.termination_reason.as_deref().unwrap_or("unknown")
        )
    }
}

/// Result of an evolution run
#[derive(Clone, Debug)]
pub struct EvolutionResult<G, P = G> {
    /// The best individual seen in any generation
    pub best: Individual<G, P>,
    /// The best fitness value
    pub best_fitness: f64,
    /// Number of generations completed
    pub generations: usize,
    /// Total fitness evaluations
    pub evaluations: usize,
    /// Evolution statistics
    pub stats: EvolutionStats,
}

impl<G, P> EvolutionResult<G, P> {
    /// The best genome found
    pub fn best_genome(&self) -> &G {
        self.best.genome()
    }
}

/// Area under a curve, as a left Riemann sum
///
/// Each point `y[i]` is held until `x[i + 1]`, so the final point
/// contributes nothing. Step sizes may vary.
pub fn area_under_curve(x: &[f64], y: &[f64]) -> EvoResult<f64> {
    if x.len() != y.len() {
        return Err(GenomeError::DimensionMismatch {
            expected: x.len(),
            actual: y.len(),
        }
        .into());
    }
    Ok(left_riemann_sum(x, y))
}

fn left_riemann_sum(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y)
        .map(|(step, height)| (step[1] - step[0]) * height)
        .sum()
}

pub mod prelude {
    pub use super::{area_under_curve, EvolutionResult, EvolutionStats, GenerationStats};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvolutionError;
    use crate::genome::real_vector::RealVector;

    fn population(fitnesses: &[f64]) -> Population<RealVector> {
        fitnesses
            .iter()
            .enumerate()
            .map(|(i, &f)| Individual::with_fitness(RealVector::new(vec![i as f64]), f))
            .collect()
    }

    #[test]
    fn test_area_under_curve_unit_steps() {
        let steps = [0.0, 1.0, 2.0, 3.0, 4.0];
        let fitnesses = [0.0, 0.5, 0.9, 0.99, 1.0];
        let auc = area_under_curve(&steps, &fitnesses).unwrap();
        assert!((auc - 2.39).abs() < 1e-9);
    }

    #[test]
    fn test_area_under_curve_varying_steps() {
        let x = [0.0, 10.0, 20.0, 30.0, 50.0, 100.0];
        let y = [0.2, 0.5, 0.9, 1.2, 1.3, 1.4];
        let auc = area_under_curve(&x, &y).unwrap();
        assert!((auc - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_area_under_curve_length_mismatch() {
        let err = area_under_curve(&[0.0, 1.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::Genome(GenomeError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert_eq!(area_under_curve(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_generation_stats_maximize() {
        let pop = population(&[1.0, 4.0, 2.0, 3.0]);
        let stats = GenerationStats::from_population(&pop, 3, 40, Direction::Maximize);

        assert_eq!(stats.generation, 3);
        assert_eq!(stats.evaluations, 40);
        assert_eq!(stats.best_fitness, 4.0);
        assert_eq!(stats.worst_fitness, 1.0);
        assert_eq!(stats.mean_fitness, 2.5);
        assert_eq!(stats.median_fitness, 2.5);
        assert_eq!(stats.evaluated, 4);
    }

    #[test]
    fn test_generation_stats_minimize() {
        let pop = population(&[1.0, 4.0, 2.0]);
        let stats = GenerationStats::from_population(&pop, 0, 3, Direction::Minimize);

        assert_eq!(stats.best_fitness, 1.0);
        assert_eq!(stats.worst_fitness, 4.0);
        assert_eq!(stats.median_fitness, 2.0);
    }

    #[test]
    fn test_generation_stats_unevaluated() {
        let pop: Population<RealVector> =
            Population::from_genomes(vec![RealVector::new(vec![0.0])]);
        let stats = GenerationStats::from_population(&pop, 0, 0, Direction::Maximize);
        assert_eq!(stats.evaluated, 0);
        assert_eq!(stats.best_fitness, f64::NEG_INFINITY);
    }

    #[test]
    fn test_evolution_stats_best_respects_direction() {
        let mut stats = EvolutionStats::new(Direction::Minimize);
        for (generation, fitnesses) in [[3.0, 5.0], [1.0, 2.0], [2.0, 9.0]].iter().enumerate() {
            stats.record(GenerationStats::from_population(
                &population(fitnesses),
                generation,
                0,
                Direction::Minimize,
            ));
        }

        assert_eq!(stats.num_generations(), 3);
        assert_eq!(stats.best_fitness(), Some(1.0));
        assert_eq!(stats.final_best_fitness(), Some(2.0));
        assert_eq!(stats.best_fitness_history(), vec![3.0, 1.0, 2.0]);
        assert_eq!(stats.best_fitness_auc(), 4.0);
    }

    #[test]
    fn test_summary_mentions_termination() {
        let mut stats = EvolutionStats::new(Direction::Maximize);
        stats.set_termination_reason("Evaluation budget exhausted");
        assert!(stats.summary().contains("Evaluation budget exhausted"));
    }
}
