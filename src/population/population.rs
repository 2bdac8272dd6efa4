//! Population type
//!
//! This module provides the Population container type.

use std::cmp::Ordering;

use crate::error::{EvoResult, EvolutionError};
use crate::population::individual::Individual;
use crate::problem::traits::Direction;

/// An ordered sequence of individuals
///
/// Duplicates are allowed; operators decide how the size changes.
#[derive(Debug)]
pub struct Population<G, P = G> {
    individuals: Vec<Individual<G, P>>,
}

impl<G, P> Clone for Population<G, P> {
    fn clone(&self) -> Self {
        Self {
            individuals: self.individuals.clone(),
        }
    }
}

impl<G, P> Population<G, P> {
    /// Create an empty population
    pub fn new() -> Self {
        Self {
            individuals: Vec::new(),
        }
    }

    /// Create a population with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            individuals: Vec::with_capacity(capacity),
        }
    }

    /// Create a population from a vector of individuals
    pub fn from_individuals(individuals: Vec<Individual<G, P>>) -> Self {
        Self { individuals }
    }

    /// Create an unevaluated population from genomes
    pub fn from_genomes<I: IntoIterator<Item = G>>(genomes: I) -> Self {
        genomes.into_iter().map(Individual::new).collect()
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Get an individual by index
    pub fn get(&self, index: usize) -> Option<&Individual<G, P>> {
        self.individuals.get(index)
    }

    /// Get a mutable reference to an individual by index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Individual<G, P>> {
        self.individuals.get_mut(index)
    }

    /// Add an individual to the population
    pub fn push(&mut self, individual: Individual<G, P>) {
        self.individuals.push(individual);
    }

    /// Append all individuals of another population
    pub fn extend(&mut self, other: Population<G, P>) {
        self.individuals.extend(other.individuals);
    }

    /// Get an iterator over the individuals
    pub fn iter(&self) -> std::slice::Iter<'_, Individual<G, P>> {
        self.individuals.iter()
    }

    /// Get a mutable iterator over the individuals
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Individual<G, P>> {
        self.individuals.iter_mut()
    }

    /// Get the underlying slice of individuals
    pub fn individuals(&self) -> &[Individual<G, P>] {
        &self.individuals
    }

    /// Take the individuals out of this population
    pub fn into_individuals(self) -> Vec<Individual<G, P>> {
        self.individuals
    }

    /// Index of the best individual
    ///
    /// Ties keep the earliest individual. Fails with
    /// [`EvolutionError::UnevaluatedFitness`] if any individual lacks a
    /// fitness and with [`EvolutionError::EmptyPopulation`] if there are none.
    pub fn best_index(&self, direction: Direction) -> EvoResult<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, individual) in self.individuals.iter().enumerate() {
            let fitness = individual
                .fitness()
                .map_err(|e| e.at_individual(i))?;
            match best {
                Some((_, b)) if !direction.is_better(fitness, b) => {}
                _ => best = Some((i, fitness)),
            }
        }
        best.map(|(i, _)| i).ok_or(EvolutionError::EmptyPopulation)
    }

    /// The best individual, ties keeping the earliest
    pub fn best(&self, direction: Direction) -> EvoResult<&Individual<G, P>> {
        let index = self.best_index(direction)?;
        Ok(&self.individuals[index])
    }

    /// The worst individual, ties keeping the earliest
    pub fn worst(&self, direction: Direction) -> EvoResult<&Individual<G, P>> {
        let opposite = match direction {
            Direction::Maximize => Direction::Minimize,
            Direction::Minimize => Direction::Maximize,
        };
        self.best(opposite)
    }

    /// Sort the population best first
    ///
    /// The sort is stable, so equally fit individuals keep their order.
    pub fn sort_by_fitness(&mut self, direction: Direction) -> EvoResult<()> {
        if let Some(i) = self.individuals.iter().position(|i| !i.is_evaluated()) {
            return Err(EvolutionError::UnevaluatedFitness.at_individual(i));
        }
        self.individuals
            .sort_by(|a, b| fitness_order(b, a, direction));
        Ok(())
    }

    /// Check if all individuals have been evaluated
    pub fn all_evaluated(&self) -> bool {
        self.individuals.iter().all(|i| i.is_evaluated())
    }

    /// Count the number of evaluated individuals
    pub fn count_evaluated(&self) -> usize {
        self.individuals.iter().filter(|i| i.is_evaluated()).count()
    }

    /// Fitness values of the evaluated individuals, in order
    pub fn fitness_values(&self) -> Vec<f64> {
        self.individuals
            .iter()
            .filter_map(|i| i.fitness_opt())
            .collect()
    }

    /// Compute mean fitness of the evaluated individuals
    pub fn mean_fitness(&self) -> Option<f64> {
        let evaluated = self.fitness_values();
        if evaluated.is_empty() {
            None
        } else {
            Some(evaluated.iter().sum::<f64>() / evaluated.len() as f64)
        }
    }

    /// Compute sample standard deviation of fitness
    pub fn fitness_std(&self) -> Option<f64> {
        let mean = self.mean_fitness()?;
        let evaluated = self.fitness_values();
        if evaluated.len() < 2 {
            return None;
        }
        let variance = evaluated.iter().map(|f| (f - mean).powi(2)).sum::<f64>()
            / (evaluated.len() - 1) as f64;
        Some(variance.sqrt())
    }
}

impl<G, P> Default for Population<G, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G, P> std::ops::Index<usize> for Population<G, P> {
    type Output = Individual<G, P>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.individuals[index]
    }
}

impl<G, P> std::ops::IndexMut<usize> for Population<G, P> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.individuals[index]
    }
}

impl<G, P> IntoIterator for Population<G, P> {
    type Item = Individual<G, P>;
    type IntoIter = std::vec::IntoIter<Individual<G, P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.into_iter()
    }
}

impl<'a, G, P> IntoIterator for &'a Population<G, P> {
    type Item = &'a Individual<G, P>;
    type IntoIter = std::slice::Iter<'a, Individual<G, P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}

impl<G, P> FromIterator<Individual<G, P>> for Population<G, P> {
    fn from_iter<I: IntoIterator<Item = Individual<G, P>>>(iter: I) -> Self {
        Self::from_individuals(iter.into_iter().collect())
    }
}

/// Compare two individuals for sorting, unevaluated ones last
pub(crate) fn fitness_order<G, P>(
    a: &Individual<G, P>,
    b: &Individual<G, P>,
    direction: Direction,
) -> Ordering {
    direction.compare(
        a.fitness_opt().unwrap_or(f64::NAN),
        b.fitness_opt().unwrap_or(f64::NAN),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::real_vector::RealVector;

    fn create_test_population() -> Population<RealVector> {
        let individuals = vec![
            Individual::with_fitness(RealVector::new(vec![1.0]), 10.0),
            Individual::with_fitness(RealVector::new(vec![2.0]), 50.0),
            Individual::with_fitness(RealVector::new(vec![3.0]), 30.0),
            Individual::with_fitness(RealVector::new(vec![4.0]), 50.0),
            Individual::with_fitness(RealVector::new(vec![5.0]), 10.0),
        ];
        Population::from_individuals(individuals)
    }

    #[test]
    fn test_population_new() {
        let pop: Population<RealVector> = Population::new();
        assert!(pop.is_empty());
        assert!(matches!(
            pop.best(Direction::Maximize),
            Err(EvolutionError::EmptyPopulation)
        ));
    }

    #[test]
    fn test_population_best_keeps_first_on_ties() {
        let pop = create_test_population();
        assert_eq!(pop.best_index(Direction::Maximize).unwrap(), 1);
        assert_eq!(pop.best_index(Direction::Minimize).unwrap(), 0);
        assert_eq!(pop.worst(Direction::Maximize).unwrap().genome()[0], 1.0);
    }

    #[test]
    fn test_population_best_requires_evaluation() {
        let mut pop = create_test_population();
        pop.push(Individual::new(RealVector::new(vec![6.0])));
        let err = pop.best(Direction::Maximize).unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::Individual { index: 5, .. }
        ));
    }

    #[test]
    fn test_population_sort_by_fitness_is_stable() {
        let mut pop = create_test_population();
        pop.sort_by_fitness(Direction::Maximize).unwrap();

        let genes: Vec<f64> = pop.iter().map(|i| i.genome()[0]).collect();
        assert_eq!(genes, vec![2.0, 4.0, 3.0, 1.0, 5.0]);
    }

    #[test]
    fn test_population_mean_and_std() {
        let pop = create_test_population();
        assert_eq!(pop.mean_fitness().unwrap(), 30.0);
        // Sample variance = (400 + 400 + 0 + 400 + 400) / 4 = 400
        assert!((pop.fitness_std().unwrap() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_population_iterators() {
        let pop = create_test_population();
        assert_eq!((&pop).into_iter().count(), 5);
        let collected: Population<RealVector> = pop.into_iter().take(2).collect();
        assert_eq!(collected.len(), 2);
    }
}
