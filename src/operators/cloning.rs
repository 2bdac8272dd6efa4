//! Cloning stage

use crate::error::EvoResult;
use crate::operators::traits::{PipelineContext, Stage};
use crate::population::population::Population;

/// Produces independent offspring
///
/// Each input individual yields `offspring_per_ind` consecutive deep copies
/// with fresh genome storage, copied attributes and no fitness. This is the
/// only stage that severs genome sharing between generations.
#[derive(Clone, Debug)]
pub struct Cloning {
    /// Copies made of each input individual
    pub offspring_per_ind: usize,
}

impl Cloning {
    /// One offspring per individual
    pub fn new() -> Self {
        Self {
            offspring_per_ind: 1,
        }
    }

    /// Set the number of offspring per individual
    pub fn with_offspring_per_ind(mut self, offspring_per_ind: usize) -> Self {
        assert!(
            offspring_per_ind > 0,
            "At least one offspring per individual is required"
        );
        self.offspring_per_ind = offspring_per_ind;
        self
    }
}

impl Default for Cloning {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Clone, P> Stage<G, P> for Cloning {
    fn name(&self) -> &str {
        "cloning"
    }

    fn apply(
        &mut self,
        population: Population<G, P>,
        _ctx: &mut PipelineContext,
    ) -> EvoResult<Population<G, P>> {
        let mut offspring = Population::with_capacity(population.len() * self.offspring_per_ind);
        for parent in population.iter() {
            for _ in 0..self.offspring_per_ind {
                offspring.push(parent.offspring());
            }
        }
        Ok(offspring)
    }
}
