//! Selection operators
//!
//! Selected individuals are shallow clones of the input: they share genome
//! storage with the population they came from. The cloning stage is what
//! produces independent offspring.

use log::debug;
use rand::seq::index;

use crate::error::{EvoResult, EvolutionError};
use crate::operators::traits::{PipelineContext, Stage};
use crate::population::population::Population;

/// Return the index of the first unevaluated individual as an error
fn require_evaluated<G, P>(population: &Population<G, P>) -> EvoResult<()> {
    match population.iter().position(|i| !i.is_evaluated()) {
        Some(i) => Err(EvolutionError::UnevaluatedFitness.at_individual(i)),
        None => Ok(()),
    }
}

/// Tournament selection
///
/// Runs `n` tournaments. Each samples `min(tournament_size, len)` distinct
/// individuals uniformly at random and keeps the best one; within a
/// tournament ties go to the contender drawn first. Tournaments are
/// independent, so an individual may win several of them.
#[derive(Clone, Debug)]
pub struct TournamentSelection {
    /// Number of individuals to select
    pub n: usize,
    /// Number of contenders per tournament
    pub tournament_size: usize,
}

impl TournamentSelection {
    /// Select `n` individuals using binary tournaments
    pub fn new(n: usize) -> Self {
        Self {
            n,
            tournament_size: 2,
        }
    }

    /// Set the number of contenders per tournament
    pub fn with_tournament_size(mut self, tournament_size: usize) -> Self {
        assert!(tournament_size >= 1, "Tournament size must be at least 1");
        self.tournament_size = tournament_size;
        self
    }
}

impl<G, P> Stage<G, P> for TournamentSelection {
    fn name(&self) -> &str {
        "tournament"
    }

    fn apply(
        &mut self,
        population: Population<G, P>,
        ctx: &mut PipelineContext,
    ) -> EvoResult<Population<G, P>> {
        if self.n == 0 {
            return Ok(Population::new());
        }
        if population.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }
        require_evaluated(&population)?;

        let direction = ctx.direction();
        let size = self.tournament_size.max(1).min(population.len());
        let mut selected = Population::with_capacity(self.n);

        for _ in 0..self.n {
            let mut winner: Option<usize> = None;
            for contender in index::sample(&mut ctx.rng, population.len(), size) {
                let better = match winner {
                    None => true,
                    Some(w) => population[contender].is_better_than(&population[w], direction)?,
                };
                if better {
                    winner = Some(contender);
                }
            }
            if let Some(w) = winner {
                selected.push(population[w].clone());
            }
        }

        debug!(
            "tournament selected {} of {} (size {})",
            selected.len(),
            population.len(),
            size
        );
        Ok(selected)
    }
}

/// Truncation selection
///
/// Keeps the `mu` best individuals, best first. Equally fit individuals
/// keep their population order. If `mu` exceeds the population size the
/// whole population is returned, sorted.
#[derive(Clone, Debug)]
pub struct TruncationSelection {
    /// Number of individuals to keep
    pub mu: usize,
}

impl TruncationSelection {
    /// Keep the `mu` best individuals
    pub fn new(mu: usize) -> Self {
        Self { mu }
    }
}

impl<G, P> Stage<G, P> for TruncationSelection {
    fn name(&self) -> &str {
        "truncation"
    }

    fn apply(
        &mut self,
        mut population: Population<G, P>,
        ctx: &mut PipelineContext,
    ) -> EvoResult<Population<G, P>> {
        population.sort_by_fitness(ctx.direction())?;
        Ok(population.into_iter().take(self.mu).collect())
    }
}
