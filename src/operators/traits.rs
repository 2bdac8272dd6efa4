//! Pipeline stage traits
//!
//! Every operator and probe is a [`Stage`]: a transformation of a whole
//! population into the next, with its configuration held in the stage value.
//! Stages share a [`PipelineContext`] carrying the run's random generator,
//! the current generation and the evaluation budget.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{EvoResult, EvolutionError};
use crate::population::population::Population;
use crate::problem::traits::Direction;

/// Evaluation accounting for a run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvaluationBudget {
    max: Option<usize>,
    used: usize,
}

impl EvaluationBudget {
    /// A budget of at most `max` evaluations
    pub fn limited(max: usize) -> Self {
        Self {
            max: Some(max),
            used: 0,
        }
    }

    /// A budget that never runs out
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Reserve `count` evaluations
    ///
    /// Fails with [`EvolutionError::BudgetExhausted`] without reserving
    /// anything if the reservation would exceed the budget.
    pub fn reserve(&mut self, count: usize) -> EvoResult<()> {
        if let Some(max) = self.max {
            if self.used + count > max {
                return Err(EvolutionError::BudgetExhausted {
                    budget: max,
                    used: self.used,
                    requested: count,
                });
            }
        }
        self.used += count;
        Ok(())
    }

    /// Evaluations reserved so far
    pub fn used(&self) -> usize {
        self.used
    }

    /// Configured maximum, if any
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// Evaluations still available, if the budget is limited
    pub fn remaining(&self) -> Option<usize> {
        self.max.map(|m| m.saturating_sub(self.used))
    }
}

/// State shared by all stages of a run
#[derive(Debug)]
pub struct PipelineContext {
    /// The run's only source of randomness
    pub rng: StdRng,
    generation: usize,
    direction: Direction,
    budget: EvaluationBudget,
}

impl PipelineContext {
    /// Create a context from a seed
    pub fn new(seed: u64, direction: Direction, budget: EvaluationBudget) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), direction, budget)
    }

    /// Create a context around an existing generator
    pub fn with_rng(rng: StdRng, direction: Direction, budget: EvaluationBudget) -> Self {
        Self {
            rng,
            generation: 0,
            direction,
            budget,
        }
    }

    /// Index of the generation being produced
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub(crate) fn set_generation(&mut self, generation: usize) {
        self.generation = generation;
    }

    /// Optimization direction of the run's problem
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Evaluation budget
    pub fn budget(&self) -> &EvaluationBudget {
        &self.budget
    }

    /// Reserve evaluations against the run's budget
    pub fn reserve_evaluations(&mut self, count: usize) -> EvoResult<()> {
        self.budget.reserve(count)
    }

    /// Evaluations performed so far
    pub fn evaluations(&self) -> usize {
        self.budget.used()
    }
}

/// A pipeline stage
///
/// A stage receives the complete output of the previous stage and hands its
/// complete output to the next. It must not rely on which stage ran before
/// it, only on the population contract.
pub trait Stage<G, P = G> {
    /// Name used in logs and error messages
    fn name(&self) -> &str;

    /// Called once per generation, before the pipeline runs
    fn set_step(&mut self, step: usize) {
        let _ = step;
    }

    /// Transform a population
    fn apply(
        &mut self,
        population: Population<G, P>,
        ctx: &mut PipelineContext,
    ) -> EvoResult<Population<G, P>>;
}

impl<G, P, S: Stage<G, P> + ?Sized> Stage<G, P> for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn set_step(&mut self, step: usize) {
        (**self).set_step(step)
    }

    fn apply(
        &mut self,
        population: Population<G, P>,
        ctx: &mut PipelineContext,
    ) -> EvoResult<Population<G, P>> {
        (**self).apply(population, ctx)
    }
}

/// Receives the generation index before each generation runs
pub trait StepNotify {
    /// Record the current generation index
    fn set_step(&mut self, step: usize);
}

impl<F: FnMut(usize)> StepNotify for F {
    fn set_step(&mut self, step: usize) {
        self(step)
    }
}

/// Stage built from a closure
pub struct FnStage<F> {
    name: String,
    f: F,
}

impl<F> FnStage<F> {
    /// Create a named stage from a closure
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<G, P, F> Stage<G, P> for FnStage<F>
where
    F: FnMut(Population<G, P>, &mut PipelineContext) -> EvoResult<Population<G, P>>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(
        &mut self,
        population: Population<G, P>,
        ctx: &mut PipelineContext,
    ) -> EvoResult<Population<G, P>> {
        (self.f)(population, ctx)
    }
}
