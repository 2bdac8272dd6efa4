//! Evaluation stage

use log::{debug, warn};

use crate::decoder::Decoder;
use crate::error::EvoResult;
use crate::operators::traits::{PipelineContext, Stage};
use crate::population::population::Population;
use crate::problem::traits::Problem;

/// Evaluates every individual lacking a fitness
///
/// Already evaluated individuals are left untouched, so survivors carried
/// over from a previous generation are not paid for twice. Each evaluation
/// is reserved against the run's budget before it happens. Order and size
/// of the population are preserved.
pub struct Evaluate<'a, D: ?Sized, Pr: ?Sized> {
    decoder: &'a D,
    problem: &'a Pr,
    fallback: Option<f64>,
}

impl<'a, D: ?Sized, Pr: ?Sized> Evaluate<'a, D, Pr> {
    /// Bind a decoder and a problem
    pub fn new(decoder: &'a D, problem: &'a Pr) -> Self {
        Self {
            decoder,
            problem,
            fallback: None,
        }
    }

    /// Assign `fitness` to individuals whose every trial failed
    ///
    /// Without a fallback such individuals abort the generation.
    pub fn with_fallback(mut self, fitness: f64) -> Self {
        self.fallback = Some(fitness);
        self
    }

    /// Evaluate the unevaluated members of `population` in place
    ///
    /// Returns the number of evaluations performed.
    pub fn evaluate_population<G, P>(
        &self,
        population: &mut Population<G, P>,
        ctx: &mut PipelineContext,
    ) -> EvoResult<usize>
    where
        D: Decoder<G, Phenotype = P>,
        Pr: Problem<P>,
    {
        let mut count = 0;
        for (i, individual) in population.iter_mut().enumerate() {
            if individual.is_evaluated() {
                continue;
            }
            ctx.reserve_evaluations(1)
                .map_err(|e| e.at_individual(i))?;
            count += 1;
            let outcome = individual.evaluate(self.decoder, self.problem).map(|_| ());
            if let Err(e) = outcome {
                match self.fallback {
                    Some(fallback) if e.is_unevaluable() => {
                        warn!("individual {} unevaluable ({}), assigning {}", i, e, fallback);
                        individual.set_fitness(fallback);
                    }
                    _ => return Err(e.at_individual(i)),
                }
            }
        }
        debug!(
            "evaluated {} individuals ({} evaluations used)",
            count,
            ctx.evaluations()
        );
        Ok(count)
    }
}

impl<'a, G, P, D, Pr> Stage<G, P> for Evaluate<'a, D, Pr>
where
    D: Decoder<G, Phenotype = P> + ?Sized,
    Pr: Problem<P> + ?Sized,
{
    fn name(&self) -> &str {
        "evaluate"
    }

    fn apply(
        &mut self,
        mut population: Population<G, P>,
        ctx: &mut PipelineContext,
    ) -> EvoResult<Population<G, P>> {
        self.evaluate_population(&mut population, ctx)?;
        Ok(population)
    }
}
