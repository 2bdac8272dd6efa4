//! The generation iterator
//!
//! An [`Engine`] owns the current population and produces one generation
//! per call to [`Iterator::next`]. Nothing runs until the first request:
//! that request evaluates the seeded population and then breeds the first
//! generation. The run ends when the next generation would need more
//! evaluations than the budget has left (or when the generation cap is
//! reached). The half-built generation is then discarded, so every yielded
//! generation is complete and the evaluation total never exceeds the budget.

use std::time::Instant;

use log::{debug, info, warn};

use crate::decoder::Decoder;
use crate::diagnostics::{EvolutionResult, EvolutionStats, GenerationStats};
use crate::engine::config::EngineConfig;
use crate::error::{EvoResult, EvolutionError};
use crate::operators::evaluate::Evaluate;
use crate::operators::traits::{PipelineContext, Stage, StepNotify};
use crate::population::individual::Individual;
use crate::population::population::Population;
use crate::problem::traits::{Direction, Problem};

/// Lifecycle of an engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Generation 0 exists but nothing has been evaluated
    Seeded,
    /// At least one generation has been produced
    Running,
    /// The budget or the generation cap ended the run
    Exhausted,
    /// A fatal error was yielded; no further generations follow
    Failed,
}

impl EngineState {
    /// Whether the engine will produce no further generations
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Exhausted | Self::Failed)
    }
}

/// How the next population is formed
pub enum PopulationModel<'a, G, P = G> {
    /// Offspring replace the parents
    Generational,
    /// A selection stage picks μ parents, the pipeline breeds λ offspring
    /// from them and the next population is the parents followed by the
    /// offspring
    MuPlusLambda {
        /// Stage choosing the surviving parents
        parent_selection: Box<dyn Stage<G, P> + 'a>,
    },
}

impl<'a, G, P> PopulationModel<'a, G, P> {
    /// Name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Generational => "generational",
            Self::MuPlusLambda { .. } => "mu_plus_lambda",
        }
    }
}

/// One completed generation
#[derive(Clone, Debug)]
pub struct Generation<G, P = G> {
    /// Generation index, starting at 1 for the first bred generation
    pub index: usize,
    /// Evaluations performed by the run up to and including this generation
    pub evaluations: usize,
    /// The evaluated population
    pub population: Population<G, P>,
    /// Optimization direction of the run
    pub direction: Direction,
}

impl<G, P> Generation<G, P> {
    /// The best individual of this generation, ties keeping the earliest
    pub fn best(&self) -> EvoResult<&Individual<G, P>> {
        self.population.best(self.direction)
    }

    /// Fitness of the best individual
    pub fn best_fitness(&self) -> EvoResult<f64> {
        self.best()?.fitness()
    }
}

/// A lazily evaluated evolutionary run
///
/// Created through [`EngineBuilder`](super::EngineBuilder). Stop pulling
/// from the iterator to cancel a run.
pub struct Engine<'a, G, P, D, Pr> {
    pub(crate) config: EngineConfig,
    pub(crate) decoder: D,
    pub(crate) problem: Pr,
    pub(crate) stages: Vec<Box<dyn Stage<G, P> + 'a>>,
    pub(crate) model: PopulationModel<'a, G, P>,
    pub(crate) notify: Vec<Box<dyn StepNotify + 'a>>,
    pub(crate) ctx: PipelineContext,
    pub(crate) population: Population<G, P>,
    pub(crate) generation: usize,
    pub(crate) state: EngineState,
    pub(crate) termination: Option<&'static str>,
    pub(crate) stalled: bool,
}

impl<'a, G, P, D, Pr> Engine<'a, G, P, D, Pr>
where
    D: Decoder<G, Phenotype = P>,
    Pr: Problem<P>,
{
    /// Current lifecycle state
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Index of the current generation (0 until the first one is bred)
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Evaluations performed so far
    pub fn evaluations(&self) -> usize {
        self.ctx.evaluations()
    }

    /// The current population
    ///
    /// After a fatal error this is still the last committed generation.
    pub fn population(&self) -> &Population<G, P> {
        &self.population
    }

    /// Optimization direction of the run
    pub fn direction(&self) -> Direction {
        self.ctx.direction()
    }

    /// The configuration the engine was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Why the run ended, once it has
    pub fn termination_reason(&self) -> Option<&'static str> {
        self.termination
    }

    /// Drain the iterator and summarize the run
    ///
    /// The first fatal error is returned as is. The best individual is the
    /// best seen in any yielded generation; if none was yielded the
    /// evaluated initial population is used instead.
    pub fn run(mut self) -> EvoResult<EvolutionResult<G, P>> {
        let start = Instant::now();
        let direction = self.direction();
        let mut stats = EvolutionStats::new(direction);
        let mut best: Option<Individual<G, P>> = None;

        while let Some(generation) = self.next() {
            let generation = generation?;
            stats.record(GenerationStats::from_population(
                &generation.population,
                generation.index,
                generation.evaluations,
                direction,
            ));

            let candidate = generation.best()?;
            let improved = match &best {
                Some(current) => candidate.is_better_than(current, direction)?,
                None => true,
            };
            if improved {
                best = Some(candidate.clone());
            }
        }

        let best = match best {
            Some(best) => best,
            None => self
                .population
                .best(direction)
                .map_err(|_| {
                    EvolutionError::Configuration(format!(
                        "Budget of {} evaluations ended before the initial population was evaluated",
                        self.ctx.budget().max().unwrap_or(0)
                    ))
                })?
                .clone(),
        };

        stats.set_runtime(start.elapsed());
        stats.set_termination_reason(self.termination.unwrap_or("unknown"));
        info!("{}", stats.summary());

        Ok(EvolutionResult {
            best_fitness: best.fitness()?,
            best,
            generations: self.generation,
            evaluations: self.ctx.evaluations(),
            stats,
        })
    }

    fn generation_cap_reached(&self) -> bool {
        self.config
            .max_generations
            .is_some_and(|max| self.generation >= max)
    }

    fn finish(&mut self, reason: &'static str) {
        info!(
            "run finished after generation {} with {} evaluations: {}",
            self.generation,
            self.ctx.evaluations(),
            reason
        );
        self.state = EngineState::Exhausted;
        self.termination = Some(reason);
    }

    /// Produce the next generation, `None` once the run is over
    fn advance(&mut self) -> EvoResult<Option<Generation<G, P>>> {
        if self.state.is_terminal() {
            return Ok(None);
        }
        if self.generation_cap_reached() {
            self.finish("Maximum generations reached");
            return Ok(None);
        }
        if self.stalled {
            self.finish("Pipeline stopped producing unevaluated individuals");
            return Ok(None);
        }

        let fallback = self.config.unevaluable_fitness;

        if self.state == EngineState::Seeded {
            evaluate_all(
                &self.decoder,
                &self.problem,
                fallback,
                &mut self.population,
                &mut self.ctx,
            )
            .map_err(|e| e.in_stage("initialize", 0))?;
            debug!(
                "initial population of {} evaluated ({} evaluations)",
                self.population.len(),
                self.ctx.evaluations()
            );
            self.state = EngineState::Running;
        }

        let step = self.generation;
        let next = step + 1;
        for stage in self.stages.iter_mut() {
            stage.set_step(step);
        }
        if let PopulationModel::MuPlusLambda { parent_selection } = &mut self.model {
            parent_selection.set_step(step);
        }
        for target in self.notify.iter_mut() {
            target.set_step(step);
        }
        self.ctx.set_generation(next);

        // Work on a copy so a failure leaves the committed generation intact
        let (population, evaluated) = match &mut self.model {
            PopulationModel::Generational => {
                let mut offspring =
                    run_stages(&mut self.stages, self.population.clone(), &mut self.ctx, next)?;
                let evaluated = evaluate_all(
                    &self.decoder,
                    &self.problem,
                    fallback,
                    &mut offspring,
                    &mut self.ctx,
                )
                .map_err(|e| e.in_stage("evaluate", next))?;
                (offspring, evaluated)
            }
            PopulationModel::MuPlusLambda { parent_selection } => {
                let parents = apply_stage(
                    parent_selection.as_mut(),
                    self.population.clone(),
                    &mut self.ctx,
                    next,
                )?;
                let mut offspring =
                    run_stages(&mut self.stages, parents.clone(), &mut self.ctx, next)?;
                let evaluated = evaluate_all(
                    &self.decoder,
                    &self.problem,
                    fallback,
                    &mut offspring,
                    &mut self.ctx,
                )
                .map_err(|e| e.in_stage("evaluate", next))?;

                let mut population = parents;
                population.extend(offspring);
                (population, evaluated)
            }
        };

        self.population = population;
        self.generation = next;
        // Without a generation cap, a generation that costs nothing would
        // never drain the evaluation budget
        self.stalled = evaluated == 0 && self.config.max_generations.is_none();

        let direction = self.direction();
        info!(
            "generation {}: {} individuals, {} evaluations, best fitness {:?}",
            next,
            self.population.len(),
            self.ctx.evaluations(),
            self.population
                .best(direction)
                .ok()
                .and_then(|best| best.fitness_opt())
        );

        Ok(Some(Generation {
            index: next,
            evaluations: self.ctx.evaluations(),
            population: self.population.clone(),
            direction,
        }))
    }
}

impl<'a, G, P, D, Pr> Iterator for Engine<'a, G, P, D, Pr>
where
    D: Decoder<G, Phenotype = P>,
    Pr: Problem<P>,
{
    type Item = EvoResult<Generation<G, P>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(Some(generation)) => Some(Ok(generation)),
            Ok(None) => None,
            Err(e) if e.is_budget_exhausted() => {
                debug!("discarding generation {}: {}", self.generation + 1, e);
                self.finish("Evaluation budget exhausted");
                None
            }
            Err(e) => {
                warn!("run failed after generation {}: {}", self.generation, e);
                self.state = EngineState::Failed;
                self.termination = Some("Fatal error");
                Some(Err(e))
            }
        }
    }
}

fn apply_stage<G, P, S: Stage<G, P> + ?Sized>(
    stage: &mut S,
    population: Population<G, P>,
    ctx: &mut PipelineContext,
    generation: usize,
) -> EvoResult<Population<G, P>> {
    debug!(
        "generation {}: applying '{}' to {} individuals",
        generation,
        stage.name(),
        population.len()
    );
    match stage.apply(population, ctx) {
        Ok(population) => Ok(population),
        Err(e) => Err(e.in_stage(stage.name(), generation)),
    }
}

fn run_stages<'a, G, P>(
    stages: &mut [Box<dyn Stage<G, P> + 'a>],
    mut population: Population<G, P>,
    ctx: &mut PipelineContext,
    generation: usize,
) -> EvoResult<Population<G, P>> {
    for stage in stages.iter_mut() {
        population = apply_stage(stage.as_mut(), population, ctx, generation)?;
    }
    Ok(population)
}

fn evaluate_all<G, P, D, Pr>(
    decoder: &D,
    problem: &Pr,
    fallback: Option<f64>,
    population: &mut Population<G, P>,
    ctx: &mut PipelineContext,
) -> EvoResult<usize>
where
    D: Decoder<G, Phenotype = P>,
    Pr: Problem<P>,
{
    let evaluate = Evaluate::new(decoder, problem);
    let evaluate = match fallback {
        Some(fitness) => evaluate.with_fallback(fitness),
        None => evaluate,
    };
    evaluate.evaluate_population(population, ctx)
}
