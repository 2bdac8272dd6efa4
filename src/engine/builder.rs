//! Engine builder
//!
//! Assembles an [`Engine`] from an initializer, a decoder, a problem and a
//! list of stages. The decoder and problem types are tracked in the
//! builder's type so the stages are checked against the phenotype at
//! compile time.

use log::debug;

use crate::decoder::Decoder;
use crate::engine::config::EngineConfig;
use crate::engine::engine::{Engine, EngineState, PopulationModel};
use crate::error::EvolutionError;
use crate::genome::initializer::Initializer;
use crate::operators::traits::{EvaluationBudget, PipelineContext, Stage, StepNotify};
use crate::population::population::Population;
use crate::problem::traits::Problem;

/// Builder for [`Engine`]
pub struct EngineBuilder<'a, G, P, D, Pr> {
    config: EngineConfig,
    initializer: Option<Box<dyn Initializer<G> + 'a>>,
    decoder: Option<D>,
    problem: Option<Pr>,
    stages: Vec<Box<dyn Stage<G, P> + 'a>>,
    model: PopulationModel<'a, G, P>,
    notify: Vec<Box<dyn StepNotify + 'a>>,
}

impl<'a, G, P> EngineBuilder<'a, G, P, (), ()> {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::from_config(EngineConfig::default())
    }

    /// Create a builder starting from an existing configuration
    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            config,
            initializer: None,
            decoder: None,
            problem: None,
            stages: Vec::new(),
            model: PopulationModel::Generational,
            notify: Vec::new(),
        }
    }
}

impl<'a, G, P> Default for EngineBuilder<'a, G, P, (), ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, G, P, D, Pr> EngineBuilder<'a, G, P, D, Pr> {
    /// Set the population size
    pub fn population_size(mut self, size: usize) -> Self {
        self.config.population_size = size;
        self
    }

    /// Limit the run to `max` fitness evaluations
    pub fn max_evaluations(mut self, max: usize) -> Self {
        self.config.max_evaluations = Some(max);
        self
    }

    /// Limit the run to `max` generations
    pub fn max_generations(mut self, max: usize) -> Self {
        self.config.max_generations = Some(max);
        self
    }

    /// Set the seed of the run's random generator
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Assign `fitness` to individuals whose every trial failed
    pub fn unevaluable_fitness(mut self, fitness: f64) -> Self {
        self.config.unevaluable_fitness = Some(fitness);
        self
    }

    /// Set the generation-0 initializer
    pub fn initializer<I>(mut self, initializer: I) -> Self
    where
        I: Initializer<G> + 'a,
    {
        self.initializer = Some(Box::new(initializer));
        self
    }

    /// Append a stage to the pipeline
    pub fn stage<S>(mut self, stage: S) -> Self
    where
        S: Stage<G, P> + 'a,
    {
        self.stages.push(Box::new(stage));
        self
    }

    /// Append an already boxed stage to the pipeline
    pub fn boxed_stage(mut self, stage: Box<dyn Stage<G, P> + 'a>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Replace parents with their offspring each generation (the default)
    pub fn generational(mut self) -> Self {
        self.model = PopulationModel::Generational;
        self
    }

    /// Keep the parents chosen by `parent_selection` alongside their offspring
    pub fn mu_plus_lambda<S>(mut self, parent_selection: S) -> Self
    where
        S: Stage<G, P> + 'a,
    {
        self.model = PopulationModel::MuPlusLambda {
            parent_selection: Box::new(parent_selection),
        };
        self
    }

    /// Register an extra target for per-generation step notification
    pub fn notify<N>(mut self, target: N) -> Self
    where
        N: StepNotify + 'a,
    {
        self.notify.push(Box::new(target));
        self
    }

    /// Set the decoder
    pub fn decoder<NewD>(self, decoder: NewD) -> EngineBuilder<'a, G, P, NewD, Pr>
    where
        NewD: Decoder<G, Phenotype = P>,
    {
        EngineBuilder {
            config: self.config,
            initializer: self.initializer,
            decoder: Some(decoder),
            problem: self.problem,
            stages: self.stages,
            model: self.model,
            notify: self.notify,
        }
    }

    /// Set the problem
    pub fn problem<NewPr>(self, problem: NewPr) -> EngineBuilder<'a, G, P, D, NewPr>
    where
        NewPr: Problem<P>,
    {
        EngineBuilder {
            config: self.config,
            initializer: self.initializer,
            decoder: self.decoder,
            problem: Some(problem),
            stages: self.stages,
            model: self.model,
            notify: self.notify,
        }
    }
}

impl<'a, G, P, D, Pr> EngineBuilder<'a, G, P, D, Pr>
where
    D: Decoder<G, Phenotype = P>,
    Pr: Problem<P>,
{
    /// Build the engine and seed generation 0
    ///
    /// The initial population is created here but not evaluated; nothing
    /// is evaluated until the first generation is requested.
    pub fn build(self) -> Result<Engine<'a, G, P, D, Pr>, EvolutionError> {
        self.config.validate()?;

        let initializer = self.initializer.ok_or_else(|| {
            EvolutionError::Configuration("Initializer must be specified".to_string())
        })?;

        let decoder = self
            .decoder
            .ok_or_else(|| EvolutionError::Configuration("Decoder must be specified".to_string()))?;

        let problem = self
            .problem
            .ok_or_else(|| EvolutionError::Configuration("Problem must be specified".to_string()))?;

        let budget = match self.config.max_evaluations {
            Some(max) => EvaluationBudget::limited(max),
            None => EvaluationBudget::unlimited(),
        };
        let mut ctx = PipelineContext::new(self.config.seed, problem.direction(), budget);

        let genomes = initializer.initialize_many(self.config.population_size, &mut ctx.rng);
        let population = Population::from_genomes(genomes);

        debug!(
            "seeded {} population of {} with {} stages (seed {})",
            self.model.name(),
            population.len(),
            self.stages.len(),
            self.config.seed
        );

        Ok(Engine {
            config: self.config,
            decoder,
            problem,
            stages: self.stages,
            model: self.model,
            notify: self.notify,
            ctx,
            population,
            generation: 0,
            state: EngineState::Seeded,
            termination: None,
            stalled: false,
        })
    }
}
