//! Scoring brains by running them in an environment
//!
//! A [`BrainProblem`] runs a fixed number of independent trials per
//! evaluation. Each trial clones the prototype environment and the brain,
//! resets both, then alternates actions and steps until the episode ends or
//! the step limit is hit. Failed trials are left out of the average; only
//! when every trial fails is the brain unevaluable.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::brains::environment::{validate_action, Brain, Environment};
use crate::error::{EvoResult, EvolutionError, TrialError};
use crate::population::attributes::{AttributeValue, Attributes};
use crate::problem::traits::Problem;

/// How a trial is turned into a score
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitnessKind {
    /// Total reward collected over the episode
    #[default]
    Reward,
    /// Number of steps survived
    Survival,
}

/// Trial settings of a [`BrainProblem`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainProblemConfig {
    /// Independent trials per evaluation
    pub trials: usize,
    /// Step limit of a single trial
    pub max_steps: usize,
    /// Base seed; trial `i` resets the environment with `seed + i`
    pub seed: u64,
    /// Score reduction
    pub fitness: FitnessKind,
}

impl Default for BrainProblemConfig {
    fn default() -> Self {
        Self {
            trials: 1,
            max_steps: 500,
            seed: 0,
            fitness: FitnessKind::Reward,
        }
    }
}

impl BrainProblemConfig {
    /// Create a configuration with the given trial count and step limit
    pub fn new(trials: usize, max_steps: usize) -> Self {
        Self {
            trials,
            max_steps,
            ..Self::default()
        }
    }

    /// Set the base seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the score reduction
    pub fn with_fitness(mut self, fitness: FitnessKind) -> Self {
        self.fitness = fitness;
        self
    }
}

/// Evaluates brains by the mean score of their successful trials
///
/// Records `failed_trials` (count) and `trial_scores` (successful scores in
/// trial order) on the evaluated individual.
#[derive(Clone, Debug)]
pub struct BrainProblem<E> {
    config: BrainProblemConfig,
    environment: E,
}

impl<E: Environment> BrainProblem<E> {
    /// Create a problem around a prototype environment
    ///
    /// # Panics
    /// Panics if `config.trials` is zero
    pub fn new(config: BrainProblemConfig, environment: E) -> Self {
        assert!(config.trials > 0, "At least one trial is required");
        Self {
            config,
            environment,
        }
    }

    /// The trial settings
    pub fn config(&self) -> &BrainProblemConfig {
        &self.config
    }

    /// The prototype environment
    pub fn environment(&self) -> &E {
        &self.environment
    }

    /// Run one trial and return its score
    pub fn run_trial<B: Brain + Clone>(&self, brain: &B, trial: usize) -> EvoResult<f64> {
        self.trial(brain, trial)
            .map_err(|source| EvolutionError::TrialFailure { trial, source })
    }

    fn trial<B: Brain + Clone>(&self, brain: &B, trial: usize) -> Result<f64, TrialError> {
        let mut environment = self.environment.clone();
        let mut brain = brain.clone();
        brain.reset();

        let action_size = environment.action_size();
        let mut observation = environment.reset(self.config.seed.wrapping_add(trial as u64))?;
        let mut total_reward = 0.0;
        let mut steps = 0;

        while steps < self.config.max_steps {
            let action = brain.act(&observation)?;
            validate_action(&action, action_size)?;
            let outcome = environment.step(&action)?;
            total_reward += outcome.reward;
            steps += 1;
            if outcome.done {
                break;
            }
            observation = outcome.observation;
        }

        Ok(match self.config.fitness {
            FitnessKind::Reward => total_reward,
            FitnessKind::Survival => steps as f64,
        })
    }
}

impl<E: Environment, B: Brain + Clone> Problem<B> for BrainProblem<E> {
    fn evaluate(&self, brain: &B) -> EvoResult<f64> {
        self.evaluate_with(brain, &mut Attributes::new())
    }

    fn evaluate_with(&self, brain: &B, attributes: &mut Attributes) -> EvoResult<f64> {
        let mut scores = Vec::with_capacity(self.config.trials);
        let mut last_failure = None;

        for trial in 0..self.config.trials {
            match self.trial(brain, trial) {
                Ok(score) => scores.push(score),
                Err(e) => {
                    warn!("trial {} failed: {}", trial, e);
                    last_failure = Some(e);
                }
            }
        }

        let failed = self.config.trials - scores.len();
        attributes.set("failed_trials", failed);
        attributes.set(
            "trial_scores",
            AttributeValue::List(scores.iter().map(|&s| AttributeValue::Float(s)).collect()),
        );

        if scores.is_empty() {
            if let Some(last) = last_failure {
                return Err(EvolutionError::Unevaluable {
                    trials: self.config.trials,
                    last,
                });
            }
        }
        Ok(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brains::environment::StepOutcome;
    use crate::genome::bounds::{Bounds, MultiBounds};

    /// Counts steps; reward equals the action; fails on a configured seed
    #[derive(Clone, Debug)]
    struct Counter {
        length: usize,
        position: usize,
        failing_seed: Option<u64>,
    }

    impl Counter {
        fn new(length: usize) -> Self {
            Self {
                length,
                position: 0,
                failing_seed: None,
            }
        }
    }

    impl Environment for Counter {
        fn observation_bounds(&self) -> MultiBounds {
            MultiBounds::uniform(Bounds::new(0.0, self.length as f64), 1)
        }

        fn action_bounds(&self) -> MultiBounds {
            MultiBounds::uniform(Bounds::unit(), 1)
        }

        fn reset(&mut self, seed: u64) -> Result<Vec<f64>, TrialError> {
            if self.failing_seed == Some(seed) {
                return Err(TrialError::Environment(format!("seed {} refused", seed)));
            }
            self.position = 0;
            Ok(vec![0.0])
        }

        fn step(&mut self, action: &[f64]) -> Result<StepOutcome, TrialError> {
            self.position += 1;
            Ok(StepOutcome {
                observation: vec![self.position as f64],
                reward: action[0],
                done: self.position >= self.length,
            })
        }
    }

    #[derive(Clone, Debug)]
    struct Constant(Vec<f64>);

    impl Brain for Constant {
        fn act(&mut self, _observation: &[f64]) -> Result<Vec<f64>, TrialError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_reward_fitness() {
        let problem = BrainProblem::new(BrainProblemConfig::new(3, 100), Counter::new(10));
        let mut attrs = Attributes::new();
        let fitness = problem
            .evaluate_with(&Constant(vec![0.5]), &mut attrs)
            .unwrap();

        assert_eq!(fitness, 5.0);
        assert_eq!(attrs.get("failed_trials"), Some(&AttributeValue::Int(0)));
        assert_eq!(
            attrs.get("trial_scores").map(|v| v.to_string()),
            Some("[5.0, 5.0, 5.0]".to_string())
        );
    }

    #[test]
    fn test_step_limit() {
        let config = BrainProblemConfig::new(1, 4).with_fitness(FitnessKind::Survival);
        let problem = BrainProblem::new(config, Counter::new(10));
        assert_eq!(problem.evaluate(&Constant(vec![1.0])).unwrap(), 4.0);
    }

    #[test]
    fn test_failed_trials_are_excluded() {
        let mut env = Counter::new(2);
        env.failing_seed = Some(1);
        let problem = BrainProblem::new(BrainProblemConfig::new(3, 100), env);

        let mut attrs = Attributes::new();
        let fitness = problem
            .evaluate_with(&Constant(vec![1.0]), &mut attrs)
            .unwrap();
        assert_eq!(fitness, 2.0);
        assert_eq!(attrs.get("failed_trials"), Some(&AttributeValue::Int(1)));

        assert!(matches!(
            problem.run_trial(&Constant(vec![1.0]), 1),
            Err(EvolutionError::TrialFailure { trial: 1, .. })
        ));
    }

    #[test]
    fn test_all_trials_failing_is_unevaluable() {
        let problem = BrainProblem::new(BrainProblemConfig::new(2, 100), Counter::new(2));
        let err = problem.evaluate(&Constant(vec![0.5, 0.5])).unwrap_err();
        assert!(err.is_unevaluable());
        assert!(matches!(
            err,
            EvolutionError::Unevaluable {
                trials: 2,
                last: TrialError::InvalidAction {
                    expected: 1,
                    actual: 2
                }
            }
        ));
    }

    #[test]
    fn test_non_finite_action_fails_trial() {
        let problem = BrainProblem::new(BrainProblemConfig::new(1, 100), Counter::new(2));
        assert!(matches!(
            problem.run_trial(&Constant(vec![f64::INFINITY]), 0),
            Err(EvolutionError::TrialFailure {
                source: TrialError::NonFiniteAction(0),
                ..
            })
        ));
    }

    #[test]
    #[should_panic(expected = "At least one trial")]
    fn test_zero_trials_rejected() {
        BrainProblem::new(BrainProblemConfig::new(0, 10), Counter::new(1));
    }
}
