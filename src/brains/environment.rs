//! Environment and controller contracts
//!
//! An [`Environment`] is an episodic simulation driven one action at a time.
//! A [`Brain`] maps observations to actions and may keep internal state
//! between steps of one episode. Problems run brains inside environments to
//! score them.

use crate::error::TrialError;
use crate::genome::bounds::MultiBounds;

/// Result of one environment step
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    /// Observation after the action
    pub observation: Vec<f64>,
    /// Reward earned by the action
    pub reward: f64,
    /// Whether the episode has ended
    pub done: bool,
}

/// An episodic simulation
///
/// Problems clone the prototype environment for every trial, so `Clone`
/// must produce an independent simulation.
pub trait Environment: Clone {
    /// Ranges of the observation values, one interval per value
    fn observation_bounds(&self) -> MultiBounds;

    /// Ranges of the action values, one interval per value
    fn action_bounds(&self) -> MultiBounds;

    /// Number of observation values
    fn observation_size(&self) -> usize {
        self.observation_bounds().dimension()
    }

    /// Number of action values
    fn action_size(&self) -> usize {
        self.action_bounds().dimension()
    }

    /// Start a new episode and return the first observation
    ///
    /// The same seed must produce the same episode.
    fn reset(&mut self, seed: u64) -> Result<Vec<f64>, TrialError>;

    /// Apply an action
    fn step(&mut self, action: &[f64]) -> Result<StepOutcome, TrialError>;
}

/// A controller mapping observations to actions
pub trait Brain {
    /// Clear per-episode state before a new episode
    fn reset(&mut self) {}

    /// Choose an action for an observation
    fn act(&mut self, observation: &[f64]) -> Result<Vec<f64>, TrialError>;
}

impl<B: Brain + ?Sized> Brain for Box<B> {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn act(&mut self, observation: &[f64]) -> Result<Vec<f64>, TrialError> {
        (**self).act(observation)
    }
}

/// Check an action against the environment's action shape
pub fn validate_action(action: &[f64], expected: usize) -> Result<(), TrialError> {
    if action.len() != expected {
        return Err(TrialError::InvalidAction {
            expected,
            actual: action.len(),
        });
    }
    match action.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(TrialError::NonFiniteAction(index)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_action() {
        assert!(validate_action(&[0.5], 1).is_ok());
        assert_eq!(
            validate_action(&[0.5, 0.5], 1),
            Err(TrialError::InvalidAction {
                expected: 1,
                actual: 2
            })
        );
        assert_eq!(
            validate_action(&[0.0, f64::NAN], 2),
            Err(TrialError::NonFiniteAction(1))
        );
    }
}
