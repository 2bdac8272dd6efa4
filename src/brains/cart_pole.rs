//! Cart-pole balancing environment
//!
//! The classic control task: a pole is hinged on a cart moving along a
//! track, and the controller pushes the cart left or right to keep the pole
//! upright. Every step earns a reward of 1 until the pole falls past the
//! angle threshold or the cart leaves the track.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::brains::environment::{validate_action, Environment, StepOutcome};
use crate::error::TrialError;
use crate::genome::bounds::{Bounds, MultiBounds};

/// Physical constants of the cart-pole system
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartPoleConfig {
    /// Gravitational acceleration
    pub gravity: f64,
    /// Mass of the cart
    pub cart_mass: f64,
    /// Mass of the pole
    pub pole_mass: f64,
    /// Half the pole's length
    pub pole_half_length: f64,
    /// Magnitude of the push applied each step
    pub force: f64,
    /// Seconds between state updates
    pub tau: f64,
    /// Pole angle (radians) beyond which the episode ends
    pub angle_threshold: f64,
    /// Cart position beyond which the episode ends
    pub position_threshold: f64,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            cart_mass: 1.0,
            pole_mass: 0.1,
            pole_half_length: 0.5,
            force: 10.0,
            tau: 0.02,
            angle_threshold: 12.0 * 2.0 * PI / 360.0,
            position_threshold: 2.4,
        }
    }
}

/// Cart-pole environment
///
/// Observations are `[x, x_dot, theta, theta_dot]`. The single action value
/// pushes right when it is at least 0.5 and left otherwise.
#[derive(Clone, Debug)]
pub struct CartPole {
    config: CartPoleConfig,
    state: [f64; 4],
    done: bool,
}

impl CartPole {
    /// Create an environment with the given constants
    pub fn new(config: CartPoleConfig) -> Self {
        Self {
            config,
            state: [0.0; 4],
            done: true,
        }
    }

    /// Current state `[x, x_dot, theta, theta_dot]`
    pub fn state(&self) -> [f64; 4] {
        self.state
    }

    fn is_terminal(&self) -> bool {
        let [x, _, theta, _] = self.state;
        x.abs() > self.config.position_threshold || theta.abs() > self.config.angle_threshold
    }
}

impl Default for CartPole {
    fn default() -> Self {
        Self::new(CartPoleConfig::default())
    }
}

impl Environment for CartPole {
    fn observation_bounds(&self) -> MultiBounds {
        MultiBounds::new(vec![
            Bounds::symmetric(self.config.position_threshold),
            Bounds::symmetric(3.0),
            Bounds::symmetric(self.config.angle_threshold),
            Bounds::symmetric(3.5),
        ])
    }

    fn action_bounds(&self) -> MultiBounds {
        MultiBounds::uniform(Bounds::unit(), 1)
    }

    fn reset(&mut self, seed: u64) -> Result<Vec<f64>, TrialError> {
        let mut rng = StdRng::seed_from_u64(seed);
        for value in self.state.iter_mut() {
            *value = rng.gen_range(-0.05..=0.05);
        }
        self.done = false;
        Ok(self.state.to_vec())
    }

    fn step(&mut self, action: &[f64]) -> Result<StepOutcome, TrialError> {
        if self.done {
            return Err(TrialError::Environment(
                "step called on a finished episode".to_string(),
            ));
        }
        validate_action(action, 1)?;

        let c = &self.config;
        let force = if action[0] >= 0.5 { c.force } else { -c.force };
        let [x, x_dot, theta, theta_dot] = self.state;

        let total_mass = c.cart_mass + c.pole_mass;
        let pole_mass_length = c.pole_mass * c.pole_half_length;
        let (sin, cos) = theta.sin_cos();

        let temp = (force + pole_mass_length * theta_dot * theta_dot * sin) / total_mass;
        let theta_acc = (c.gravity * sin - cos * temp)
            / (c.pole_half_length * (4.0 / 3.0 - c.pole_mass * cos * cos / total_mass));
        let x_acc = temp - pole_mass_length * theta_acc * cos / total_mass;

        // Explicit Euler integration
        self.state = [
            x + c.tau * x_dot,
            x_dot + c.tau * x_acc,
            theta + c.tau * theta_dot,
            theta_dot + c.tau * theta_acc,
        ];
        self.done = self.is_terminal();

        Ok(StepOutcome {
            observation: self.state.to_vec(),
            reward: 1.0,
            done: self.done,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_is_seeded() {
        let mut a = CartPole::default();
        let mut b = CartPole::default();
        let obs_a = a.reset(42).unwrap();
        assert_eq!(obs_a, b.reset(42).unwrap());
        assert_eq!(obs_a.len(), 4);
        assert!(obs_a.iter().all(|v| v.abs() <= 0.05));
    }

    #[test]
    fn test_step_before_reset_fails() {
        let mut env = CartPole::default();
        assert!(matches!(
            env.step(&[1.0]),
            Err(TrialError::Environment(_))
        ));
    }

    #[test]
    fn test_constant_push_ends_episode() {
        let mut env = CartPole::default();
        env.reset(0).unwrap();

        let mut steps = 0;
        loop {
            let outcome = env.step(&[1.0]).unwrap();
            steps += 1;
            assert_eq!(outcome.reward, 1.0);
            if outcome.done {
                break;
            }
            assert!(steps < 500, "pole never fell");
        }
        assert!(env.step(&[1.0]).is_err());
    }

    #[test]
    fn test_push_direction() {
        let mut env = CartPole::default();
        env.reset(7).unwrap();
        let before = env.state()[1];
        env.step(&[0.9]).unwrap();
        assert!(env.state()[1] > before);

        env.reset(7).unwrap();
        env.step(&[0.1]).unwrap();
        assert!(env.state()[1] < before);
    }

    #[test]
    fn test_rejects_bad_action() {
        let mut env = CartPole::default();
        env.reset(0).unwrap();
        assert!(matches!(
            env.step(&[0.0, 1.0]),
            Err(TrialError::InvalidAction { .. })
        ));
    }
}
