//! Random baseline controller

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::brains::environment::Brain;
use crate::error::TrialError;
use crate::genome::bounds::MultiBounds;

/// Acts uniformly at random inside the action bounds
///
/// The generator is reseeded on every reset, so each episode sees the same
/// action sequence.
#[derive(Clone, Debug)]
pub struct RandomBrain {
    action_bounds: MultiBounds,
    seed: u64,
    rng: StdRng,
}

impl RandomBrain {
    /// Create a random brain for actions within `action_bounds`
    pub fn new(action_bounds: MultiBounds, seed: u64) -> Self {
        Self {
            action_bounds,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Brain for RandomBrain {
    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    fn act(&mut self, _observation: &[f64]) -> Result<Vec<f64>, TrialError> {
        Ok(self
            .action_bounds
            .bounds
            .iter()
            .map(|b| self.rng.gen_range(b.min..=b.max))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brains::cart_pole::CartPole;
    use crate::brains::environment::Environment;
    use crate::brains::problem::{BrainProblem, BrainProblemConfig};
    use crate::problem::traits::Problem;

    #[test]
    fn test_actions_within_bounds() {
        let bounds = MultiBounds::symmetric(2.0, 3);
        let mut brain = RandomBrain::new(bounds.clone(), 9);
        for _ in 0..20 {
            let action = brain.act(&[]).unwrap();
            assert!(bounds.contains_vec(&action));
        }
    }

    #[test]
    fn test_reset_replays_actions() {
        let mut brain = RandomBrain::new(MultiBounds::symmetric(1.0, 2), 3);
        let first = brain.act(&[]).unwrap();
        brain.act(&[]).unwrap();
        brain.reset();
        assert_eq!(brain.act(&[]).unwrap(), first);
    }

    #[test]
    fn test_random_brain_balances_briefly() {
        let env = CartPole::default();
        let brain = RandomBrain::new(env.action_bounds(), 0);
        let problem = BrainProblem::new(BrainProblemConfig::new(5, 200), env);

        let fitness = problem.evaluate(&brain).unwrap();
        assert!(fitness >= 1.0);
        assert!(fitness < 200.0);
    }
}
