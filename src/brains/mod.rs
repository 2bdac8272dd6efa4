//! Evolving controllers
//!
//! Brains are phenotypes that map observations to actions. This module
//! provides the environment and brain contracts, a problem that scores
//! brains by running them in an environment, the Pitt-style rule-set
//! decoder, a random baseline brain and the cart-pole environment.

pub mod cart_pole;
pub mod environment;
pub mod pitt;
pub mod problem;
pub mod random;

pub mod prelude {
    pub use super::cart_pole::*;
    pub use super::environment::*;
    pub use super::pitt::*;
    pub use super::problem::*;
    pub use super::random::*;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::decoder::Decoder;
    use crate::genome::real_vector::RealVector;
    use crate::problem::traits::Problem;

    #[test]
    fn test_pitt_brain_in_cart_pole() {
        let env = CartPole::default();
        let config = PittRulesConfig::new(env.observation_size(), env.action_size());

        // Push in the direction the pole is rotating: right while
        // theta_dot >= 0, otherwise left
        let wide = [-10.0, 10.0];
        let mut genes = Vec::new();
        for (theta_dot, push) in [([0.0, 10.0], 1.0), ([-10.0, 0.0], 0.0)] {
            genes.extend_from_slice(&wide);
            genes.extend_from_slice(&wide);
            genes.extend_from_slice(&wide);
            genes.extend_from_slice(&theta_dot);
            genes.push(push);
        }

        let brain = PittRulesDecoder::new(config)
            .decode(&RealVector::new(genes))
            .unwrap();
        let problem = BrainProblem::new(
            BrainProblemConfig::new(3, 100).with_fitness(FitnessKind::Survival),
            env,
        );
        assert_eq!(problem.evaluate(&brain).unwrap(), 100.0);

        let random = RandomBrain::new(problem.environment().action_bounds(), 1);
        assert!(problem.evaluate(&random).unwrap() < 100.0);
    }
}
