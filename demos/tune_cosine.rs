//! Tuning mutation parameters on a cosine-family landscape
//!
//! Random search over the Gaussian mutation probability and step size.
//! Each sampled configuration is scored by the area under its
//! best-fitness curve, averaged over several independent runs.

use leap_evo::prelude::*;

const DIMENSION: usize = 4;
const POPULATION_SIZE: usize = 10;
const MAX_EVALUATIONS: usize = 500;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Random Search Tuning ===\n");

    let problem = CosineFamily::new(0.3, vec![2; DIMENSION], vec![5; DIMENSION])?;

    let algorithm = |config: &Configuration, seed: u64| -> EvoResult<(Vec<f64>, Vec<f64>)> {
        let engine = EngineBuilder::<RealVector, RealVector, _, _>::new()
            .population_size(POPULATION_SIZE)
            .max_evaluations(MAX_EVALUATIONS)
            .seed(seed)
            .initializer(UniformRealInitializer::new(MultiBounds::uniform(
                Bounds::unit(),
                DIMENSION,
            )))
            .decoder(IdentityDecoder)
            .problem(&problem)
            .stage(TournamentSelection::new(POPULATION_SIZE))
            .stage(Cloning::new())
            .stage(
                GaussianMutation::new(config["mutation_prob"], config["mutation_std"])
                    .with_hard_bounds(Bounds::unit()),
            )
            .build()?;
        fitness_curve(engine)
    };

    let tuner = tune_random(
        algorithm,
        area_under_curve,
        [
            ("mutation_prob", Bounds::new(0.01, 0.5)),
            ("mutation_std", Bounds::new(0.005, 0.3)),
        ],
    )
    .with_samples(20)
    .with_tests_per_sample(3)
    .with_seed(9);

    for (i, step) in tuner.enumerate() {
        let (score, config) = step?;
        println!(
            "Sample {:2}: best AUC {:8.2}  prob {:.3}  std {:.3}",
            i + 1,
            score,
            config["mutation_prob"],
            config["mutation_std"]
        );
    }

    Ok(())
}
