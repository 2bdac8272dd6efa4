//! Evolving Pitt-style rule sets for cart-pole
//!
//! This example evolves a fixed number of condition-action rules that
//! balance a pole on a cart. Fitness statistics stream to stdout as CSV and
//! the attributes of each generation's best individual go to a file.
//!
//! Run with `RUST_LOG=info` to see per-generation progress.

use std::fs::File;
use std::io::BufWriter;

use leap_evo::prelude::*;

const NUM_RULES: usize = 4;
const POPULATION_SIZE: usize = 20;
const MAX_EVALUATIONS: usize = 1_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let problem = BrainProblem::new(
        BrainProblemConfig::new(3, 200)
            .with_seed(7)
            .with_fitness(FitnessKind::Survival),
        CartPole::default(),
    );
    let env = problem.environment();

    let config = PittRulesConfig::new(env.observation_size(), env.action_size())
        .with_priority(PriorityMetric::Specificity);
    let bounds = config.genome_bounds(
        NUM_RULES,
        &env.observation_bounds(),
        &env.action_bounds(),
        Bounds::unit(),
    )?;
    let decoder = PittRulesDecoder::new(config);

    let attributes_file = BufWriter::new(File::create("cart_pole_best.csv")?);

    let result = EngineBuilder::<RealVector, PittRulesBrain, _, _>::new()
        .population_size(POPULATION_SIZE)
        .max_evaluations(MAX_EVALUATIONS)
        .seed(42)
        .initializer(UniformRealInitializer::new(bounds.clone()))
        .decoder(&decoder)
        .problem(&problem)
        .stage(CsvFitnessStatsProbe::new(std::io::stdout()))
        .stage(
            CsvAttributesProbe::new(attributes_file, ["failed_trials", "trial_scores"])
                .best_only(true)
                .with_fitness(true),
        )
        .stage(TournamentSelection::new(POPULATION_SIZE).with_tournament_size(3))
        .stage(Cloning::new())
        .stage(GaussianMutation::new(0.1, 0.05).with_hard_bounds(GeneBounds::PerGene(bounds)))
        .build()?
        .run()?;

    println!("\n=== Results ===");
    println!("{}", result.stats.summary());
    println!("Best survival: {:.1} steps", result.best_fitness);

    let brain = decoder.decode(result.best_genome())?;
    for (i, rule) in brain.rules().iter().enumerate() {
        println!("Rule {}: {:?} -> {:?}", i, rule.conditions, rule.actions);
    }

    Ok(())
}
