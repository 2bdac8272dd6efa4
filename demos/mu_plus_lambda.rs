//! (mu + lambda) evolution on OneMax
//!
//! Each generation the best `MU` individuals survive as parents and every
//! parent contributes `LAMBDA / MU` mutated offspring. The run settings
//! are read from JSON the same way a configuration file would be.

use leap_evo::prelude::*;

const GENOME_LENGTH: usize = 64;
const MU: usize = 5;
const LAMBDA: usize = 20;

const CONFIG: &str = r#"{
    "population_size": 25,
    "max_generations": 60,
    "seed": 2024
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== (mu + lambda) on OneMax ===\n");
    let config = EngineConfig::from_json(CONFIG)?;
    println!("Configuration: {}", config.to_json()?);

    let engine = EngineBuilder::<BitString, BitString, _, _>::from_config(config)
        .initializer(RandomBitInitializer::new(GENOME_LENGTH))
        .decoder(IdentityDecoder)
        .problem(OneMax)
        .mu_plus_lambda(TruncationSelection::new(MU))
        .stage(Cloning::new().with_offspring_per_ind(LAMBDA / MU))
        .stage(BitFlipMutation::new(1.0 / GENOME_LENGTH as f64))
        .build()?;

    for generation in engine {
        let generation = generation?;
        let best = generation.best()?;
        if generation.index % 10 == 0 {
            println!(
                "Generation {:3}: best {:2} ones ({} evaluations)",
                generation.index,
                best.fitness()?,
                generation.evaluations
            );
        }
        if best.fitness()? >= GENOME_LENGTH as f64 {
            println!("Optimum found in generation {}", generation.index);
            println!("Genome: {}", best.genome());
            break;
        }
    }

    Ok(())
}
