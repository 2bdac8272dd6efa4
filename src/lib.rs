//! # leap-evo
//!
//! A pipeline-oriented evolutionary algorithm engine.
//!
//! An evolutionary run is a chain of [`Stage`](operators::traits::Stage)s
//! that each take a population and hand back a new one. Genomes are turned
//! into phenotypes by a [`Decoder`](decoder::Decoder) and scored by a
//! [`Problem`](problem::traits::Problem); probes are stages that write CSV
//! as a side effect and pass the population through unchanged.
//!
//! ## Core Concepts
//!
//! - **Lazy runs**: an [`Engine`](engine::Engine) is an iterator that yields
//!   one generation per request and never exceeds its evaluation budget
//! - **Pluggable representations**: decoders map genomes to anything a
//!   problem can run, e.g. Pitt-style rule sets driving a cart-pole
//! - **Reproducibility**: every random choice draws from the run's seeded
//!   generator
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use leap_evo::prelude::*;
//!
//! let result = EngineBuilder::<RealVector, RealVector, _, _>::new()
//!     .population_size(20)
//!     .max_evaluations(2_000)
//!     .seed(42)
//!     .initializer(UniformRealInitializer::new(MultiBounds::symmetric(5.12, 10)))
//!     .decoder(IdentityDecoder)
//!     .problem(Sphere)
//!     .stage(TournamentSelection::new(20))
//!     .stage(Cloning::new())
//!     .stage(GaussianMutation::new(0.1, 0.5).with_hard_bounds((-5.12, 5.12)))
//!     .stage(CsvFitnessStatsProbe::new(std::io::stdout()))
//!     .build()?
//!     .run()?;
//! ```

pub mod brains;
pub mod decoder;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod genome;
pub mod operators;
pub mod population;
pub mod probe;
pub mod problem;
pub mod tuning;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::brains::prelude::*;
    pub use crate::decoder::*;
    pub use crate::diagnostics::prelude::*;
    pub use crate::engine::prelude::*;
    pub use crate::error::*;
    pub use crate::genome::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
    pub use crate::probe::prelude::*;
    pub use crate::problem::prelude::*;
    pub use crate::tuning::*;
}
