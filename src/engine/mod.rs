//! The pipeline engine
//!
//! This module provides the builder, the configuration and the lazy
//! generation iterator that drives a run.

pub mod builder;
pub mod config;
#[allow(clippy::module_inception)]
pub mod engine;

pub use builder::EngineBuilder;
pub use config::EngineConfig;
pub use engine::{Engine, EngineState, Generation, PopulationModel};

pub mod prelude {
    pub use super::builder::*;
    pub use super::config::*;
    pub use super::engine::*;
}
