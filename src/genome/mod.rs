//! Genome representations
//!
//! Genomes are opaque to the engine: only decoders and representation-aware
//! operators look inside them. This module ships real-valued vectors and bit
//! strings, per-gene bounds, and the initializers that seed generation 0.

pub mod bit_string;
pub mod bounds;
pub mod initializer;
pub mod real_vector;
pub mod traits;

pub mod prelude {
    pub use super::bit_string::*;
    pub use super::bounds::*;
    pub use super::initializer::*;
    pub use super::real_vector::*;
    pub use super::traits::*;
}
