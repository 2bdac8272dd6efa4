//! Problems: phenotype to fitness
//!
//! A problem runs a phenotype, reduces whatever it observes to one scalar
//! fitness, and declares whether larger or smaller fitness is better.

pub mod benchmarks;
pub mod traits;

pub mod prelude {
    pub use super::benchmarks::*;
    pub use super::traits::*;
}
