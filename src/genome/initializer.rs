//! Generation-0 initializers
//!
//! An initializer produces one fresh genome per call. The engine calls it
//! `population_size` times with the run's RNG to seed the first population.

use rand::rngs::StdRng;
use rand::Rng;

use crate::genome::bounds::MultiBounds;

/// Produces genomes for the initial population
pub trait Initializer<G> {
    /// Create one genome
    fn initialize(&self, rng: &mut StdRng) -> G;

    /// Create `count` genomes
    fn initialize_many(&self, count: usize, rng: &mut StdRng) -> Vec<G> {
        (0..count).map(|_| self.initialize(rng)).collect()
    }
}

/// Draws each gene uniformly from its own `(lo, hi)` interval
#[derive(Clone, Debug)]
pub struct UniformRealInitializer {
    bounds: MultiBounds,
}

impl UniformRealInitializer {
    /// Create from per-gene bounds
    pub fn new(bounds: MultiBounds) -> Self {
        Self { bounds }
    }

    /// Bounds used for sampling
    pub fn bounds(&self) -> &MultiBounds {
        &self.bounds
    }
}

impl<G: From<Vec<f64>>> Initializer<G> for UniformRealInitializer {
    fn initialize(&self, rng: &mut StdRng) -> G {
        let genes: Vec<f64> = self
            .bounds
            .bounds
            .iter()
            .map(|b| rng.gen_range(b.min..=b.max))
            .collect();
        G::from(genes)
    }
}

/// Draws each bit independently with probability one half
#[derive(Clone, Debug)]
pub struct RandomBitInitializer {
    length: usize,
}

impl RandomBitInitializer {
    /// Create an initializer for bit strings of `length` bits
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl<G: From<Vec<bool>>> Initializer<G> for RandomBitInitializer {
    fn initialize(&self, rng: &mut StdRng) -> G {
        G::from((0..self.length).map(|_| rng.gen_bool(0.5)).collect::<Vec<bool>>())
    }
}

/// Wraps a closure as an initializer
pub struct FnInitializer<F> {
    f: F,
}

impl<F> FnInitializer<F> {
    /// Create from a closure taking the run's RNG
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<G, F> Initializer<G> for FnInitializer<F>
where
    F: Fn(&mut StdRng) -> G,
{
    fn initialize(&self, rng: &mut StdRng) -> G {
        (self.f)(rng)
    }
}
