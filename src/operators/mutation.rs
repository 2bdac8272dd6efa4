//! Mutation operators
//!
//! Mutation edits genomes in place through [`Individual::genome_mut`], so a
//! mutated individual loses its phenotype and fitness. Individuals whose
//! genes were all left alone keep both.
//!
//! [`Individual::genome_mut`]: crate::population::individual::Individual::genome_mut

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{EvoResult, EvolutionError};
use crate::genome::bounds::GeneBounds;
use crate::genome::traits::{BinaryGenome, RealValuedGenome};
use crate::operators::traits::{PipelineContext, Stage};
use crate::population::population::Population;

/// Gaussian mutation
///
/// Each gene independently, with probability `probability`, receives
/// additive noise drawn from `N(0, std)`. With hard bounds configured
/// every gene is clamped into its interval afterwards, so out-of-range genes
/// are pulled back even when no noise was added. Only individuals whose
/// genes actually changed are invalidated. Genome length never changes.
#[derive(Clone, Debug)]
pub struct GaussianMutation {
    /// Per-gene mutation probability
    pub probability: f64,
    /// Standard deviation of the Gaussian noise
    pub std: f64,
    /// Optional limits applied after perturbation
    pub hard_bounds: Option<GeneBounds>,
}

impl GaussianMutation {
    /// Create a Gaussian mutation
    pub fn new(probability: f64, std: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&probability),
            "Probability must be in [0, 1]"
        );
        assert!(std >= 0.0, "Standard deviation must be non-negative");
        Self {
            probability,
            std,
            hard_bounds: None,
        }
    }

    /// Clamp every gene into `bounds` after mutation
    pub fn with_hard_bounds(mut self, bounds: impl Into<GeneBounds>) -> Self {
        self.hard_bounds = Some(bounds.into());
        self
    }

    fn normal(&self) -> EvoResult<Normal<f64>> {
        Normal::new(0.0, self.std).map_err(|e| {
            EvolutionError::Configuration(format!("invalid mutation std {}: {}", self.std, e))
        })
    }
}

impl<G: RealValuedGenome, P> Stage<G, P> for GaussianMutation {
    fn name(&self) -> &str {
        "mutate_gaussian"
    }

    fn apply(
        &mut self,
        mut population: Population<G, P>,
        ctx: &mut PipelineContext,
    ) -> EvoResult<Population<G, P>> {
        let normal = self.normal()?;
        let mut changes: Vec<(usize, f64)> = Vec::new();

        for (i, individual) in population.iter_mut().enumerate() {
            let genes = individual.genome().genes();
            if let Some(bounds) = &self.hard_bounds {
                bounds
                    .check_dimension(genes.len())
                    .map_err(|e| EvolutionError::from(e).at_individual(i))?;
            }

            // Hard bounds hold for every gene, perturbed or not
            changes.clear();
            for (gene, &current) in genes.iter().enumerate() {
                let mut value = current;
                if ctx.rng.gen::<f64>() < self.probability {
                    value += normal.sample(&mut ctx.rng);
                }
                if let Some(b) = self.hard_bounds.as_ref().and_then(|hb| hb.for_gene(gene)) {
                    value = b.clamp(value);
                }
                if value != current {
                    changes.push((gene, value));
                }
            }
            if changes.is_empty() {
                continue;
            }

            let genes = individual.genome_mut().genes_mut();
            for &(gene, value) in &changes {
                genes[gene] = value;
            }
        }
        Ok(population)
    }
}

/// Bit-flip mutation
///
/// Flips each bit independently with probability `probability`.
#[derive(Clone, Debug)]
pub struct BitFlipMutation {
    /// Per-bit flip probability
    pub probability: f64,
}

impl BitFlipMutation {
    /// Create a bit-flip mutation
    pub fn new(probability: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&probability),
            "Probability must be in [0, 1]"
        );
        Self { probability }
    }
}

impl<G: BinaryGenome, P> Stage<G, P> for BitFlipMutation {
    fn name(&self) -> &str {
        "mutate_bitflip"
    }

    fn apply(
        &mut self,
        mut population: Population<G, P>,
        ctx: &mut PipelineContext,
    ) -> EvoResult<Population<G, P>> {
        let mut flips: Vec<usize> = Vec::new();
        for individual in population.iter_mut() {
            flips.clear();
            for bit in 0..individual.genome().bits().len() {
                if ctx.rng.gen::<f64>() < self.probability {
                    flips.push(bit);
                }
            }
            if flips.is_empty() {
                continue;
            }
            let bits = individual.genome_mut().bits_mut();
            for &bit in &flips {
                bits[bit] = !bits[bit];
            }
        }
        Ok(population)
    }
}
