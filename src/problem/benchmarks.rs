//! Benchmark problems
//!
//! Standard test functions over real-valued vectors and bit strings.

use std::f64::consts::PI;

use crate::error::{EvoResult, EvolutionError, GenomeError};
use crate::genome::traits::{BinaryGenome, RealValuedGenome};
use crate::problem::traits::{Direction, Problem};

/// OneMax: count of set bits (maximize)
#[derive(Clone, Copy, Debug, Default)]
pub struct OneMax;

impl<G: BinaryGenome> Problem<G> for OneMax {
    fn evaluate(&self, phenotype: &G) -> EvoResult<f64> {
        Ok(phenotype.count_ones() as f64)
    }
}

/// Sphere function: f(x) = sum(x_i^2) (minimize)
#[derive(Clone, Copy, Debug, Default)]
pub struct Sphere;

impl<G: RealValuedGenome> Problem<G> for Sphere {
    fn evaluate(&self, phenotype: &G) -> EvoResult<f64> {
        Ok(phenotype.genes().iter().map(|x| x * x).sum())
    }

    fn direction(&self) -> Direction {
        Direction::Minimize
    }
}

/// Cosine family of multimodal functions on `[0, 1]^d` (maximize)
///
/// Each dimension has `global_optima_counts[i]` global and
/// `local_optima_counts[i]` local optima per global period; `alpha` scales
/// the depth of the local optima. The function is rescaled so that every
/// global optimum has fitness exactly 1.
#[derive(Clone, Debug)]
pub struct CosineFamily {
    alpha: f64,
    global_optima_counts: Vec<f64>,
    local_optima_counts: Vec<f64>,
}

impl CosineFamily {
    /// Create a cosine-family function
    pub fn new(
        alpha: f64,
        global_optima_counts: Vec<usize>,
        local_optima_counts: Vec<usize>,
    ) -> Result<Self, EvolutionError> {
        if global_optima_counts.len() != local_optima_counts.len() {
            return Err(EvolutionError::Configuration(format!(
                "cosine family needs one local optima count per dimension ({} global, {} local)",
                global_optima_counts.len(),
                local_optima_counts.len()
            )));
        }
        if alpha <= -1.0 {
            return Err(EvolutionError::Configuration(
                "cosine family alpha must be greater than -1".to_string(),
            ));
        }
        Ok(Self {
            alpha,
            global_optima_counts: global_optima_counts.into_iter().map(|c| c as f64).collect(),
            local_optima_counts: local_optima_counts.into_iter().map(|c| c as f64).collect(),
        })
    }

    /// Number of dimensions
    pub fn dimension(&self) -> usize {
        self.global_optima_counts.len()
    }

    /// Evaluate on a raw slice
    pub fn evaluate_raw(&self, x: &[f64]) -> Result<f64, GenomeError> {
        let d = self.dimension();
        if x.len() != d {
            return Err(GenomeError::malformed(d, x.len()));
        }
        let sum: f64 = x
            .iter()
            .zip(&self.global_optima_counts)
            .zip(&self.local_optima_counts)
            .map(|((&xi, &g), &l)| {
                let period = (g - 1.0) * 2.0 * PI;
                -(period * xi).cos() - self.alpha * (period * l * xi).cos()
            })
            .sum();
        let value = sum / (2.0 * d as f64);
        Ok(-2.0 / (self.alpha + 1.0) * value)
    }
}

impl<G: RealValuedGenome> Problem<G> for CosineFamily {
    fn evaluate(&self, phenotype: &G) -> EvoResult<f64> {
        Ok(self.evaluate_raw(phenotype.genes())?)
    }
}
