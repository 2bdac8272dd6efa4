//! Gene bounds
//!
//! Intervals constraining real-valued genes, used both to seed genomes and
//! as hard limits for mutation.

use serde::{Deserialize, Serialize};

use crate::error::GenomeError;

/// Closed interval `[min, max]` for one gene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Bounds {
    /// Create new bounds
    ///
    /// # Panics
    /// Panics if min > max or either end is NaN
    pub fn new(min: f64, max: f64) -> Self {
        assert!(
            min <= max,
            "Invalid bounds: min ({}) must be <= max ({})",
            min,
            max
        );
        Self { min, max }
    }

    /// Create bounds, reporting an inverted interval as an error
    pub fn try_new(min: f64, max: f64) -> Result<Self, GenomeError> {
        if min <= max {
            Ok(Self { min, max })
        } else {
            Err(GenomeError::InvalidStructure(format!(
                "bounds min ({}) must be <= max ({})",
                min, max
            )))
        }
    }

    /// Create symmetric bounds centered at 0
    pub fn symmetric(half_width: f64) -> Self {
        Self::new(-half_width, half_width)
    }

    /// Create unit bounds [0, 1]
    pub fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Width of the interval
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Check if a value is within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value into the interval
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl From<(f64, f64)> for Bounds {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

/// One interval per gene position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiBounds {
    /// Bounds for each gene
    pub bounds: Vec<Bounds>,
}

impl MultiBounds {
    /// Create per-gene bounds
    pub fn new(bounds: Vec<Bounds>) -> Self {
        Self { bounds }
    }

    /// The same interval for every gene
    pub fn uniform(bound: Bounds, dimension: usize) -> Self {
        Self {
            bounds: vec![bound; dimension],
        }
    }

    /// Symmetric interval for every gene
    pub fn symmetric(half_width: f64, dimension: usize) -> Self {
        Self::uniform(Bounds::symmetric(half_width), dimension)
    }

    /// Repeat a block of intervals `times` times
    ///
    /// Convenient for record-structured genomes such as rule sets, where
    /// every record shares the same per-field bounds.
    pub fn repeat(block: &[Bounds], times: usize) -> Self {
        Self {
            bounds: block
                .iter()
                .copied()
                .cycle()
                .take(block.len() * times)
                .collect(),
        }
    }

    /// Number of genes covered
    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    /// Bounds of one gene
    pub fn get(&self, index: usize) -> Option<&Bounds> {
        self.bounds.get(index)
    }

    /// Clamp every value into its gene's interval
    pub fn clamp_vec(&self, values: &mut [f64]) {
        for (value, b) in values.iter_mut().zip(&self.bounds) {
            *value = b.clamp(*value);
        }
    }

    /// Check that every value lies in its gene's interval
    pub fn contains_vec(&self, values: &[f64]) -> bool {
        values.len() == self.bounds.len()
            && values.iter().zip(&self.bounds).all(|(&v, b)| b.contains(v))
    }
}

impl FromIterator<Bounds> for MultiBounds {
    fn from_iter<I: IntoIterator<Item = Bounds>>(iter: I) -> Self {
        Self {
            bounds: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(f64, f64)> for MultiBounds {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        Self {
            bounds: iter.into_iter().map(Bounds::from).collect(),
        }
    }
}

/// Hard limits applied after a gene is perturbed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeneBounds {
    /// One interval shared by every gene
    Uniform(Bounds),
    /// A separate interval for each gene position
    PerGene(MultiBounds),
}

impl GeneBounds {
    /// Interval for gene `index`, if any
    pub fn for_gene(&self, index: usize) -> Option<&Bounds> {
        match self {
            Self::Uniform(b) => Some(b),
            Self::PerGene(mb) => mb.get(index),
        }
    }

    /// Check that a genome of `dimension` genes is covered by these bounds
    pub fn check_dimension(&self, dimension: usize) -> Result<(), GenomeError> {
        match self {
            Self::Uniform(_) => Ok(()),
            Self::PerGene(mb) if mb.dimension() == dimension => Ok(()),
            Self::PerGene(mb) => Err(GenomeError::DimensionMismatch {
                expected: mb.dimension(),
                actual: dimension,
            }),
        }
    }
}

impl From<Bounds> for GeneBounds {
    fn from(b: Bounds) -> Self {
        Self::Uniform(b)
    }
}

impl From<(f64, f64)> for GeneBounds {
    fn from(b: (f64, f64)) -> Self {
        Self::Uniform(Bounds::from(b))
    }
}

impl From<MultiBounds> for GeneBounds {
    fn from(mb: MultiBounds) -> Self {
        Self::PerGene(mb)
    }
}
