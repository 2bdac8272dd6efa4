//! Real-valued vector genome

use serde::{Deserialize, Serialize};

use crate::genome::traits::{Genome, RealValuedGenome};

/// Variable-length real-valued vector genome
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RealVector {
    genes: Vec<f64>,
}

impl RealVector {
    /// Create a new real vector with the given genes
    pub fn new(genes: Vec<f64>) -> Self {
        Self { genes }
    }

    /// Create a zero-filled vector of the given dimension
    pub fn zeros(dimension: usize) -> Self {
        Self {
            genes: vec![0.0; dimension],
        }
    }
}

impl Genome for RealVector {
    fn dimension(&self) -> usize {
        self.genes.len()
    }
}

impl RealValuedGenome for RealVector {
    fn genes(&self) -> &[f64] {
        &self.genes
    }

    fn genes_mut(&mut self) -> &mut [f64] {
        &mut self.genes
    }
}

impl From<Vec<f64>> for RealVector {
    fn from(genes: Vec<f64>) -> Self {
        Self::new(genes)
    }
}

impl std::ops::Index<usize> for RealVector {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.genes[index]
    }
}

impl std::fmt::Display for RealVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, gene) in self.genes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", gene)?;
        }
        write!(f, "]")
    }
}
