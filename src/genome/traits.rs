//! Genome traits
//!
//! The engine only needs genomes to be cloneable (cloning deep-copies their
//! storage). Representation-specific operators rely on the narrower traits.

use std::fmt::Debug;

/// A value that can be evolved
///
/// `Clone` must produce independent storage: mutating a clone never changes
/// the original.
pub trait Genome: Clone + Debug {
    /// Number of genes
    fn dimension(&self) -> usize;
}

/// Genome made of real-valued genes
pub trait RealValuedGenome: Genome {
    /// Get the genes as a slice
    fn genes(&self) -> &[f64];

    /// Get mutable access to the genes
    fn genes_mut(&mut self) -> &mut [f64];
}

/// Genome made of bits
pub trait BinaryGenome: Genome {
    /// Get the bits as a slice
    fn bits(&self) -> &[bool];

    /// Get mutable access to the bits
    fn bits_mut(&mut self) -> &mut [bool];

    /// Count the number of set bits
    fn count_ones(&self) -> usize {
        self.bits().iter().filter(|&&b| b).count()
    }
}

impl Genome for Vec<f64> {
    fn dimension(&self) -> usize {
        self.len()
    }
}

impl RealValuedGenome for Vec<f64> {
    fn genes(&self) -> &[f64] {
        self
    }

    fn genes_mut(&mut self) -> &mut [f64] {
        self
    }
}

impl Genome for Vec<bool> {
    fn dimension(&self) -> usize {
        self.len()
    }
}

impl BinaryGenome for Vec<bool> {
    fn bits(&self) -> &[bool] {
        self
    }

    fn bits_mut(&mut self) -> &mut [bool] {
        self
    }
}
