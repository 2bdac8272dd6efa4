//! Decoders: genome to phenotype
//!
//! A decoder is a pure, deterministic mapping from a genome to the value a
//! problem knows how to run. Decoders reject genomes of the wrong shape with
//! [`GenomeError::MalformedGenome`] instead of truncating or padding.

use crate::error::GenomeError;

/// Maps genomes to phenotypes
pub trait Decoder<G> {
    /// The decoded form
    type Phenotype;

    /// Decode a genome
    fn decode(&self, genome: &G) -> Result<Self::Phenotype, GenomeError>;
}

impl<G, D: Decoder<G> + ?Sized> Decoder<G> for &D {
    type Phenotype = D::Phenotype;

    fn decode(&self, genome: &G) -> Result<Self::Phenotype, GenomeError> {
        (**self).decode(genome)
    }
}

/// Decoder whose phenotype is a copy of the genome
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityDecoder;

impl<G: Clone> Decoder<G> for IdentityDecoder {
    type Phenotype = G;

    fn decode(&self, genome: &G) -> Result<G, GenomeError> {
        Ok(genome.clone())
    }
}

/// Identity decoder that also checks the genome length
#[derive(Clone, Copy, Debug)]
pub struct FixedLengthDecoder {
    length: usize,
}

impl FixedLengthDecoder {
    /// Accept only genomes of exactly `length` genes
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl<G: crate::genome::traits::Genome> Decoder<G> for FixedLengthDecoder {
    type Phenotype = G;

    fn decode(&self, genome: &G) -> Result<G, GenomeError> {
        if genome.dimension() != self.length {
            return Err(GenomeError::malformed(self.length, genome.dimension()));
        }
        Ok(genome.clone())
    }
}
