//! Individual wrapper type
//!
//! An individual couples a genome with its lazily decoded phenotype, its
//! fitness and a bag of attributes. Genome storage is reference counted:
//! cloning an `Individual` (as selection does) shares the genome, while
//! [`Individual::offspring`] deep-copies it. Every mutable access to the
//! genome goes through copy-on-write and drops the cached phenotype and
//! fitness.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::decoder::Decoder;
use crate::error::{EvoResult, EvolutionError};
use crate::population::attributes::Attributes;
use crate::problem::traits::{Direction, Problem};

/// An individual in the population
#[derive(Debug)]
pub struct Individual<G, P = G> {
    genome: Arc<G>,
    phenotype: Option<Arc<P>>,
    fitness: Option<f64>,
    /// Bookkeeping attributes read by probes
    pub attributes: Attributes,
}

impl<G, P> Clone for Individual<G, P> {
    /// Shallow clone: the genome and phenotype are shared, not copied
    fn clone(&self) -> Self {
        Self {
            genome: Arc::clone(&self.genome),
            phenotype: self.phenotype.clone(),
            fitness: self.fitness,
            attributes: self.attributes.clone(),
        }
    }
}

impl<G, P> Individual<G, P> {
    /// Create a new individual with an unevaluated genome
    pub fn new(genome: G) -> Self {
        Self {
            genome: Arc::new(genome),
            phenotype: None,
            fitness: None,
            attributes: Attributes::new(),
        }
    }

    /// Create a new individual with a known fitness
    pub fn with_fitness(genome: G, fitness: f64) -> Self {
        Self {
            fitness: Some(fitness),
            ..Self::new(genome)
        }
    }

    /// Get a reference to the genome
    pub fn genome(&self) -> &G {
        &self.genome
    }

    /// Replace the genome, invalidating phenotype and fitness
    pub fn set_genome(&mut self, genome: G) {
        self.genome = Arc::new(genome);
        self.invalidate();
    }

    /// The cached phenotype, if the genome has been decoded
    pub fn phenotype(&self) -> Option<&P> {
        self.phenotype.as_deref()
    }

    /// Check if this individual has been evaluated
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Get the fitness value
    ///
    /// Fails with [`EvolutionError::UnevaluatedFitness`] if the individual
    /// has not been evaluated since it was created or last modified.
    pub fn fitness(&self) -> EvoResult<f64> {
        self.fitness.ok_or(EvolutionError::UnevaluatedFitness)
    }

    /// Get the fitness value if present
    pub fn fitness_opt(&self) -> Option<f64> {
        self.fitness
    }

    /// Set the fitness value
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Drop the cached phenotype and fitness
    pub fn invalidate(&mut self) {
        self.phenotype = None;
        self.fitness = None;
    }

    /// Whether two individuals share the same genome storage
    pub fn shares_genome_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.genome, &other.genome)
    }

    /// Decode the genome if no phenotype is cached
    pub fn decode<D>(&mut self, decoder: &D) -> EvoResult<&P>
    where
        D: Decoder<G, Phenotype = P> + ?Sized,
    {
        let phenotype = self.cached_phenotype(decoder)?;
        let phenotype: &P = self.phenotype.insert(phenotype);
        Ok(phenotype)
    }

    /// The cached phenotype, decoding it first if absent
    fn cached_phenotype<D>(&mut self, decoder: &D) -> EvoResult<Arc<P>>
    where
        D: Decoder<G, Phenotype = P> + ?Sized,
    {
        match &self.phenotype {
            Some(p) => Ok(Arc::clone(p)),
            None => Ok(Arc::new(decoder.decode(&self.genome)?)),
        }
    }

    /// Evaluate this individual
    ///
    /// Decodes the genome if needed, runs the problem on the phenotype and
    /// stores the fitness. Already evaluated individuals are evaluated
    /// again. Returns `self` to allow chaining.
    pub fn evaluate<D, Pr>(&mut self, decoder: &D, problem: &Pr) -> EvoResult<&mut Self>
    where
        D: Decoder<G, Phenotype = P> + ?Sized,
        Pr: Problem<P> + ?Sized,
    {
        let phenotype = self.cached_phenotype(decoder)?;
        self.phenotype = Some(Arc::clone(&phenotype));
        let fitness = problem.evaluate_with(&*phenotype, &mut self.attributes)?;
        self.fitness = Some(fitness);
        Ok(self)
    }

    /// Compare with another individual; `Greater` means `self` is better
    pub fn compare(&self, other: &Self, direction: Direction) -> EvoResult<Ordering> {
        Ok(direction.compare(self.fitness()?, other.fitness()?))
    }

    /// Check if this individual is strictly better than another
    pub fn is_better_than(&self, other: &Self, direction: Direction) -> EvoResult<bool> {
        Ok(self.compare(other, direction)? == Ordering::Greater)
    }
}

impl<G: Clone, P> Individual<G, P> {
    /// Get a mutable reference to the genome
    ///
    /// Copies the genome first if its storage is shared, and invalidates
    /// phenotype and fitness.
    pub fn genome_mut(&mut self) -> &mut G {
        self.invalidate();
        Arc::make_mut(&mut self.genome)
    }

    /// Take the genome out of this individual
    pub fn into_genome(self) -> G {
        Arc::try_unwrap(self.genome).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Produce an independent offspring
    ///
    /// The genome is deep-copied into fresh storage and the attributes are
    /// copied; fitness and phenotype start out absent.
    pub fn offspring(&self) -> Self {
        Self {
            genome: Arc::new((*self.genome).clone()),
            phenotype: None,
            fitness: None,
            attributes: self.attributes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{FixedLengthDecoder, IdentityDecoder};
    use crate::error::GenomeError;
    use crate::genome::real_vector::RealVector;
    use crate::genome::traits::RealValuedGenome;
    use crate::problem::traits::FnProblem;

    type Ind = Individual<RealVector>;

    fn sum_problem() -> FnProblem<RealVector, impl Fn(&RealVector) -> f64> {
        FnProblem::new(|g: &RealVector| g.genes().iter().sum())
    }

    #[test]
    fn test_individual_new() {
        let individual: Ind = Individual::new(RealVector::new(vec![1.0, 2.0, 3.0]));
        assert!(!individual.is_evaluated());
        assert!(individual.phenotype().is_none());
        assert!(individual.attributes.is_empty());
        assert!(matches!(
            individual.fitness(),
            Err(EvolutionError::UnevaluatedFitness)
        ));
    }

    #[test]
    fn test_individual_evaluate() {
        let mut individual: Ind = Individual::new(RealVector::new(vec![1.0, 2.0, 3.0]));
        let fitness = individual
            .evaluate(&IdentityDecoder, &sum_problem())
            .unwrap()
            .fitness()
            .unwrap();
        assert_eq!(fitness, 6.0);
        assert_eq!(individual.phenotype(), Some(&RealVector::new(vec![1.0, 2.0, 3.0])));
    }

    struct CountingDecoder(std::cell::Cell<usize>);

    impl Decoder<RealVector> for CountingDecoder {
        type Phenotype = RealVector;

        fn decode(&self, genome: &RealVector) -> Result<RealVector, GenomeError> {
            self.0.set(self.0.get() + 1);
            Ok(genome.clone())
        }
    }

    #[test]
    fn test_evaluate_reuses_decoded_phenotype() {
        let decoder = CountingDecoder(std::cell::Cell::new(0));
        let mut individual: Ind = Individual::new(RealVector::new(vec![2.0, 3.0]));
        individual.decode(&decoder).unwrap();
        individual.evaluate(&decoder, &sum_problem()).unwrap();
        individual.evaluate(&decoder, &sum_problem()).unwrap();
        assert_eq!(decoder.0.get(), 1);
        assert_eq!(individual.fitness().unwrap(), 5.0);

        individual.genome_mut().genes_mut()[0] = 0.0;
        individual.evaluate(&decoder, &sum_problem()).unwrap();
        assert_eq!(decoder.0.get(), 2);
        assert_eq!(individual.fitness().unwrap(), 3.0);
    }

    #[test]
    fn test_individual_evaluate_malformed() {
        let mut individual: Ind = Individual::new(RealVector::new(vec![1.0]));
        let err = individual
            .evaluate(&FixedLengthDecoder::new(2), &sum_problem())
            .unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::Genome(GenomeError::MalformedGenome { actual: 1, .. })
        ));
        assert!(!individual.is_evaluated());
    }

    #[test]
    fn test_genome_mut_invalidates() {
        let mut individual: Ind = Individual::new(RealVector::new(vec![1.0, 2.0]));
        individual
            .evaluate(&IdentityDecoder, &sum_problem())
            .unwrap();
        assert!(individual.is_evaluated());

        individual.genome_mut().genes_mut()[0] = 10.0;
        assert!(individual.phenotype().is_none());
        assert!(matches!(
            individual.fitness(),
            Err(EvolutionError::UnevaluatedFitness)
        ));
    }

    #[test]
    fn test_clone_shares_genome_until_written() {
        let original: Ind = Individual::with_fitness(RealVector::new(vec![1.0, 2.0]), 3.0);
        let mut selected = original.clone();
        assert!(selected.shares_genome_with(&original));

        selected.genome_mut().genes_mut()[1] = -1.0;
        assert!(!selected.shares_genome_with(&original));
        assert_eq!(original.genome().genes(), &[1.0, 2.0]);
        assert_eq!(original.fitness().unwrap(), 3.0);
    }

    #[test]
    fn test_offspring_is_independent() {
        let mut parent: Ind = Individual::new(RealVector::new(vec![1.0, 2.0]));
        parent.attributes.set("origin", "seed");
        parent.evaluate(&IdentityDecoder, &sum_problem()).unwrap();

        let mut child = parent.offspring();
        assert!(!child.shares_genome_with(&parent));
        assert!(!child.is_evaluated());
        assert!(child.phenotype().is_none());
        assert_eq!(child.genome(), parent.genome());

        child.attributes.set("origin", "mutant");
        child.genome_mut().genes_mut()[0] = 99.0;
        assert_eq!(parent.genome().genes(), &[1.0, 2.0]);
        assert_eq!(
            parent.attributes.get("origin").and_then(|v| v.as_str()),
            Some("seed")
        );
    }

    #[test]
    fn test_compare_respects_direction() {
        let a: Ind = Individual::with_fitness(RealVector::new(vec![1.0]), 100.0);
        let b: Ind = Individual::with_fitness(RealVector::new(vec![2.0]), 50.0);

        assert!(a.is_better_than(&b, Direction::Maximize).unwrap());
        assert!(b.is_better_than(&a, Direction::Minimize).unwrap());
        assert_eq!(a.compare(&a, Direction::Maximize).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_compare_unevaluated_fails() {
        let a: Ind = Individual::with_fitness(RealVector::new(vec![1.0]), 1.0);
        let b: Ind = Individual::new(RealVector::new(vec![2.0]));
        assert!(matches!(
            a.compare(&b, Direction::Maximize),
            Err(EvolutionError::UnevaluatedFitness)
        ));
    }

    #[test]
    fn test_into_genome() {
        let genome = RealVector::new(vec![1.0, 2.0, 3.0]);
        let individual: Ind = Individual::with_fitness(genome.clone(), 42.0);
        let shared = individual.clone();
        assert_eq!(individual.into_genome(), genome);
        assert_eq!(shared.into_genome(), genome);
    }
}
