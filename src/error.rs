//! Error types for leap-evo
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for genome and decoder operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenomeError {
    /// Genome length does not match what a decoder or operator expects
    #[error("Malformed genome: expected length {expected}, got {actual}")]
    MalformedGenome { expected: String, actual: usize },

    /// Genome shape is invalid for reasons other than its length
    #[error("Invalid genome structure: {0}")]
    InvalidStructure(String),

    /// Dimension mismatch between a genome and its bounds
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl GenomeError {
    /// Malformed-genome error for an exact expected length
    pub fn malformed(expected: usize, actual: usize) -> Self {
        Self::MalformedGenome {
            expected: expected.to_string(),
            actual,
        }
    }
}

/// Error raised by an environment or a controller during a single trial
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrialError {
    /// The environment failed to reset or step
    #[error("Environment error: {0}")]
    Environment(String),

    /// The controller produced an action of the wrong size
    #[error("Invalid action: expected {expected} values, got {actual}")]
    InvalidAction { expected: usize, actual: usize },

    /// The controller produced a NaN or infinite action value
    #[error("Invalid action: non-finite value at index {0}")]
    NonFiniteAction(usize),

    /// The controller failed internally
    #[error("Brain error: {0}")]
    Brain(String),
}

/// Top-level error type for evolution operations
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Genome error (including malformed genomes rejected by a decoder)
    #[error("Genome error: {0}")]
    Genome(#[from] GenomeError),

    /// Fitness was read or compared before the individual was evaluated
    #[error("Individual has not been evaluated")]
    UnevaluatedFitness,

    /// A single evaluation trial failed
    #[error("Trial {trial} failed: {source}")]
    TrialFailure {
        /// Index of the failing trial
        trial: usize,
        #[source]
        source: TrialError,
    },

    /// Every trial for an individual failed, so it has no fitness
    #[error("Individual is unevaluable: all {trials} trials failed (last: {last})")]
    Unevaluable {
        /// Number of trials attempted
        trials: usize,
        /// The failure of the last trial
        last: TrialError,
    },

    /// The evaluation budget does not allow further evaluations
    ///
    /// The engine treats this as its normal terminal condition and never
    /// yields it to the consumer.
    #[error("Evaluation budget exhausted: {used} of {budget} used, {requested} requested")]
    BudgetExhausted {
        /// Configured maximum number of evaluations
        budget: usize,
        /// Evaluations performed so far
        used: usize,
        /// Evaluations requested by the failing reservation
        requested: usize,
    },

    /// Failure attributed to one individual of a population
    #[error("Individual {index}: {source}")]
    Individual {
        /// Position of the individual in the population
        index: usize,
        #[source]
        source: Box<EvolutionError>,
    },

    /// Failure attributed to one pipeline stage
    #[error("Stage '{stage}' failed in generation {generation}: {source}")]
    Stage {
        /// Name of the failing stage
        stage: String,
        /// Generation being produced
        generation: usize,
        #[source]
        source: Box<EvolutionError>,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,

    /// IO error while writing probe output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EvolutionError {
    /// Attribute this error to the individual at `index`
    pub fn at_individual(self, index: usize) -> Self {
        Self::Individual {
            index,
            source: Box::new(self),
        }
    }

    /// Attribute this error to a named stage of a generation
    pub fn in_stage(self, stage: impl Into<String>, generation: usize) -> Self {
        Self::Stage {
            stage: stage.into(),
            generation,
            source: Box::new(self),
        }
    }

    /// Whether this error (or the error it wraps) is a budget exhaustion signal
    pub fn is_budget_exhausted(&self) -> bool {
        match self {
            Self::BudgetExhausted { .. } => true,
            Self::Individual { source, .. } | Self::Stage { source, .. } => {
                source.is_budget_exhausted()
            }
            _ => false,
        }
    }

    /// Whether this error (or the error it wraps) marks an unevaluable individual
    pub fn is_unevaluable(&self) -> bool {
        match self {
            Self::Unevaluable { .. } => true,
            Self::Individual { source, .. } | Self::Stage { source, .. } => source.is_unevaluable(),
            _ => false,
        }
    }
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;
