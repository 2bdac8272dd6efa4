//! Problem traits
//!
//! This module defines the problem contract and the optimization direction.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::EvoResult;
use crate::population::attributes::Attributes;

/// Whether larger or smaller fitness is better
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Larger fitness is better
    #[default]
    Maximize,
    /// Smaller fitness is better
    Minimize,
}

impl Direction {
    /// Compare two fitness values; `Greater` means `a` is better than `b`
    ///
    /// NaN ranks below every number in either direction.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => {
                let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
                match self {
                    Self::Maximize => ord,
                    Self::Minimize => ord.reverse(),
                }
            }
        }
    }

    /// Whether `a` is strictly better than `b`
    pub fn is_better(self, a: f64, b: f64) -> bool {
        self.compare(a, b) == Ordering::Greater
    }

    /// The worst possible fitness in this direction
    pub fn worst_value(self) -> f64 {
        match self {
            Self::Maximize => f64::NEG_INFINITY,
            Self::Minimize => f64::INFINITY,
        }
    }
}

/// Evaluates phenotypes
///
/// A problem is shared read-only across all evaluations of a run and holds
/// no per-individual state. Evaluating the same phenotype twice must give
/// the same fitness.
pub trait Problem<P: ?Sized> {
    /// Compute the fitness of a phenotype
    fn evaluate(&self, phenotype: &P) -> EvoResult<f64>;

    /// Compute the fitness and record bookkeeping attributes
    ///
    /// The default ignores the attribute bag.
    fn evaluate_with(&self, phenotype: &P, attributes: &mut Attributes) -> EvoResult<f64> {
        let _ = attributes;
        self.evaluate(phenotype)
    }

    /// Optimization direction
    fn direction(&self) -> Direction {
        Direction::Maximize
    }
}

impl<P: ?Sized, T: Problem<P> + ?Sized> Problem<P> for &T {
    fn evaluate(&self, phenotype: &P) -> EvoResult<f64> {
        (**self).evaluate(phenotype)
    }

    fn evaluate_with(&self, phenotype: &P, attributes: &mut Attributes) -> EvoResult<f64> {
        (**self).evaluate_with(phenotype, attributes)
    }

    fn direction(&self) -> Direction {
        (**self).direction()
    }
}

/// Function-based problem
///
/// Wraps an infallible closure; use [`FnProblem::minimize`] for cost
/// functions.
pub struct FnProblem<P: ?Sized, F>
where
    F: Fn(&P) -> f64,
{
    f: F,
    direction: Direction,
    _marker: std::marker::PhantomData<fn(&P)>,
}

impl<P: ?Sized, F> FnProblem<P, F>
where
    F: Fn(&P) -> f64,
{
    /// Create a maximization problem from a closure
    pub fn new(f: F) -> Self {
        Self {
            f,
            direction: Direction::Maximize,
            _marker: std::marker::PhantomData,
        }
    }

    /// Create a minimization problem from a closure
    pub fn minimize(f: F) -> Self {
        Self {
            f,
            direction: Direction::Minimize,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<P: ?Sized, F> Problem<P> for FnProblem<P, F>
where
    F: Fn(&P) -> f64,
{
    fn evaluate(&self, phenotype: &P) -> EvoResult<f64> {
        Ok((self.f)(phenotype))
    }

    fn direction(&self) -> Direction {
        self.direction
    }
}
