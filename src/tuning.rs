//! Random-search parameter tuning
//!
//! [`tune_random`] samples configurations of real-valued parameters
//! uniformly within their ranges, scores each one by the mean of a metric
//! over several independent runs, and lazily yields the best-so-far
//! `(score, configuration)` after every sample. Higher scores are better.

use std::collections::BTreeMap;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::engine::Generation;
use crate::error::EvoResult;
use crate::genome::bounds::Bounds;

/// Named parameter values of one sampled configuration
pub type Configuration = BTreeMap<String, f64>;

/// Drain a run into its `(evaluations, best fitness)` curve
///
/// The first fatal error of the run is returned.
pub fn fitness_curve<I, G, P>(generations: I) -> EvoResult<(Vec<f64>, Vec<f64>)>
where
    I: IntoIterator<Item = EvoResult<Generation<G, P>>>,
{
    let mut steps = Vec::new();
    let mut fitnesses = Vec::new();
    for generation in generations {
        let generation = generation?;
        steps.push(generation.evaluations as f64);
        fitnesses.push(generation.best_fitness()?);
    }
    Ok((steps, fitnesses))
}

/// Lazy random-search tuner created by [`tune_random`]
pub struct RandomTuner<A, M> {
    algorithm: A,
    metric: M,
    ranges: BTreeMap<String, Bounds>,
    samples: usize,
    tests_per_sample: usize,
    rng: StdRng,
    sampled: usize,
    best: Option<(f64, Configuration)>,
}

/// Tune the parameters named in `ranges` by random sampling
///
/// `algorithm` runs once per call with a sampled configuration and a seed
/// and returns the run's curve as `(x, y)` (see [`fitness_curve`]).
/// `metric` turns a curve into a score, e.g.
/// [`area_under_curve`](crate::diagnostics::area_under_curve). Defaults to
/// 10 samples of 5 runs each; nothing runs until the iterator is pulled.
pub fn tune_random<A, M, K>(
    algorithm: A,
    metric: M,
    ranges: impl IntoIterator<Item = (K, Bounds)>,
) -> RandomTuner<A, M>
where
    A: FnMut(&Configuration, u64) -> EvoResult<(Vec<f64>, Vec<f64>)>,
    M: Fn(&[f64], &[f64]) -> EvoResult<f64>,
    K: Into<String>,
{
    RandomTuner {
        algorithm,
        metric,
        ranges: ranges.into_iter().map(|(k, b)| (k.into(), b)).collect(),
        samples: 10,
        tests_per_sample: 5,
        rng: StdRng::seed_from_u64(0),
        sampled: 0,
        best: None,
    }
}

impl<A, M> RandomTuner<A, M>
where
    A: FnMut(&Configuration, u64) -> EvoResult<(Vec<f64>, Vec<f64>)>,
    M: Fn(&[f64], &[f64]) -> EvoResult<f64>,
{
    /// Set the number of configurations to sample
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Set the number of runs averaged per configuration
    ///
    /// # Panics
    /// Panics if `tests` is zero
    pub fn with_tests_per_sample(mut self, tests: usize) -> Self {
        assert!(tests > 0, "At least one test per sample is required");
        self.tests_per_sample = tests;
        self
    }

    /// Seed the sampler; run seeds are drawn from the same generator
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// The best `(score, configuration)` seen so far
    pub fn best(&self) -> Option<&(f64, Configuration)> {
        self.best.as_ref()
    }

    fn sample_configuration(&mut self) -> Configuration {
        let rng = &mut self.rng;
        self.ranges
            .iter()
            .map(|(name, b)| (name.clone(), rng.gen_range(b.min..=b.max)))
            .collect()
    }

    fn score(&mut self, configuration: &Configuration) -> EvoResult<f64> {
        let mut total = 0.0;
        for _ in 0..self.tests_per_sample {
            let seed = self.rng.gen::<u64>();
            let (x, y) = (self.algorithm)(configuration, seed)?;
            total += (self.metric)(&x, &y)?;
        }
        Ok(total / self.tests_per_sample as f64)
    }
}

impl<A, M> Iterator for RandomTuner<A, M>
where
    A: FnMut(&Configuration, u64) -> EvoResult<(Vec<f64>, Vec<f64>)>,
    M: Fn(&[f64], &[f64]) -> EvoResult<f64>,
{
    type Item = EvoResult<(f64, Configuration)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.sampled >= self.samples {
            return None;
        }
        self.sampled += 1;

        let configuration = self.sample_configuration();
        let score = match self.score(&configuration) {
            Ok(score) => score,
            Err(e) => {
                self.sampled = self.samples;
                return Some(Err(e));
            }
        };
        debug!(
            "sample {}: score {} for {:?}",
            self.sampled, score, configuration
        );

        // NaN scores never replace a real one
        let improved = match &self.best {
            Some((best, _)) => score > *best || (best.is_nan() && !score.is_nan()),
            None => true,
        };
        if improved {
            self.best = Some((score, configuration));
        }
        self.best.clone().map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvolutionError;
    use crate::decoder::IdentityDecoder;
    use crate::diagnostics::area_under_curve;
    use crate::engine::EngineBuilder;
    use crate::genome::bounds::MultiBounds;
    use crate::genome::initializer::UniformRealInitializer;
    use crate::genome::real_vector::RealVector;
    use crate::operators::cloning::Cloning;
    use crate::operators::mutation::GaussianMutation;
    use crate::operators::selection::TournamentSelection;
    use crate::problem::benchmarks::CosineFamily;

    fn quadratic(config: &Configuration, _seed: u64) -> EvoResult<(Vec<f64>, Vec<f64>)> {
        let x = config["x"];
        Ok((vec![0.0, 1.0], vec![-(x - 0.3) * (x - 0.3), 0.0]))
    }

    #[test]
    fn test_yields_best_so_far_per_sample() {
        let results: Vec<_> = tune_random(quadratic, area_under_curve, [("x", Bounds::unit())])
            .with_samples(8)
            .with_tests_per_sample(1)
            .with_seed(3)
            .collect::<EvoResult<_>>()
            .unwrap();

        assert_eq!(results.len(), 8);
        for pair in results.windows(2) {
            assert!(pair[1].0 >= pair[0].0);
        }
        let (score, config) = &results[7];
        assert!(*score <= 0.0);
        assert!(Bounds::unit().contains(config["x"]));
    }

    #[test]
    fn test_same_seed_same_results() {
        let run = || {
            tune_random(quadratic, area_under_curve, [("x", Bounds::symmetric(1.0))])
                .with_samples(4)
                .with_seed(11)
                .collect::<EvoResult<Vec<_>>>()
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_errors_end_tuning() {
        let failing = |_: &Configuration, _: u64| -> EvoResult<(Vec<f64>, Vec<f64>)> {
            Err(EvolutionError::EmptyPopulation)
        };
        let mut tuner = tune_random(failing, area_under_curve, [("x", Bounds::unit())]);
        assert!(matches!(
            tuner.next(),
            Some(Err(EvolutionError::EmptyPopulation))
        ));
        assert!(tuner.next().is_none());
    }

    #[test]
    fn test_tunes_mutation_of_real_engine() {
        let problem = CosineFamily::new(0.6, vec![2; 3], vec![2; 3]).unwrap();
        let algorithm = |config: &Configuration, seed: u64| -> EvoResult<(Vec<f64>, Vec<f64>)> {
            let engine = EngineBuilder::<RealVector, RealVector, _, _>::new()
                .population_size(5)
                .max_evaluations(50)
                .seed(seed)
                .initializer(UniformRealInitializer::new(MultiBounds::uniform(
                    Bounds::unit(),
                    3,
                )))
                .decoder(IdentityDecoder)
                .problem(&problem)
                .stage(TournamentSelection::new(5))
                .stage(Cloning::new())
                .stage(
                    GaussianMutation::new(config["mutation_prob"], config["mutation_std"])
                        .with_hard_bounds(Bounds::unit()),
                )
                .build()?;
            fitness_curve(engine)
        };

        let results = tune_random(
            algorithm,
            area_under_curve,
            [
                ("mutation_prob", Bounds::new(0.001, 0.2)),
                ("mutation_std", Bounds::new(0.001, 0.1)),
            ],
        )
        .with_samples(3)
        .with_tests_per_sample(2)
        .collect::<EvoResult<Vec<_>>>()
        .unwrap();

        assert_eq!(results.len(), 3);
        let (_, best) = &results[2];
        assert_eq!(best.len(), 2);
        assert!(best["mutation_std"] >= 0.001 && best["mutation_std"] <= 0.1);
    }
}
