//! Fitness statistics CSV probe

use std::io::Write;

use crate::error::EvoResult;
use crate::operators::traits::{PipelineContext, Stage};
use crate::population::attributes::AttributeValue;
use crate::population::population::Population;

/// Column names written by [`CsvFitnessStatsProbe`]
pub const FITNESS_STATS_HEADER: [&str; 6] = [
    "step",
    "bsf",
    "mean_fitness",
    "std_fitness",
    "worst_fitness",
    "best_fitness",
];

/// Writes one row of fitness statistics per invocation
///
/// `bsf` is the best fitness seen by this probe across all invocations,
/// in the run's optimization direction. The standard deviation is `None`
/// for populations with fewer than two individuals.
pub struct CsvFitnessStatsProbe<W: Write> {
    out: W,
    step: usize,
    best_so_far: Option<f64>,
    header_written: bool,
}

impl<W: Write> CsvFitnessStatsProbe<W> {
    /// Create a probe writing to `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            step: 0,
            best_so_far: None,
            header_written: false,
        }
    }

    /// Best fitness observed so far
    pub fn best_so_far(&self) -> Option<f64> {
        self.best_so_far
    }

    /// Take the sink back
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write the statistics row for `population`
    pub fn record<G, P>(
        &mut self,
        population: &Population<G, P>,
        ctx: &PipelineContext,
    ) -> EvoResult<()> {
        if !self.header_written {
            super::write_record(&mut self.out, FITNESS_STATS_HEADER)?;
            self.header_written = true;
        }
        if population.is_empty() {
            return Ok(());
        }

        let direction = ctx.direction();
        let best = population.best(direction)?.fitness()?;
        let worst = population.worst(direction)?.fitness()?;
        let bsf = match self.best_so_far {
            Some(b) if !direction.is_better(best, b) => b,
            _ => best,
        };
        self.best_so_far = Some(bsf);

        let row = [
            AttributeValue::from(self.step),
            AttributeValue::from(bsf),
            AttributeValue::from(population.mean_fitness()),
            AttributeValue::from(population.fitness_std()),
            AttributeValue::from(worst),
            AttributeValue::from(best),
        ];
        super::write_record(&mut self.out, row)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<G, P, W: Write> Stage<G, P> for CsvFitnessStatsProbe<W> {
    fn name(&self) -> &str {
        "csv_fitness_stats_probe"
    }

    fn set_step(&mut self, step: usize) {
        self.step = step;
    }

    fn apply(
        &mut self,
        population: Population<G, P>,
        ctx: &mut PipelineContext,
    ) -> EvoResult<Population<G, P>> {
        self.record(&population, ctx)?;
        Ok(population)
    }
}
