//! Attribute-selecting CSV probe

use std::fmt::Display;
use std::io::Write;

use crate::error::EvoResult;
use crate::operators::traits::{PipelineContext, Stage};
use crate::population::attributes::AttributeValue;
use crate::population::individual::Individual;
use crate::population::population::Population;
use crate::probe::write_record;

/// Writes selected attributes of each individual as CSV rows
///
/// The header `step, <attr1>, <attr2>, ...` is written once, before the
/// first row. Each invocation then writes one row per individual, or one
/// row for the best individual in best-only mode. Columns follow the
/// configured attribute order exactly; a missing attribute leaves its field
/// empty. Optional `fitness` and `genome` columns come after the attributes.
pub struct CsvAttributesProbe<W: Write> {
    out: W,
    attributes: Vec<String>,
    best_only: bool,
    do_fitness: bool,
    do_genome: bool,
    step: usize,
    header_written: bool,
}

impl<W: Write> CsvAttributesProbe<W> {
    /// Create a probe recording `attributes` in the given order
    pub fn new<S: Into<String>>(out: W, attributes: impl IntoIterator<Item = S>) -> Self {
        Self {
            out,
            attributes: attributes.into_iter().map(Into::into).collect(),
            best_only: false,
            do_fitness: false,
            do_genome: false,
            step: 0,
            header_written: false,
        }
    }

    /// Record only the best individual of each population
    pub fn best_only(mut self, enabled: bool) -> Self {
        self.best_only = enabled;
        self
    }

    /// Append a `fitness` column
    pub fn with_fitness(mut self, enabled: bool) -> Self {
        self.do_fitness = enabled;
        self
    }

    /// Append a `genome` column
    pub fn with_genome(mut self, enabled: bool) -> Self {
        self.do_genome = enabled;
        self
    }

    /// The generation index stamped on rows
    pub fn step(&self) -> usize {
        self.step
    }

    /// Get a reference to the sink
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Take the sink back
    pub fn into_inner(self) -> W {
        self.out
    }

    fn header(&self) -> Vec<String> {
        let mut columns = vec!["step".to_string()];
        columns.extend(self.attributes.iter().cloned());
        if self.do_fitness {
            columns.push("fitness".to_string());
        }
        if self.do_genome {
            columns.push("genome".to_string());
        }
        columns
    }

    fn row<G: Display, P>(&self, individual: &Individual<G, P>) -> Vec<String> {
        let mut fields = Vec::with_capacity(self.attributes.len() + 3);
        fields.push(self.step.to_string());
        for name in &self.attributes {
            fields.push(
                individual
                    .attributes
                    .get(name)
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            );
        }
        if self.do_fitness {
            fields.push(AttributeValue::from(individual.fitness_opt()).to_string());
        }
        if self.do_genome {
            fields.push(individual.genome().to_string());
        }
        fields
    }

    /// Write rows for `population` without consuming it
    pub fn record<G: Display, P>(
        &mut self,
        population: &Population<G, P>,
        ctx: &PipelineContext,
    ) -> EvoResult<()> {
        if !self.header_written {
            let header = self.header();
            write_record(&mut self.out, header)?;
            self.header_written = true;
        }
        if self.best_only {
            if !population.is_empty() {
                let best = population.best(ctx.direction())?;
                let row = self.row(best);
                write_record(&mut self.out, row)?;
            }
        } else {
            for individual in population.iter() {
                let row = self.row(individual);
                write_record(&mut self.out, row)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

impl<G: Display, P, W: Write> Stage<G, P> for CsvAttributesProbe<W> {
    fn name(&self) -> &str {
        "csv_attributes_probe"
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
