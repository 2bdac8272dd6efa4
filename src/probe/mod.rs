//! Probes
//!
//! Probes are pipeline stages that observe the population flowing past them
//! and write records to an external sink. They return the population
//! unchanged: no reordering, no resizing, no mutation. The engine calls
//! `set_step` on every stage before each generation, which is how a probe
//! learns the generation index it stamps on its rows.

pub mod attributes_probe;
pub mod fitness_stats;

use std::fmt::Display;
use std::io::Write;

pub use attributes_probe::CsvAttributesProbe;
pub use fitness_stats::CsvFitnessStatsProbe;

pub mod prelude {
    pub use super::attributes_probe::*;
    pub use super::fitness_stats::*;
}

/// Field separator used by every CSV probe
pub const SEPARATOR: &str = ", ";

/// Write one separator-joined record followed by a newline
pub(crate) fn write_record<W, I, T>(out: &mut W, fields: I) -> std::io::Result<()>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = T>,
    T: Display,
{
    let mut first = true;
    for field in fields {
        if !first {
            out.write_all(SEPARATOR.as_bytes())?;
        }
        write!(out, "{}", field)?;
        first = false;
    }
    out.write_all(b"\n")
}
