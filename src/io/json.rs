use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::analysis::FlightSummary;
use crate::sim::Method;

/// Summary of one projectile run, as written to the report file.
#[derive(Debug, Clone, Serialize)]
pub struct NamedSummary {
    pub name: String,
    pub method: Method,
    #[serde(flatten)]
    pub summary: FlightSummary,
}

#[derive(Serialize)]
struct Report<'a> {
    projectiles: &'a [NamedSummary],
}

/// Write run summaries as pretty-printed JSON.
pub fn write_summary<W: Write>(writer: &mut W, summaries: &[NamedSummary]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &Report { projectiles: summaries })?;
    writeln!(writer)
}

/// Write run summaries to a JSON file.
pub fn write_summary_file(path: impl AsRef<Path>, summaries: &[NamedSummary]) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_summary(&mut file, summaries)?;
    file.flush()
}
