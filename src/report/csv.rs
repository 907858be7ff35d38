//! CSV time series, one row per sampled tick

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::error::Result;
use crate::report::stats::TickStats;
use crate::tasks::TaskId;

/// Column header, in row order
pub fn header() -> String {
    let mut columns: Vec<String> = vec!["update".into(), "org".into()];
    columns.extend(TaskId::ALL.iter().map(|t| t.name().to_lowercase()));
    columns.push("dead".into());
    columns.push("parasites".into());
    columns.extend(TaskId::ALL.iter().map(|t| format!("p_{}", t.name().to_lowercase())));
    columns.join(",")
}

/// Format one stats snapshot as a CSV row (no trailing newline)
pub fn row(stats: &TickStats) -> String {
    let mut fields: Vec<String> = vec![stats.tick.to_string(), stats.organisms.to_string()];
    fields.extend(stats.host_solvers.iter().map(usize::to_string));
    fields.push(stats.deaths.to_string());
    fields.push(stats.parasites.to_string());
    fields.extend(stats.parasite_solvers.iter().map(usize::to_string));
    fields.join(",")
}

/// Writes the header on creation, then one row per `write_row`
pub struct CsvReport<W: Write> {
    writer: W,
    rows: usize,
}

impl CsvReport<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> CsvReport<W> {
    pub fn new(mut writer: W) -> Result<Self> {
        writeln!(writer, "{}", header())?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn write_row(&mut self, stats: &TickStats) -> Result<()> {
        writeln!(self.writer, "{}", row(stats))?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far, header excluded
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
