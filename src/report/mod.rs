//! Run reporting: per-tick counters, CSV series and JSON summaries

pub mod csv;
pub mod stats;
pub mod summary;

pub use csv::CsvReport;
pub use stats::TickStats;
pub use summary::{HostSnapshot, ParasiteSnapshot, RunSummary};
