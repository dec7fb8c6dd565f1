#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for the cleaning stage.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// What happened to one raw source during a cleaning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    /// Source identifier (e.g. `"sf_historical"`).
    pub source_id: String,
    /// File the rows were read from.
    pub path: PathBuf,
    /// Rows read from the file.
    pub rows_loaded: u64,
    /// Rows left after the boundary-year filter. Equal to `rows_loaded` for
    /// sources that aren't truncated.
    pub rows_retained: u64,
}

impl SourceSummary {
    /// Rows dropped by the boundary-year filter.
    #[must_use]
    pub const fn rows_truncated(&self) -> u64 {
        self.rows_loaded.saturating_sub(self.rows_retained)
    }
}

/// Result of a completed cleaning run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestSummary {
    /// Per-source counts, in merge order.
    pub sources: Vec<SourceSummary>,
    /// Rows after concatenating every source.
    pub rows_merged: u64,
    /// Distinct district spellings before title-casing (nulls excluded).
    pub districts_before: Vec<String>,
    /// Distinct district spellings after title-casing (nulls excluded).
    pub districts_after: Vec<String>,
    /// Rows dropped for an incomplete year or a missing category/district.
    pub rows_dropped: u64,
    /// Rows written to the output file.
    pub rows_written: u64,
    /// Distinct years present in the output, ascending.
    pub years: Vec<i32>,
    /// Where the cleaned dataset was written.
    pub output_path: PathBuf,
    /// How long the run took.
    pub duration: Duration,
}
