#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Grouping stage: appends a coarse `Focus Group` column to the cleaned
//! dataset.
//!
//! The stage only relies on the cleaned file having an `Incident Category`
//! column. Every other column passes through untouched, and no row is ever
//! dropped: categories missing from the lookup table get the catch-all label
//! and show up in the [`CoverageReport`] instead of failing the run.

pub mod report;

use std::path::Path;
use std::sync::Arc;

use csv::StringRecord;
use sf_crime_crime_models::FocusGroup;
use sf_crime_source::SourceError;
use sf_crime_source::output::write_csv_atomically;
use sf_crime_source::parsing::clean_cell;
use sf_crime_source::progress::{ProgressCallback, RowTicker};
use sf_crime_source::type_mapping::{FOCUS_GROUP_TABLE, map_focus_group};
use sf_crime_source_models::{FOCUS_GROUP, INCIDENT_CATEGORY};

pub use report::{CoverageReport, GroupCount, print_report};

/// Id used in errors about the cleaned input file.
const TABLE_SOURCE_ID: &str = "clean_data";

/// A CSV file held in memory as raw string rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Header row.
    pub headers: StringRecord,
    /// Data rows, in file order.
    pub rows: Vec<StringRecord>,
}

impl Table {
    /// Returns the index of the column named `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Returns the index of `name`, or [`SourceError::MissingColumn`].
    ///
    /// # Errors
    ///
    /// Returns an error if the column is absent.
    pub fn require_column(&self, name: &str) -> Result<usize, SourceError> {
        self.column_index(name)
            .ok_or_else(|| SourceError::MissingColumn {
                source_id: TABLE_SOURCE_ID.to_string(),
                column: name.to_string(),
            })
    }

    /// Returns the cells of column `idx`, one per row.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |r| r.get(idx).unwrap_or(""))
    }
}

/// Reads a CSV file into a [`Table`].
///
/// # Errors
///
/// Returns [`SourceError`] if the file can't be read or is not valid CSV.
pub fn read_table(path: &Path) -> Result<Table, SourceError> {
    log::debug!("Reading {}", path.display());
    read_table_from(std::fs::File::open(path)?)
}

/// Reads a [`Table`] from any reader.
///
/// # Errors
///
/// See [`read_table`].
pub fn read_table_from<R: std::io::Read>(reader: R) -> Result<Table, SourceError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
    Ok(Table { headers, rows })
}

/// Returns `record` with field `idx` replaced by `value`, or with `value`
/// appended if `idx` is past the end.
fn with_field(record: &StringRecord, idx: usize, value: &str) -> StringRecord {
    let mut out =
        StringRecord::with_capacity(record.as_slice().len() + value.len(), record.len() + 1);
    for (i, field) in record.iter().enumerate() {
        out.push_field(if i == idx { value } else { field });
    }
    if idx >= record.len() {
        out.push_field(value);
    }
    out
}

/// Adds the `Focus Group` column and builds the coverage report.
///
/// If the table already has a `Focus Group` column it is overwritten in
/// place, so running this twice gives the same table.
///
/// # Errors
///
/// Returns [`SourceError::MissingColumn`] if there is no `Incident Category`
/// column.
pub fn assign_focus_groups(
    table: Table,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<(Table, CoverageReport), SourceError> {
    let category_idx = table.require_column(INCIDENT_CATEGORY)?;
    let group_idx = table.column_index(FOCUS_GROUP).unwrap_or(table.headers.len());

    progress.set_total(table.rows.len() as u64);

    let mut report = report::CoverageBuilder::default();
    let mut rows = Vec::with_capacity(table.rows.len());
    let mut ticker = RowTicker::new(progress);

    for (row, raw) in table.rows.iter().zip(table.column(category_idx)) {
        let category = clean_cell(raw);
        let group = category.map_or(FocusGroup::CATCH_ALL, map_focus_group);
        report.record(category, group);
        rows.push(with_field(row, group_idx, group.label()));
        ticker.tick();
    }
    ticker.finish();

    let headers = with_field(&table.headers, group_idx, FOCUS_GROUP);
    Ok((Table { headers, rows }, report.build()))
}

/// Writes a [`Table`], replacing any existing file.
///
/// # Errors
///
/// Returns [`SourceError`] if the file can't be written. On error the
/// previous file, if any, is left in place.
pub fn write_table(path: &Path, table: &Table) -> Result<(), SourceError> {
    write_csv_atomically(path, |writer| {
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        Ok(())
    })
}

/// Runs the whole grouping stage from `input` to `output`.
///
/// # Errors
///
/// Returns [`SourceError`] if the input can't be read, lacks an
/// `Incident Category` column, or the output can't be written.
pub fn run(
    input: &Path,
    output: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<CoverageReport, SourceError> {
    progress.set_message("Loading cleaned dataset".to_string());
    let table = read_table(input)?;
    log::info!("Loaded {} rows from {}", table.rows.len(), input.display());

    progress.set_message("Assigning focus groups".to_string());
    let (table, report) = assign_focus_groups(table, progress)?;

    if !report.unmapped_categories.is_empty() {
        log::warn!(
            "{} categories fell back to '{}'",
            report.unmapped_categories.len(),
            FocusGroup::CATCH_ALL
        );
    }

    write_table(output, &table)?;
    log::info!("Wrote {} rows to {}", table.rows.len(), output.display());
    progress.finish(format!("Grouped {} rows", table.rows.len()));

    Ok(report)
}

/// Prints the category lookup table, one focus group at a time.
pub fn print_category_table() {
    for group in FocusGroup::all() {
        println!("{group}");
        for (category, _) in FOCUS_GROUP_TABLE.iter().filter(|(_, g)| g == group) {
            println!("  {category}");
        }
    }
    println!();
    println!(
        "Anything else maps to '{}'. Lookups ignore case.",
        FocusGroup::CATCH_ALL
    );
}
