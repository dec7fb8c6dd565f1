//! Shared cell parsing utilities.
//!
//! Null detection, datetime parsing and coordinate parsing used by every
//! source definition.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Cell contents treated as missing, in addition to the empty string.
///
/// These are the markers SFPD exports (and spreadsheet round-trips of them)
/// use for absent values.
pub const NULL_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Returns `None` if the cell is empty or exactly one of [`NULL_MARKERS`].
///
/// The cell is not trimmed: a whitespace-only cell, or a marker with
/// surrounding spaces, is a value.
#[must_use]
pub fn clean_cell(raw: &str) -> Option<&str> {
    if raw.is_empty() || NULL_MARKERS.contains(&raw) {
        None
    } else {
        Some(raw)
    }
}

/// Parses a single datetime cell with an explicit `chrono` format.
#[must_use]
pub fn parse_datetime(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), format).ok()
}

/// Parses separate date and time cells and combines them into one
/// datetime.
#[must_use]
pub fn parse_date_and_time(
    date: &str,
    time: &str,
    date_format: &str,
    time_format: &str,
) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date.trim(), date_format).ok()?;
    let time = NaiveTime::parse_from_str(time.trim(), time_format).ok()?;
    Some(NaiveDateTime::new(date, time))
}

/// Parses an optional coordinate cell. Null cells yield `Ok(None)`.
///
/// # Errors
///
/// Returns the parse error if the cell is present but not a number.
pub fn parse_coordinate(raw: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    clean_cell(raw)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<f64>)
        .transpose()
}
