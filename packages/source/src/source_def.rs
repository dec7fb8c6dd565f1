//! Config-driven incident source definition.
//!
//! [`SourceDefinition`] captures everything unique about one raw SFPD export
//! in a serializable config struct: which header feeds which shared-schema
//! field and how the incident datetime is encoded. A single generic loader
//! handles every source.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;
use csv::StringRecord;
use serde::Deserialize;
use sf_crime_source_models::{
    DAY_OF_WEEK, INCIDENT_CATEGORY, INCIDENT_DESCRIPTION, INCIDENT_NUMBER, IncidentRecord,
    LATITUDE, LONGITUDE, POLICE_DISTRICT, RESOLUTION,
};

use crate::SourceError;
use crate::parsing::{clean_cell, parse_coordinate, parse_date_and_time, parse_datetime};
use crate::progress::{ProgressCallback, RowTicker};

// ── Top-level source definition ──────────────────────────────────────────

/// A complete, config-driven source definition.
///
/// Loaded from TOML files embedded at compile time (see
/// [`crate::registry`]).
#[derive(Debug, Deserialize)]
pub struct SourceDefinition {
    /// Unique identifier (e.g., `"sf_historical"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Default file name inside the raw-data directory.
    pub file_name: String,
    /// Whether rows from the boundary year onward are dropped from this
    /// source because a newer source also covers them.
    #[serde(default)]
    pub truncate_at_boundary: bool,
    /// Source header for each shared-schema field.
    pub columns: ColumnMapping,
    /// How to build `Incident Datetime`.
    pub datetime: DateExtractor,
}

/// Maps shared-schema fields to the source's own column headers.
#[derive(Debug, Deserialize)]
pub struct ColumnMapping {
    /// Header feeding `Incident Number`.
    pub incident_number: String,
    /// Header feeding `Incident Category`.
    pub incident_category: String,
    /// Header feeding `Incident Description`.
    pub incident_description: String,
    /// Header feeding `Police District`.
    pub police_district: String,
    /// Header feeding `Resolution`.
    pub resolution: String,
    /// Header feeding `Latitude`.
    pub latitude: String,
    /// Header feeding `Longitude`.
    pub longitude: String,
    /// Header feeding `Incident Day of Week`.
    pub day_of_week: String,
}

/// How to extract `Incident Datetime` from a raw row.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DateExtractor {
    /// A date column plus a separate time-of-day column.
    DatePlusTime {
        /// Header of the date column.
        date_column: String,
        /// Header of the time column.
        time_column: String,
        /// `chrono` format of the date cell.
        date_format: String,
        /// `chrono` format of the time cell.
        time_format: String,
    },
    /// A single datetime column with a fixed format.
    Formatted {
        /// Header of the datetime column.
        column: String,
        /// `chrono` format of the cell.
        format: String,
    },
}

// ── Header resolution ────────────────────────────────────────────────────

/// Column indices resolved against an actual header row.
struct ResolvedColumns {
    incident_number: usize,
    incident_category: usize,
    incident_description: usize,
    police_district: usize,
    resolution: usize,
    latitude: usize,
    longitude: usize,
    day_of_week: usize,
    datetime: ResolvedDatetime,
}

enum ResolvedDatetime {
    DatePlusTime { date: usize, time: usize },
    Formatted { column: usize },
}

/// Finds the index of `column` in `headers`, or fails with
/// [`SourceError::MissingColumn`].
fn resolve(
    index: &HashMap<&str, usize>,
    source_id: &str,
    column: &str,
) -> Result<usize, SourceError> {
    index
        .get(column)
        .copied()
        .ok_or_else(|| SourceError::MissingColumn {
            source_id: source_id.to_string(),
            column: column.to_string(),
        })
}

fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

fn owned_cell(record: &StringRecord, idx: usize) -> Option<String> {
    clean_cell(cell(record, idx)).map(String::from)
}

impl DateExtractor {
    /// Human-readable description of the expected format, for errors.
    fn format_description(&self) -> String {
        match self {
            Self::DatePlusTime {
                date_format,
                time_format,
                ..
            } => format!("{date_format} {time_format}"),
            Self::Formatted { format, .. } => format.clone(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────────────

impl SourceDefinition {
    /// Returns the unique source identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable source name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns every source header this definition reads, in schema order.
    #[must_use]
    pub fn required_columns(&self) -> Vec<&str> {
        let c = &self.columns;
        let mut columns = vec![c.incident_number.as_str()];
        match &self.datetime {
            DateExtractor::DatePlusTime {
                date_column,
                time_column,
                ..
            } => {
                columns.push(date_column.as_str());
                columns.push(time_column.as_str());
            }
            DateExtractor::Formatted { column, .. } => columns.push(column.as_str()),
        }
        columns.extend([
            c.incident_category.as_str(),
            c.incident_description.as_str(),
            c.police_district.as_str(),
            c.resolution.as_str(),
            c.latitude.as_str(),
            c.longitude.as_str(),
            c.day_of_week.as_str(),
        ]);
        columns
    }

    /// Pairs each shared-schema column with the source header feeding it.
    #[must_use]
    pub fn renames(&self) -> Vec<(&str, &'static str)> {
        let c = &self.columns;
        vec![
            (c.incident_number.as_str(), INCIDENT_NUMBER),
            (c.incident_category.as_str(), INCIDENT_CATEGORY),
            (c.incident_description.as_str(), INCIDENT_DESCRIPTION),
            (c.police_district.as_str(), POLICE_DISTRICT),
            (c.resolution.as_str(), RESOLUTION),
            (c.latitude.as_str(), LATITUDE),
            (c.longitude.as_str(), LONGITUDE),
            (c.day_of_week.as_str(), DAY_OF_WEEK),
        ]
    }

    fn resolve_headers(&self, headers: &StringRecord) -> Result<ResolvedColumns, SourceError> {
        let index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim(), i))
            .collect();
        let c = &self.columns;
        let find = |column: &String| resolve(&index, &self.id, column);

        let datetime = match &self.datetime {
            DateExtractor::DatePlusTime {
                date_column,
                time_column,
                ..
            } => ResolvedDatetime::DatePlusTime {
                date: find(date_column)?,
                time: find(time_column)?,
            },
            DateExtractor::Formatted { column, .. } => ResolvedDatetime::Formatted {
                column: find(column)?,
            },
        };

        Ok(ResolvedColumns {
            incident_number: find(&c.incident_number)?,
            incident_category: find(&c.incident_category)?,
            incident_description: find(&c.incident_description)?,
            police_district: find(&c.police_district)?,
            resolution: find(&c.resolution)?,
            latitude: find(&c.latitude)?,
            longitude: find(&c.longitude)?,
            day_of_week: find(&c.day_of_week)?,
            datetime,
        })
    }

    fn extract_datetime(
        &self,
        record: &StringRecord,
        resolved: &ResolvedDatetime,
        line: u64,
    ) -> Result<NaiveDateTime, SourceError> {
        let (parsed, raw) = match (&self.datetime, resolved) {
            (
                DateExtractor::DatePlusTime {
                    date_format,
                    time_format,
                    ..
                },
                ResolvedDatetime::DatePlusTime { date, time },
            ) => {
                let (date, time) = (cell(record, *date), cell(record, *time));
                (
                    parse_date_and_time(date, time, date_format, time_format),
                    format!("{} {}", date.trim(), time.trim()),
                )
            }
            (DateExtractor::Formatted { format, .. }, ResolvedDatetime::Formatted { column }) => {
                let raw = cell(record, *column);
                (parse_datetime(raw, format), raw.trim().to_string())
            }
            _ => (None, String::new()),
        };

        parsed.ok_or_else(|| SourceError::DateParse {
            source_id: self.id.clone(),
            line,
            value: raw,
            format: self.datetime.format_description(),
        })
    }

    fn extract_coordinate(
        &self,
        record: &StringRecord,
        idx: usize,
        column: &str,
        line: u64,
    ) -> Result<Option<f64>, SourceError> {
        let raw = cell(record, idx);
        parse_coordinate(raw).map_err(|_| SourceError::InvalidNumber {
            source_id: self.id.clone(),
            line,
            column: column.to_string(),
            value: raw.trim().to_string(),
        })
    }

    /// Normalizes one raw row into the shared schema.
    fn normalize_record(
        &self,
        record: &StringRecord,
        resolved: &ResolvedColumns,
    ) -> Result<IncidentRecord, SourceError> {
        let line = record.position().map_or(0, csv::Position::line);
        let datetime = self.extract_datetime(record, &resolved.datetime, line)?;

        let mut incident = IncidentRecord::new(
            clean_cell(cell(record, resolved.incident_number)).unwrap_or_default(),
            datetime,
        );
        incident.incident_category = owned_cell(record, resolved.incident_category);
        incident.incident_description = owned_cell(record, resolved.incident_description);
        incident.police_district = owned_cell(record, resolved.police_district);
        incident.resolution = owned_cell(record, resolved.resolution);
        incident.latitude =
            self.extract_coordinate(record, resolved.latitude, &self.columns.latitude, line)?;
        incident.longitude =
            self.extract_coordinate(record, resolved.longitude, &self.columns.longitude, line)?;
        incident.day_of_week = owned_cell(record, resolved.day_of_week);

        Ok(incident)
    }

    /// Reads a CSV export of this source and normalizes every row.
    ///
    /// Columns not named by the definition are discarded. The first row
    /// that fails to parse aborts the whole load.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read, a required column
    /// is missing, or any row has an unparseable datetime or coordinate.
    pub fn load_csv(
        &self,
        path: &Path,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Vec<IncidentRecord>, SourceError> {
        log::debug!("[{}] Reading {}", self.id, path.display());
        let file = std::fs::File::open(path)?;
        self.load_reader(file, progress)
    }

    /// Same as [`Self::load_csv`] but from any reader.
    ///
    /// # Errors
    ///
    /// See [`Self::load_csv`].
    pub fn load_reader<R: std::io::Read>(
        &self,
        reader: R,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Vec<IncidentRecord>, SourceError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let resolved = self.resolve_headers(reader.headers()?)?;

        let mut incidents = Vec::new();
        let mut record = StringRecord::new();
        let mut ticker = RowTicker::new(progress);

        while reader.read_record(&mut record)? {
            incidents.push(self.normalize_record(&record, &resolved)?);
            ticker.tick();
        }

        ticker.finish();
        log::info!("[{}] Loaded {} rows", self.id, incidents.len());

        Ok(incidents)
    }
}

/// Parses a [`SourceDefinition`] from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or missing required fields.
pub fn parse_source_toml(toml_str: &str) -> Result<SourceDefinition, SourceError> {
    Ok(toml::de::from_str(toml_str)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::null_progress;

    const HISTORICAL_CSV: &str = "\
IncidntNum,Category,Descript,DayOfWeek,Date,Time,PdDistrict,Resolution,Address,X,Y,Location,PdId
170001,ROBBERY,ROBBERY WITH A GUN,Monday,01/02/2017,13:45,mission,NONE,800 Block of MARKET ST,-122.41,37.78,\"(37.78, -122.41)\",1
170002,ASSAULT,BATTERY,Tuesday,01/03/2017,08:00,,ARREST,,-122.40,37.77,,2
";

    const CURRENT_CSV: &str = "\
Incident Datetime,Incident Date,Incident Number,Incident Category,Incident Description,Police District,Resolution,Latitude,Longitude,Incident Day of Week,Row ID
2023/03/11 02:12:00 PM,2023/03/11,230001,Larceny Theft,Theft from vehicle,Tenderloin,Open or Active,37.78,-122.41,Saturday,1
";

    fn historical() -> SourceDefinition {
        parse_source_toml(include_str!("../sources/sf_historical.toml")).unwrap()
    }

    fn current() -> SourceDefinition {
        parse_source_toml(include_str!("../sources/sf_current.toml")).unwrap()
    }

    #[test]
    fn parses_historical_toml() {
        let def = historical();
        assert_eq!(def.id(), "sf_historical");
        assert!(def.truncate_at_boundary);
        assert_eq!(def.columns.longitude, "X");
        assert_eq!(def.columns.latitude, "Y");
    }

    #[test]
    fn truncate_defaults_to_false() {
        assert!(!current().truncate_at_boundary);
    }

    #[test]
    fn loads_historical_rows() {
        let rows = historical()
            .load_reader(HISTORICAL_CSV.as_bytes(), &null_progress())
            .unwrap();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.incident_number, "170001");
        assert_eq!(first.incident_datetime.to_string(), "2017-01-02 13:45:00");
        assert_eq!(first.year, 2017);
        assert_eq!(first.police_district.as_deref(), Some("mission"));
        assert_eq!(first.longitude, Some(-122.41));
        assert_eq!(first.latitude, Some(37.78));
        assert_eq!(first.day_of_week.as_deref(), Some("Monday"));

        assert_eq!(rows[1].police_district, None);
    }

    #[test]
    fn loads_current_rows() {
        let rows = current()
            .load_reader(CURRENT_CSV.as_bytes(), &null_progress())
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].incident_datetime.to_string(), "2023-03-11 14:12:00");
        assert_eq!(rows[0].incident_category.as_deref(), Some("Larceny Theft"));
    }

    #[test]
    fn missing_column_is_fatal() {
        let csv = "IncidntNum,Category,Date,Time\n1,ROBBERY,01/02/2017,13:45\n";
        let err = historical()
            .load_reader(csv.as_bytes(), &null_progress())
            .unwrap_err();
        assert!(matches!(
            err,
            SourceError::MissingColumn { ref source_id, .. } if source_id == "sf_historical"
        ));
    }

    #[test]
    fn bad_datetime_is_fatal() {
        let csv = CURRENT_CSV.replace("2023/03/11 02:12:00 PM", "2023-03-11T14:12:00");
        let err = current()
            .load_reader(csv.as_bytes(), &null_progress())
            .unwrap_err();
        match err {
            SourceError::DateParse { line, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(value, "2023-03-11T14:12:00");
            }
            other => panic!("expected DateParse, got {other:?}"),
        }
    }

    #[test]
    fn bad_coordinate_is_fatal() {
        let csv = CURRENT_CSV.replace("37.78", "unknown");
        let err = current()
            .load_reader(csv.as_bytes(), &null_progress())
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidNumber { ref column, .. } if column == "Latitude"));
    }

    #[test]
    fn whitespace_only_cells_are_kept() {
        let csv = HISTORICAL_CSV.replace(",mission,", ",  ,").replace(",ROBBERY,", ", ,");
        let rows = historical()
            .load_reader(csv.as_bytes(), &null_progress())
            .unwrap();
        assert_eq!(rows[0].police_district.as_deref(), Some("  "));
        assert_eq!(rows[0].incident_category.as_deref(), Some(" "));
        assert!(rows[0].is_complete());
    }

    #[test]
    fn renames_cover_every_non_datetime_column() {
        let def = historical();
        let renames = def.renames();
        assert_eq!(renames.len(), 8);
        assert!(renames.contains(&("X", LONGITUDE)));
        assert!(renames.contains(&("Y", LATITUDE)));
        let required = def.required_columns();
        assert_eq!(required.len(), 10);
        assert_eq!(&required[..3], ["IncidntNum", "Date", "Time"]);
        assert_eq!(current().required_columns()[1], "Incident Datetime");
    }
}
