#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The shared incident schema both SFPD datasets are normalized into.
//!
//! Each raw export uses its own column names and datetime encoding. After
//! normalization every row becomes an [`IncidentRecord`], which serializes
//! to the nine [`SHARED_COLUMNS`] plus the derived `Year`.

use chrono::{Datelike as _, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Column holding the incident identifier.
pub const INCIDENT_NUMBER: &str = "Incident Number";
/// Column holding the combined date and time of the incident.
pub const INCIDENT_DATETIME: &str = "Incident Datetime";
/// Column holding the fine-grained incident category.
pub const INCIDENT_CATEGORY: &str = "Incident Category";
/// Column holding the free-text incident description.
pub const INCIDENT_DESCRIPTION: &str = "Incident Description";
/// Column holding the police district name.
pub const POLICE_DISTRICT: &str = "Police District";
/// Column holding the outcome label.
pub const RESOLUTION: &str = "Resolution";
/// Column holding the latitude.
pub const LATITUDE: &str = "Latitude";
/// Column holding the longitude.
pub const LONGITUDE: &str = "Longitude";
/// Column holding the day of the week.
pub const DAY_OF_WEEK: &str = "Incident Day of Week";
/// Column holding the year derived from [`INCIDENT_DATETIME`].
pub const YEAR: &str = "Year";
/// Column appended by the grouping stage.
pub const FOCUS_GROUP: &str = "Focus Group";

/// The shared schema, in output order.
pub const SHARED_COLUMNS: [&str; 9] = [
    INCIDENT_NUMBER,
    INCIDENT_DATETIME,
    INCIDENT_CATEGORY,
    INCIDENT_DESCRIPTION,
    POLICE_DISTRICT,
    RESOLUTION,
    LATITUDE,
    LONGITUDE,
    DAY_OF_WEEK,
];

/// Format used when writing `Incident Datetime` to CSV.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One crime incident in the shared schema.
///
/// Field order matches the CSV column order. Text fields are `None` when the
/// source cell was empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Source-assigned identifier. Not unique across sources.
    #[serde(rename = "Incident Number")]
    pub incident_number: String,
    /// Local time of the incident. No timezone is encoded in either source.
    #[serde(rename = "Incident Datetime", with = "datetime_column")]
    pub incident_datetime: NaiveDateTime,
    /// Fine-grained category from the source vocabulary.
    #[serde(rename = "Incident Category")]
    pub incident_category: Option<String>,
    /// Free-text description.
    #[serde(rename = "Incident Description")]
    pub incident_description: Option<String>,
    /// Police district as spelled by the source.
    #[serde(rename = "Police District")]
    pub police_district: Option<String>,
    /// Outcome label.
    #[serde(rename = "Resolution")]
    pub resolution: Option<String>,
    /// Latitude (unvalidated range).
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    /// Longitude (unvalidated range).
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    /// Day of week as reported upstream.
    #[serde(rename = "Incident Day of Week")]
    pub day_of_week: Option<String>,
    /// Calendar year of [`Self::incident_datetime`].
    #[serde(rename = "Year")]
    pub year: i32,
}

impl IncidentRecord {
    /// Creates a record with only the identifier and datetime populated.
    ///
    /// `year` is derived from `incident_datetime`.
    #[must_use]
    pub fn new(incident_number: impl Into<String>, incident_datetime: NaiveDateTime) -> Self {
        Self {
            incident_number: incident_number.into(),
            incident_datetime,
            incident_category: None,
            incident_description: None,
            police_district: None,
            resolution: None,
            latitude: None,
            longitude: None,
            day_of_week: None,
            year: incident_datetime.year(),
        }
    }

    /// Whether both fields required downstream are present.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.incident_category.is_some() && self.police_district.is_some()
    }
}

/// Serde adapter writing [`NaiveDateTime`] as [`DATETIME_FORMAT`].
mod datetime_column {
    use chrono::NaiveDateTime;
    use serde::{Deserialize as _, Deserializer, Serializer};

    use super::DATETIME_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(DATETIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT).map_err(serde::de::Error::custom)
    }
}
