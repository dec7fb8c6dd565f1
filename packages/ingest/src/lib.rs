#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cleaning stage: merges the historical and current SFPD exports into one
//! normalized CSV.
//!
//! Each registered source is loaded through its
//! [`SourceDefinition`], truncated at the boundary year if the source is
//! superseded by a newer one, then all sources are concatenated. District
//! names are title-cased, incomplete years and rows without a category or
//! district are dropped, and the result is written in one go.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use sf_crime_ingest_models::{IngestSummary, SourceSummary};
use sf_crime_source::SourceError;
use sf_crime_source::config::PipelineConfig;
use sf_crime_source::normalize::title_case;
use sf_crime_source::output::write_csv_atomically;
use sf_crime_source::progress::ProgressCallback;
use sf_crime_source::source_def::SourceDefinition;
use sf_crime_source_models::{IncidentRecord, SHARED_COLUMNS, YEAR};

/// Number of district spellings shown in the before/after report.
const DISTRICT_SAMPLE: usize = 5;

/// Returns all configured sources from the TOML registry, in merge order.
#[must_use]
pub fn all_sources() -> Vec<SourceDefinition> {
    sf_crime_source::registry::all_sources()
}

/// Reads and normalizes one source file.
///
/// # Errors
///
/// Returns [`SourceError`] if the file is missing, lacks a required column,
/// or contains a row that can't be parsed.
pub fn load_source(
    source: &SourceDefinition,
    path: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<IncidentRecord>, SourceError> {
    progress.set_message(format!("Loading {}", source.id()));
    let records = source.load_csv(path, progress)?;
    log::info!(
        "{} loaded: {} rows from {}",
        source.name(),
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Keeps only rows from before `boundary_year`.
///
/// Applied to sources whose coverage overlaps a newer source starting in
/// `boundary_year`, so that year is counted once.
#[must_use]
pub fn exclude_boundary_year(
    records: Vec<IncidentRecord>,
    boundary_year: i32,
) -> Vec<IncidentRecord> {
    records
        .into_iter()
        .filter(|r| r.year < boundary_year)
        .collect()
}

/// Concatenates batches row-wise, preserving order. No deduplication.
#[must_use]
pub fn merge_sources(batches: Vec<Vec<IncidentRecord>>) -> Vec<IncidentRecord> {
    let total = batches.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);
    for batch in batches {
        merged.extend(batch);
    }
    merged
}

/// Distinct non-null district spellings in first-seen order.
#[must_use]
pub fn distinct_districts(records: &[IncidentRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|r| r.police_district.as_deref())
        .filter(|d| seen.insert(*d))
        .map(String::from)
        .collect()
}

/// Title-cases every district name so casing variants collapse into one
/// spelling. Null districts stay null.
pub fn standardize_districts(records: &mut [IncidentRecord]) {
    for record in records {
        if let Some(district) = &record.police_district {
            record.police_district = Some(title_case(district));
        }
    }
}

/// Drops rows from `cutoff_year` onward and rows missing a category or
/// district. Returns the kept rows and the number dropped.
#[must_use]
pub fn retain_complete(
    records: Vec<IncidentRecord>,
    cutoff_year: i32,
) -> (Vec<IncidentRecord>, u64) {
    let before = records.len();
    let kept: Vec<IncidentRecord> = records
        .into_iter()
        .filter(|r| r.year < cutoff_year && r.is_complete())
        .collect();
    let dropped = (before - kept.len()) as u64;
    (kept, dropped)
}

/// Distinct years present in `records`, ascending.
#[must_use]
pub fn distinct_years(records: &[IncidentRecord]) -> Vec<i32> {
    records
        .iter()
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Writes the cleaned dataset, replacing any existing file.
///
/// # Errors
///
/// Returns [`SourceError`] if the file can't be written. On error the
/// previous file, if any, is left in place.
pub fn write_incidents(path: &Path, records: &[IncidentRecord]) -> Result<(), SourceError> {
    write_csv_atomically(path, |writer| {
        // serialize() only emits the header alongside the first row
        if records.is_empty() {
            writer.write_record(SHARED_COLUMNS.iter().chain(std::iter::once(&YEAR)))?;
        }
        for record in records {
            writer.serialize(record)?;
        }
        Ok(())
    })
}

/// Runs the whole cleaning stage.
///
/// `steps` advances once per pipeline step; `rows` tracks rows read from
/// the file currently being loaded.
///
/// # Errors
///
/// Returns [`SourceError`] if the config is invalid or any source fails to
/// load. Nothing is written unless every step succeeds.
pub fn run(
    config: &PipelineConfig,
    steps: &Arc<dyn ProgressCallback>,
    rows: &Arc<dyn ProgressCallback>,
) -> Result<IngestSummary, SourceError> {
    let start = Instant::now();
    config.validate()?;

    let sources = all_sources();
    steps.set_total(sources.len() as u64 + 3);

    let mut summaries = Vec::with_capacity(sources.len());
    let mut batches = Vec::with_capacity(sources.len());

    for source in &sources {
        let path = config.source_path(source);
        let records = load_source(source, &path, rows)?;
        let rows_loaded = records.len() as u64;

        let records = if source.truncate_at_boundary {
            let retained = exclude_boundary_year(records, config.boundary_year);
            log::info!(
                "{}: {} rows after removing {} onward",
                source.id(),
                retained.len(),
                config.boundary_year
            );
            retained
        } else {
            records
        };

        summaries.push(SourceSummary {
            source_id: source.id().to_string(),
            path,
            rows_loaded,
            rows_retained: records.len() as u64,
        });
        batches.push(records);
        steps.inc(1);
    }
    rows.finish_and_clear();

    steps.set_message("Merging".to_string());
    let mut merged = merge_sources(batches);
    let rows_merged = merged.len() as u64;
    log::info!("Combined dataset: {rows_merged} rows");
    steps.inc(1);

    steps.set_message("Standardizing districts".to_string());
    let districts_before = distinct_districts(&merged);
    standardize_districts(&mut merged);
    let districts_after = distinct_districts(&merged);
    log::info!(
        "Districts: {} spellings -> {}",
        districts_before.len(),
        districts_after.len()
    );
    steps.inc(1);

    steps.set_message("Filtering years".to_string());
    let (kept, rows_dropped) = retain_complete(merged, config.cutoff_year);
    log::info!(
        "Dropped {rows_dropped} rows (year >= {} or missing category/district)",
        config.cutoff_year
    );

    write_incidents(&config.clean_output, &kept)?;
    steps.inc(1);
    log::info!(
        "Wrote {} rows to {}",
        kept.len(),
        config.clean_output.display()
    );

    let summary = IngestSummary {
        sources: summaries,
        rows_merged,
        districts_before,
        districts_after,
        rows_dropped,
        rows_written: kept.len() as u64,
        years: distinct_years(&kept),
        output_path: config.clean_output.clone(),
        duration: start.elapsed(),
    };
    steps.finish(format!("Cleaned {} rows", summary.rows_written));

    Ok(summary)
}

/// Prints each configured source with its input file and column renames.
pub fn print_sources(config: &PipelineConfig) {
    for source in &all_sources() {
        println!("{:<16} {}", source.id(), source.name());
        println!("{:<16} file: {}", "", config.source_path(source).display());
        println!("{:<16} reads: {}", "", source.required_columns().join(", "));
        for (from, to) in source.renames() {
            println!("{:<16} {from} -> {to}", "");
        }
        println!();
    }
}

/// Prints the human-readable run report to stdout.
pub fn print_summary(summary: &IngestSummary) {
    println!("--- Loading Datasets ---");
    for source in &summary.sources {
        println!("{} loaded: {} rows", source.source_id, source.rows_loaded);
    }

    for source in summary.sources.iter().filter(|s| s.rows_truncated() > 0) {
        println!();
        println!("--- Filtering {} at boundary year ---", source.source_id);
        println!(
            "{} after removing overlap: {} rows",
            source.source_id, source.rows_retained
        );
    }

    println!();
    println!("--- Merging Datasets ---");
    println!("Combined rows: {}", summary.rows_merged);

    println!();
    println!("--- Standardizing Police Districts ---");
    let sample: Vec<&String> = summary.districts_before.iter().take(DISTRICT_SAMPLE).collect();
    println!("Example district names before: {sample:?}");
    println!("Example district names after: {:?}", summary.districts_after);
    println!(
        "Number of retained districts: {}",
        summary.districts_after.len()
    );

    println!();
    println!("--- Filtering Years ---");
    println!(
        "Dropped {} rows (incomplete years or null values).",
        summary.rows_dropped
    );
    println!("Dataset now spans years: {:?}", summary.years);

    println!();
    println!("--- Exporting Data ---");
    println!(
        "Success! {} rows saved to: {} ({:.1}s)",
        summary.rows_written,
        summary.output_path.display(),
        summary.duration.as_secs_f64()
    );
}

/// Writes the run summary as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`SourceError`] if serialization or the write fails.
pub fn write_summary_json(path: &Path, summary: &IngestSummary) -> Result<(), SourceError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(summary)?)?;
    log::info!("Run summary written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::NaiveDate;
    use sf_crime_source::progress::null_progress;

    use super::*;

    fn record(year: i32, category: Option<&str>, district: Option<&str>) -> IncidentRecord {
        let dt = NaiveDate::from_ymd_opt(year, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let mut r = IncidentRecord::new(format!("{year}"), dt);
        r.incident_category = category.map(String::from);
        r.police_district = district.map(String::from);
        r
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sf_crime_ingest_{}_{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn boundary_filter_drops_overlap_year() {
        let rows = vec![
            record(2016, Some("ARSON"), Some("MISSION")),
            record(2017, Some("ARSON"), Some("MISSION")),
            record(2018, Some("ARSON"), Some("MISSION")),
        ];
        let kept = exclude_boundary_year(rows, 2018);
        assert_eq!(distinct_years(&kept), vec![2016, 2017]);
    }

    #[test]
    fn merge_preserves_order_and_count() {
        let a = vec![record(2003, None, None), record(2004, None, None)];
        let b = vec![record(2019, None, None)];
        let merged = merge_sources(vec![a, b]);
        assert_eq!(merged.len(), 3);
        let years: Vec<i32> = merged.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2003, 2004, 2019]);
    }

    #[test]
    fn districts_collapse_case_variants() {
        let mut rows = vec![
            record(2017, Some("A"), Some("MISSION")),
            record(2017, Some("A"), Some("mission")),
            record(2020, Some("A"), Some("Mission")),
            record(2020, Some("A"), None),
        ];
        assert_eq!(distinct_districts(&rows).len(), 3);
        standardize_districts(&mut rows);
        assert_eq!(distinct_districts(&rows), vec!["Mission"]);
        assert_eq!(rows[3].police_district, None);
    }

    #[test]
    fn retain_complete_drops_cutoff_and_nulls() {
        let rows = vec![
            record(2025, Some("ROBBERY"), Some("Mission")),
            record(2026, Some("ROBBERY"), Some("Mission")),
            record(2024, None, Some("Mission")),
            record(2024, Some("ROBBERY"), None),
        ];
        let (kept, dropped) = retain_complete(rows, 2026);
        assert_eq!(kept.len(), 1);
        assert_eq!(dropped, 3);
        assert!(kept.iter().all(|r| r.year < 2026 && r.is_complete()));
    }

    #[test]
    fn run_merges_both_sources() {
        let dir = temp_dir("run");
        let historical = dir.join("historical.csv");
        let current = dir.join("current.csv");
        std::fs::write(
            &historical,
            "\
IncidntNum,Category,Descript,DayOfWeek,Date,Time,PdDistrict,Resolution,Address,X,Y,Location,PdId
1,ROBBERY,GUN,Monday,01/02/2017,13:45,mission,NONE,MARKET ST,-122.41,37.78,,1
2,ASSAULT,BATTERY,Tuesday,01/02/2018,08:00,MISSION,NONE,MARKET ST,-122.41,37.78,,2
3,ARSON,FIRE,Friday,03/04/2016,23:59,,NONE,MARKET ST,-122.41,37.78,,3
",
        )
        .unwrap();
        std::fs::write(
            &current,
            "\
Incident Datetime,Incident Number,Incident Category,Incident Description,Police District,Resolution,Latitude,Longitude,Incident Day of Week
2018/01/02 08:00:00 AM,10,Assault,Battery,Mission,Open or Active,37.76,-122.42,Tuesday
2025/12/31 11:59:00 PM,11,Robbery,Street,Bayview,Open or Active,37.73,-122.39,Wednesday
2026/01/01 12:30:00 AM,12,Robbery,Street,Bayview,Open or Active,37.73,-122.39,Thursday
",
        )
        .unwrap();

        let mut config = PipelineConfig {
            clean_output: dir.join("out/clean.csv"),
            ..PipelineConfig::default()
        };
        config
            .set_source_file(&format!("sf_historical={}", historical.display()))
            .unwrap();
        config
            .set_source_file(&format!("sf_current={}", current.display()))
            .unwrap();

        let summary = run(&config, &null_progress(), &null_progress()).unwrap();

        assert_eq!(summary.sources[0].rows_loaded, 3);
        assert_eq!(summary.sources[0].rows_retained, 2);
        assert_eq!(summary.sources[1].rows_retained, 3);
        assert_eq!(summary.rows_merged, 5);
        // One null district in 2016, one row in the cutoff year.
        assert_eq!(summary.rows_dropped, 2);
        assert_eq!(summary.rows_written, 3);
        assert_eq!(summary.years, vec![2017, 2018, 2025]);
        assert_eq!(summary.districts_after, vec!["Mission", "Bayview"]);

        let written = std::fs::read_to_string(&config.clean_output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(
            lines[0],
            "Incident Number,Incident Datetime,Incident Category,Incident Description,Police District,Resolution,Latitude,Longitude,Incident Day of Week,Year"
        );
        assert_eq!(
            lines[1],
            "1,2017-01-02 13:45:00,ROBBERY,GUN,Mission,NONE,37.78,-122.41,Monday,2017"
        );
        assert_eq!(lines.len(), 4);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn run_writes_nothing_on_bad_datetime() {
        let dir = temp_dir("bad_datetime");
        let historical = dir.join("historical.csv");
        let current = dir.join("current.csv");
        std::fs::write(
            &historical,
            "IncidntNum,Category,Descript,DayOfWeek,Date,Time,PdDistrict,Resolution,X,Y\n\
1,ROBBERY,GUN,Monday,01/02/2017,13:45,MISSION,NONE,-122.41,37.78\n",
        )
        .unwrap();
        std::fs::write(
            &current,
            "Incident Datetime,Incident Number,Incident Category,Incident Description,Police District,Resolution,Latitude,Longitude,Incident Day of Week\n\
2019-01-02 08:00,10,Assault,Battery,Mission,Open,37.76,-122.42,Wednesday\n",
        )
        .unwrap();

        let mut config = PipelineConfig {
            clean_output: dir.join("clean.csv"),
            ..PipelineConfig::default()
        };
        config.source_files.insert("sf_historical".to_string(), historical);
        config.source_files.insert("sf_current".to_string(), current);

        let err = run(&config, &null_progress(), &null_progress()).unwrap_err();
        assert!(matches!(err, SourceError::DateParse { .. }));
        assert!(!config.clean_output.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn empty_output_still_has_header() {
        let dir = temp_dir("empty");
        let path = dir.join("clean.csv");
        write_incidents(&path, &[]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let mut expected: Vec<&str> = SHARED_COLUMNS.to_vec();
        expected.push(YEAR);
        assert_eq!(written.lines().collect::<Vec<_>>(), vec![expected.join(",")]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn summary_json_lists_sources_and_counts() {
        let dir = temp_dir("summary");
        let path = dir.join("reports").join("summary.json");
        let summary = IngestSummary {
            sources: vec![SourceSummary {
                source_id: "sf_historical".to_string(),
                path: PathBuf::from("old.csv"),
                rows_loaded: 3,
                rows_retained: 2,
            }],
            rows_merged: 2,
            districts_before: vec!["MISSION".to_string()],
            districts_after: vec!["Mission".to_string()],
            rows_dropped: 1,
            rows_written: 1,
            years: vec![2017],
            output_path: dir.join("clean.csv"),
            duration: std::time::Duration::from_millis(1500),
        };
        write_summary_json(&path, &summary).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["sources"][0]["source_id"], "sf_historical");
        assert_eq!(json["sources"][0]["rows_retained"], 2);
        assert_eq!(json["rows_written"], 1);
        assert_eq!(json["years"][0], 2017);
        assert_eq!(json["districts_after"][0], "Mission");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
