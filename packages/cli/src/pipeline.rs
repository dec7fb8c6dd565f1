//! Interactive stage runner.
//!
//! Loads the pipeline config, optionally lets the user override the
//! boundary and cutoff years and the file locations, then runs the cleaning
//! and/or grouping stage with `indicatif` progress bars.

use std::path::{Path, PathBuf};
use std::time::Instant;

use dialoguer::{Confirm, Input};
use indicatif::MultiProgress;
use sf_crime_cli_utils::IndicatifProgress;
use sf_crime_source::config::PipelineConfig;

/// Which stages an interactive run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stages {
    Both,
    CleanOnly,
    GroupOnly,
}

impl Stages {
    const fn cleans(self) -> bool {
        matches!(self, Self::Both | Self::CleanOnly)
    }

    const fn groups(self) -> bool {
        matches!(self, Self::Both | Self::GroupOnly)
    }
}

fn prompt_path(prompt: &str, default: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.display().to_string())
        .interact_text()?;
    Ok(PathBuf::from(input.trim()))
}

fn prompt_optional_path(prompt: &str) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;

    if input.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(input.trim())))
    }
}

/// Runs the selected stages.
///
/// The `multi` parameter is the shared [`MultiProgress`] that is also
/// registered with the log bridge.
///
/// # Errors
///
/// Returns an error if the config is invalid, a prompt fails, or either
/// stage fails.
pub fn run(multi: &MultiProgress, stages: Stages) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mut config = PipelineConfig::load(None)?;
    log::debug!("Running {stages:?} with {config:?}");
    let mut report_json = None;

    let advanced = Confirm::new()
        .with_prompt("Configure advanced options?")
        .default(false)
        .interact()?;

    if advanced {
        if stages.cleans() {
            config.boundary_year = Input::new()
                .with_prompt("Boundary year (historical rows from this year on are dropped)")
                .default(config.boundary_year)
                .interact_text()?;
            config.cutoff_year = Input::new()
                .with_prompt("Cutoff year (rows from this year on are dropped)")
                .default(config.cutoff_year)
                .interact_text()?;
            config.validate()?;
        }

        // The grouping stage reads whatever the cleaning stage writes.
        config.clean_output = prompt_path("Cleaned CSV", &config.clean_output)?;

        if stages.groups() {
            config.grouped_output = prompt_path("Grouped CSV", &config.grouped_output)?;
            report_json = prompt_optional_path("Coverage report JSON (empty to skip)")?;
        }
    }

    if stages.cleans() {
        let steps = IndicatifProgress::steps_bar(multi, "Cleaning");
        let rows = IndicatifProgress::rows_bar(multi, "Loading");
        let summary = sf_crime_ingest::run(&config, &steps, &rows)?;
        println!();
        sf_crime_ingest::print_summary(&summary);
    }

    if stages.groups() {
        let rows = IndicatifProgress::rows_bar(multi, "Grouping");
        let report =
            sf_crime_grouping::run(&config.clean_output, &config.grouped_output, &rows)?;
        println!();
        sf_crime_grouping::print_report(&report);
        println!();
        println!("Grouped data saved to {}", config.grouped_output.display());

        if let Some(path) = report_json {
            report.write_json(&path)?;
        }
    }

    println!();
    println!("Done in {:.1}s", start.elapsed().as_secs_f64());

    Ok(())
}

/// Prints the configured sources.
///
/// # Errors
///
/// Returns an error if `pipeline.toml` exists but can't be parsed.
pub fn list_sources() -> Result<(), Box<dyn std::error::Error>> {
    let config = PipelineConfig::load(None)?;
    sf_crime_ingest::print_sources(&config);
    Ok(())
}

/// Prints the category lookup table.
pub fn print_category_table() {
    sf_crime_grouping::print_category_table();
}
