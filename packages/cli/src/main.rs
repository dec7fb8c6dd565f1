#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive front end for the SF crime pipeline.
//!
//! Lets users pick which stage to run and prompts for the handful of
//! settings each one takes. The standalone `sf_crime_ingest` and
//! `sf_crime_grouping` binaries expose the same stages as plain CLIs.
//!
//! Uses `indicatif-log-bridge` (via [`sf_crime_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod pipeline;

use dialoguer::Select;

/// Top-level action selection.
enum Tool {
    RunPipeline,
    Clean,
    Group,
    ListSources,
    CategoryTable,
}

impl Tool {
    const ALL: &[Self] = &[
        Self::RunPipeline,
        Self::Clean,
        Self::Group,
        Self::ListSources,
        Self::CategoryTable,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::RunPipeline => "Run full pipeline",
            Self::Clean => "Clean & merge raw exports",
            Self::Group => "Assign focus groups",
            Self::ListSources => "List sources",
            Self::CategoryTable => "Show category table",
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = sf_crime_cli_utils::init_logger();

    println!("SF Crime Pipeline");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::RunPipeline => pipeline::run(&multi, pipeline::Stages::Both)?,
        Tool::Clean => pipeline::run(&multi, pipeline::Stages::CleanOnly)?,
        Tool::Group => pipeline::run(&multi, pipeline::Stages::GroupOnly)?,
        Tool::ListSources => pipeline::list_sources()?,
        Tool::CategoryTable => pipeline::print_category_table(),
    }

    Ok(())
}
