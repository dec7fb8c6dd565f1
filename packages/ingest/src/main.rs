#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the cleaning stage.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sf_crime_ingest::{print_sources, print_summary, run, write_summary_json};
use sf_crime_source::config::PipelineConfig;
use sf_crime_source::progress::{log_progress, null_progress};

#[derive(Parser)]
#[command(
    name = "sf_crime_ingest",
    about = "Merge the historical and current SFPD incident exports into one cleaned CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean and merge all configured sources (the default)
    Run(RunArgs),
    /// List the configured sources and the columns each one reads
    Sources {
        /// Path to a pipeline TOML config
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
struct RunArgs {
    /// Path to a pipeline TOML config (defaults to `pipeline.toml` at the project root)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Drop rows from this year onward in sources superseded by a newer one
    #[arg(long)]
    boundary_year: Option<i32>,
    /// Drop rows from this (incomplete) year onward
    #[arg(long)]
    cutoff_year: Option<i32>,
    /// Override a source's input file, as `SOURCE_ID=PATH` (repeatable)
    #[arg(long = "source-file", value_name = "SOURCE_ID=PATH")]
    source_files: Vec<String>,
    /// Where to write the cleaned CSV
    #[arg(long)]
    output: Option<PathBuf>,
    /// Also write the run summary as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            let mut config = PipelineConfig::load(args.config.as_deref())?;
            if let Some(year) = args.boundary_year {
                config.boundary_year = year;
            }
            if let Some(year) = args.cutoff_year {
                config.cutoff_year = year;
            }
            for arg in &args.source_files {
                config.set_source_file(arg)?;
            }
            if let Some(output) = args.output {
                config.clean_output = output;
            }

            let summary = run(&config, &log_progress("clean"), &null_progress())?;
            print_summary(&summary);

            if let Some(path) = args.summary_json {
                write_summary_json(&path, &summary)?;
            }
        }
        Commands::Sources { config } => {
            print_sources(&PipelineConfig::load(config.as_deref())?);
        }
    }

    Ok(())
}
