#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the grouping stage.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sf_crime_grouping::{print_category_table, print_report, run};
use sf_crime_source::config::PipelineConfig;
use sf_crime_source::progress::log_progress;

#[derive(Parser)]
#[command(
    name = "sf_crime_grouping",
    about = "Append a Focus Group column to the cleaned SFPD incident CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Group the cleaned dataset (the default)
    Run(RunArgs),
    /// Print the category lookup table, one focus group at a time
    Table,
}

#[derive(Args, Default)]
struct RunArgs {
    /// Path to a pipeline TOML config (defaults to `pipeline.toml` at the project root)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Cleaned CSV to read
    #[arg(long)]
    input: Option<PathBuf>,
    /// Where to write the grouped CSV
    #[arg(long)]
    output: Option<PathBuf>,
    /// Also write the coverage report as JSON
    #[arg(long)]
    report_json: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            let config = PipelineConfig::load(args.config.as_deref())?;
            let input = args.input.unwrap_or(config.clean_output);
            let output = args.output.unwrap_or(config.grouped_output);

            let report = run(&input, &output, &log_progress("group"))?;
            print_report(&report);
            println!();
            println!("Grouped data saved to {}", output.display());

            if let Some(path) = args.report_json {
                report.write_json(&path)?;
            }
        }
        Commands::Table => print_category_table(),
    }

    Ok(())
}
