#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the land-use toolchain.
//!
//! `analyze` runs the green, industrial and other pipelines over a
//! configured region and writes the enriched postal areas as CSV and
//! `GeoJSON`. `plot` charts one postal area from a previous run's CSV.
//!
//! Logging goes through [`land_use_cli_utils::init_logger`] so that log
//! lines and progress bars never fight for the terminal.

mod analyze;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use land_use_chart::ChartData;
use land_use_source::config::AnalysisConfig;
use land_use_source::{export, registry};

#[derive(Parser)]
#[command(name = "land_use", about = "Postal-area land-use composition")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute land-use shares, dominant land use and population change
    Analyze {
        /// Analysis configuration TOML file
        #[arg(long, required_unless_present = "preset", conflicts_with = "preset")]
        config: Option<PathBuf>,

        /// Built-in preset id (see `presets`)
        #[arg(long)]
        preset: Option<String>,

        /// Directory for the CSV, `GeoJSON` and chart outputs
        #[arg(long, default_value = "data/output")]
        output_dir: PathBuf,

        /// Save a chart for this postal code (repeatable)
        #[arg(long = "plot", value_name = "POSTAL_CODE")]
        plot: Vec<String>,
    },
    /// Chart one postal area from a previous run
    Plot {
        /// Postal code to chart
        #[arg(long)]
        postal_code: String,

        /// CSV written by `analyze`
        #[arg(long, default_value = "data/output/land_use.csv")]
        input: PathBuf,

        /// Save as PNG instead of drawing in the terminal
        #[arg(long)]
        save: bool,

        /// Directory the PNG is saved to
        #[arg(long, default_value = "data/output")]
        output_dir: PathBuf,
    },
    /// List the built-in presets
    Presets,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = land_use_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            config,
            preset,
            output_dir,
            plot,
        } => {
            let config = match (config, preset) {
                (Some(path), _) => AnalysisConfig::load(&path)?,
                (None, Some(id)) => registry::preset(&id)?,
                (None, None) => return Err("either --config or --preset is required".into()),
            };
            analyze::run(&config, &output_dir, &plot, &multi)?;
        }
        Commands::Plot {
            postal_code,
            input,
            save,
            output_dir,
        } => {
            let rows = export::read_csv_file(&input)?;
            let data = ChartData::for_postal_code(&rows, &postal_code)?;
            if save {
                std::fs::create_dir_all(&output_dir)?;
            }
            land_use_chart::show(&data, save, &output_dir)?;
        }
        Commands::Presets => {
            for preset in registry::all_presets() {
                println!(
                    "{:<12} {} (municipality {})",
                    preset.id,
                    preset.name,
                    preset.municipality_code.as_deref().unwrap_or("any"),
                );
            }
        }
    }

    Ok(())
}
