//! Trekpoints CLI - Command-line interface
//!
//! Builds the canonical, state-tagged point list from the agency datasets and
//! exposes the individual stages for inspection.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::build::BuildArgs;
use commands::config::ConfigCommands;
use commands::convert::ConvertArgs;
use commands::locate::LocateArgs;
use error::CliError;
use runner::GlobalOptions;

#[derive(Parser)]
#[command(name = "trekpoints")]
#[command(version, about = "Canonical recreation points for the United States", long_about = None)]
struct Cli {
    /// Use an alternate config file instead of ~/.trekpoints/config.ini
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every dataset, normalize, dedupe and write the output document
    Build {
        /// Output file (default from config: points.json)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Origin the dataset paths are fetched from
        #[arg(long)]
        origin: Option<String>,

        /// Local public directory used when a fetch fails
        #[arg(long)]
        public_dir: Option<PathBuf>,

        /// Never read datasets from the local public directory
        #[arg(long)]
        network_only: bool,

        /// Skip state polygons and use bounding boxes only
        #[arg(long)]
        no_geometry: bool,

        /// Write the document to stdout instead of a file
        #[arg(long)]
        stdout: bool,
    },

    /// Resolve the US state for a coordinate
    Locate {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// GeoJSON file of state boundaries (bounding boxes only when omitted)
        #[arg(long)]
        geometry: Option<PathBuf>,

        /// Free text (town, directions) to search for a state
        #[arg(long)]
        text: Option<String>,
    },

    /// List the dataset registry
    Datasets,

    /// Convert a CSV of pins (name, description, latitude, longitude, source) to JSON
    ConvertCsv {
        /// Input CSV file
        input: PathBuf,

        /// Output JSON file
        output: PathBuf,
    },

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();
    let options = GlobalOptions {
        config: cli.config,
        verbose: cli.verbose,
    };

    let result: Result<(), CliError> = match cli.command {
        Commands::Build {
            output,
            origin,
            public_dir,
            network_only,
            no_geometry,
            stdout,
        } => commands::build::run(
            &options,
            BuildArgs {
                output,
                origin,
                public_dir,
                network_only,
                no_geometry,
                stdout,
            },
        ),
        Commands::Locate {
            lat,
            lon,
            geometry,
            text,
        } => commands::locate::run(LocateArgs {
            lat,
            lon,
            geometry,
            text,
        }),
        Commands::Datasets => {
            commands::datasets::run();
            Ok(())
        }
        Commands::ConvertCsv { input, output } => {
            commands::convert::run(&options, ConvertArgs { input, output })
        }
        Commands::Config(command) => commands::config::run(&options, command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
