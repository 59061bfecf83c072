//! Build command - run the pipeline and write the output document.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};
use trekpoints::pipeline::{Pipeline, PipelineOutput, PipelineReport};
use trekpoints::source::AsyncReqwestClient;
use trekpoints::Point;

use crate::error::CliError;
use crate::runner::{CliRunner, GlobalOptions};

/// Arguments for the build command.
pub struct BuildArgs {
    pub output: Option<PathBuf>,
    pub origin: Option<String>,
    pub public_dir: Option<PathBuf>,
    pub network_only: bool,
    pub no_geometry: bool,
    pub stdout: bool,
}

/// Serialized result of a build.
#[derive(Serialize)]
struct OutputDocument<'a> {
    generated_at: String,
    report: &'a PipelineReport,
    points: &'a [Point],
    /// `"<type>::<state>"` → slugs
    index: BTreeMap<String, Vec<String>>,
}

impl<'a> OutputDocument<'a> {
    fn new(output: &'a PipelineOutput) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            report: &output.report,
            points: &output.points,
            index: output.index().slug_map(),
        }
    }
}

/// Run the build command.
pub fn run(options: &GlobalOptions, args: BuildArgs) -> Result<(), CliError> {
    let mut runner = CliRunner::new(options, !args.stdout)?;
    runner.log_startup("build");

    let config = runner.config_mut();
    if let Some(origin) = args.origin {
        config.sources.origin = origin;
    }
    if let Some(dir) = args.public_dir {
        config.sources.public_dir = dir;
    }
    if args.network_only {
        config.sources.local_fallback = false;
    }
    if args.no_geometry {
        config.geometry.enabled = false;
    }
    if let Some(path) = args.output {
        config.output.path = path;
    }
    let config = runner.config().clone();

    info!(
        origin = %config.sources.origin,
        public_dir = %config.sources.public_dir.display(),
        local_fallback = config.sources.local_fallback,
        "building points"
    );

    let client = AsyncReqwestClient::with_timeout(config.sources.timeout_secs)
        .map_err(CliError::HttpClient)?;
    let pipeline = Pipeline::new(&config, client);
    let output = runner.runtime()?.block_on(pipeline.run());

    for source in output.report.unavailable_sources() {
        warn!(path = %source.path, "dataset unavailable");
    }

    let document = serde_json::to_vec_pretty(&OutputDocument::new(&output))?;

    if args.stdout {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(&document)
            .and_then(|_| stdout.write_all(b"\n"))
            .map_err(|error| CliError::FileWrite {
                path: "<stdout>".to_string(),
                error,
            })?;
        return Ok(());
    }

    runner.write_file(&config.output.path, &document)?;
    print_summary(&output.report, &config.output.path);
    Ok(())
}

fn print_summary(report: &PipelineReport, path: &std::path::Path) {
    println!();
    println!("Sources:");
    for source in &report.sources {
        println!(
            "  {:<38} {:>6} records  ({})",
            source.path, source.records, source.origin
        );
    }
    println!();
    println!("Points:       {} ({} before dedupe)", report.output, report.total);
    println!("Unknown:      {}", report.unknown);
    println!("Duplicates:   {}", report.duplicates_removed);
    println!("Polygons:     {}", report.polygons_loaded);
    if !report.tier_counts.is_empty() {
        println!("Resolved by:");
        for (tier, count) in &report.tier_counts {
            println!("  {:<16} {}", tier, count);
        }
    }
    if report.invalid_coordinates + report.invalid_numbers + report.skipped_rows > 0 {
        println!(
            "Skipped/invalid: {} rows, {} coordinates, {} numbers",
            report.skipped_rows, report.invalid_coordinates, report.invalid_numbers
        );
    }
    println!();
    println!("Wrote {}", path.display());
}
