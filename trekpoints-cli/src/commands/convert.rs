//! Convert command - CSV to map-pin JSON.

use std::path::PathBuf;

use trekpoints::pins::convert_csv_to_pins;

use crate::error::CliError;
use crate::runner::{CliRunner, GlobalOptions};

/// Arguments for the convert-csv command.
pub struct ConvertArgs {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Run the convert-csv command.
pub fn run(options: &GlobalOptions, args: ConvertArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(options, false)?;
    runner.log_startup("convert-csv");

    let count = convert_csv_to_pins(&args.input, &args.output)?;
    println!(
        "JSON saved to {} with {} valid pins.",
        args.output.display(),
        count
    );
    Ok(())
}
