//! Datasets command - list the static dataset registry.

use trekpoints::DATASETS;

/// Run the datasets command.
pub fn run() {
    println!("{:<36} {:<13} {}", "PATH", "TYPE", "SOURCE");
    for spec in DATASETS {
        println!(
            "{:<36} {:<13} {}",
            spec.path,
            spec.point_type.as_str(),
            spec.source
        );
    }
}
