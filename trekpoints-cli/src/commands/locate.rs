//! Locate command - resolve the state for one coordinate.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use trekpoints::model::RawRecord;
use trekpoints::states::{GeometryIndex, StateResolver};

use crate::error::CliError;

/// Arguments for the locate command.
pub struct LocateArgs {
    pub lat: f64,
    pub lon: f64,
    pub geometry: Option<PathBuf>,
    pub text: Option<String>,
}

/// Run the locate command.
pub fn run(args: LocateArgs) -> Result<(), CliError> {
    if !(-90.0..=90.0).contains(&args.lat) || !(-180.0..=180.0).contains(&args.lon) {
        return Err(CliError::Config(format!(
            "coordinates out of range: {}, {}",
            args.lat, args.lon
        )));
    }

    let geometry = match &args.geometry {
        Some(path) => GeometryIndex::load_file(path),
        None => GeometryIndex::empty(),
    };
    let polygons = geometry.len();
    let resolver = StateResolver::standard(Arc::new(geometry));

    let row = locate_row(args.lat, args.lon);
    let resolution = resolver.resolve(&row, args.text.as_deref().unwrap_or(""));

    println!("Location: {}, {}", args.lat, args.lon);
    if args.geometry.is_some() {
        println!("Polygons: {}", polygons);
    } else {
        println!("Polygons: none (bounding boxes only)");
    }
    match resolution.tier {
        Some(tier) => println!("State:    {} (via {})", resolution.state, tier),
        None => println!("State:    {}", resolution.state),
    }
    Ok(())
}

fn locate_row(lat: f64, lon: f64) -> RawRecord {
    match json!({ "lat": lat, "lon": lon }) {
        Value::Object(map) => map,
        _ => RawRecord::new(),
    }
}
