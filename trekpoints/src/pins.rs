//! CSV → map-pin JSON conversion.
//!
//! Turns a spreadsheet export with `name, description, latitude, longitude,
//! source` columns into the JSON array shape the hand-curated datasets use.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from pin conversion.
#[derive(Debug, Error)]
pub enum PinsError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One map pin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinRecord {
    pub name: String,
    pub description: String,
    pub lat: f64,
    pub lon: f64,
    pub source: String,
}

struct Columns {
    name: Option<usize>,
    description: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
    source: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |wanted: &str| headers.iter().position(|h| h.trim() == wanted);
        Self {
            name: find("name"),
            description: find("description"),
            latitude: find("latitude"),
            longitude: find("longitude"),
            source: find("source"),
        }
    }
}

fn field<'r>(record: &'r StringRecord, idx: Option<usize>) -> &'r str {
    idx.and_then(|i| record.get(i)).unwrap_or("").trim()
}

/// Parses one coordinate; missing, malformed, non-finite and zero values are rejected.
fn coordinate(raw: &str) -> Option<f64> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v != 0.0 => Some(v),
        _ => None,
    }
}

/// Reads pins from CSV, skipping rows without usable coordinates.
pub fn read_pins<R: Read>(reader: R) -> Result<Vec<PinRecord>, PinsError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::from_headers(rdr.headers()?);

    let mut pins = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        let (lat, lon) = match (
            coordinate(field(&record, columns.latitude)),
            coordinate(field(&record, columns.longitude)),
        ) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                debug!(row = line + 1, "skipping row without usable coordinates");
                continue;
            }
        };

        pins.push(PinRecord {
            name: field(&record, columns.name).to_string(),
            description: field(&record, columns.description).to_string(),
            lat,
            lon,
            source: field(&record, columns.source).to_string(),
        });
    }
    Ok(pins)
}

/// Writes pins as a pretty-printed JSON array.
pub fn write_pins<W: Write>(writer: W, pins: &[PinRecord]) -> Result<(), PinsError> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, pins)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Converts `input` CSV to `output` JSON. Returns the number of pins written.
pub fn convert_csv_to_pins(input: &Path, output: &Path) -> Result<usize, PinsError> {
    let file = File::open(input).map_err(|source| PinsError::Open {
        path: input.display().to_string(),
        source,
    })?;
    let pins = read_pins(file)?;

    let out = File::create(output).map_err(|source| PinsError::Open {
        path: output.display().to_string(),
        source,
    })?;
    write_pins(out, &pins)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        pins = pins.len(),
        "map pins written"
    );
    Ok(pins.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CSV: &str = "\
name,description,latitude,longitude,source
  Bear Creek TH , Trail to falls ,39.61,-105.33, ridb
Zero Lat,,0,-105.0,ridb
Bad Lon,,39.0,west,ridb
Missing,,,,ridb
Hanging Lake,Travertine,39.6014,-107.1917,custom
";

    #[test]
    fn test_read_pins_filters_and_trims() {
        let pins = read_pins(CSV.as_bytes()).unwrap();

        assert_eq!(pins.len(), 2);
        assert_eq!(
            pins[0],
            PinRecord {
                name: "Bear Creek TH".to_string(),
                description: "Trail to falls".to_string(),
                lat: 39.61,
                lon: -105.33,
                source: "ridb".to_string(),
            }
        );
        assert_eq!(pins[1].name, "Hanging Lake");
    }

    #[test]
    fn test_missing_coordinate_columns_yield_nothing() {
        let pins = read_pins("name,source\nA,custom\n".as_bytes()).unwrap();
        assert!(pins.is_empty());
    }

    #[test]
    fn test_convert_writes_json_array() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("pins.csv");
        let output = temp.path().join("pins.json");
        std::fs::write(&input, CSV).unwrap();

        let count = convert_csv_to_pins(&input, &output).unwrap();
        assert_eq!(count, 2);

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        let first = &written[0];
        assert_eq!(first["name"], "Bear Creek TH");
        assert_eq!(first["lat"], 39.61);
        assert_eq!(first["source"], "ridb");
        assert_eq!(written.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_missing_input_file() {
        let temp = TempDir::new().unwrap();
        let err = convert_csv_to_pins(&temp.path().join("nope.csv"), &temp.path().join("o.json"))
            .unwrap_err();
        assert!(matches!(err, PinsError::Open { .. }));
    }
}
