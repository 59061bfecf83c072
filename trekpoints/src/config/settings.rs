//! Settings structs, one per `[section]` of config.ini.

use std::path::PathBuf;
use std::time::Duration;

use crate::source::SourceSettings;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Dataset retrieval
    pub sources: SourcesSettings,
    /// State boundary file
    pub geometry: GeometrySettings,
    /// Build output
    pub output: OutputSettings,
    /// Logging
    pub logging: LoggingSettings,
}

/// `[sources]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcesSettings {
    /// Base URL dataset paths are resolved against
    pub origin: String,
    /// Local directory mirroring the public files
    pub public_dir: PathBuf,
    /// Per-source fetch timeout in seconds
    pub timeout_secs: u64,
    /// Fall back to `public_dir` when a fetch fails
    pub local_fallback: bool,
}

impl SourcesSettings {
    /// Settings for a [`SourceReader`](crate::source::SourceReader).
    pub fn reader_settings(&self) -> SourceSettings {
        SourceSettings {
            origin: self.origin.clone(),
            public_dir: self.public_dir.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            local_fallback: self.local_fallback,
        }
    }
}

/// `[geometry]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometrySettings {
    /// Public path of the GeoJSON FeatureCollection
    pub path: String,
    /// When false the polygon tier is skipped (bounding boxes only)
    pub enabled: bool,
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub path: PathBuf,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}
