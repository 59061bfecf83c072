//! Default values for every configuration setting.

use std::path::PathBuf;

use super::settings::*;

/// Origin used when neither the file nor the environment provides one.
pub const DEFAULT_ORIGIN: &str = crate::source::DEFAULT_ORIGIN;

/// Local mirror of the origin's public files, relative to the working directory.
pub const DEFAULT_PUBLIC_DIR: &str = crate::source::DEFAULT_PUBLIC_DIR;

/// Per-source fetch timeout in seconds.
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 10;

/// Public path of the state boundary GeoJSON.
pub const DEFAULT_GEOMETRY_PATH: &str = "/geo/us-states.min.json";

/// Output document written by `trekpoints build`.
pub const DEFAULT_OUTPUT_FILE: &str = "points.json";

/// Log file name inside the log directory.
pub const DEFAULT_LOG_FILE: &str = "trekpoints.log";

/// Default log directory (~/.trekpoints/logs).
pub fn default_log_directory() -> PathBuf {
    super::file::config_directory().join("logs")
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            sources: SourcesSettings {
                origin: DEFAULT_ORIGIN.to_string(),
                public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
                timeout_secs: DEFAULT_SOURCE_TIMEOUT_SECS,
                local_fallback: true,
            },
            geometry: GeometrySettings {
                path: DEFAULT_GEOMETRY_PATH.to_string(),
                enabled: true,
            },
            output: OutputSettings {
                path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            },
            logging: LoggingSettings {
                directory: default_log_directory(),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}
