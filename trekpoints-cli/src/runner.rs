//! CLI runner for common setup.
//!
//! Loads configuration, applies environment overrides and initializes
//! logging so command handlers start from a ready state.

use std::path::{Path, PathBuf};

use tracing::info;
use trekpoints::config::{config_file_path, ConfigFile};
use trekpoints::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Global options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Alternate config.ini
    pub config: Option<PathBuf>,
    /// Debug-level logging
    pub verbose: bool,
}

impl GlobalOptions {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_file_path)
    }

    /// Loads config.ini (defaults when absent) with environment overrides.
    pub fn load_config(&self) -> Result<ConfigFile, CliError> {
        Ok(ConfigFile::load_from(&self.config_path())?.with_env_overrides())
    }
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// `log_to_stdout` should be false when stdout carries command output.
    pub fn new(options: &GlobalOptions, log_to_stdout: bool) -> Result<Self, CliError> {
        let config = options.load_config()?;
        let level = if options.verbose { "debug" } else { "info" };

        let logging_guard = init_logging(
            &config.logging.directory,
            &config.logging.file,
            level,
            log_to_stdout,
        )
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Mutable access for command-line overrides.
    pub fn config_mut(&mut self) -> &mut ConfigFile {
        &mut self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Trekpoints v{}", env!("CARGO_PKG_VERSION"));
        info!(
            log = %self.logging_guard.log_path().display(),
            "trekpoints {} command",
            command
        );
    }

    /// Builds a multi-threaded tokio runtime for async commands.
    pub fn runtime(&self) -> Result<tokio::runtime::Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)
    }

    /// Writes `data` to `path`, creating parent directories.
    pub fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), CliError> {
        let to_error = |error| CliError::FileWrite {
            path: path.display().to_string(),
            error,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(to_error)?;
        }
        std::fs::write(path, data).map_err(to_error)
    }
}
