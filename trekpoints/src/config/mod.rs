//! Configuration file handling for `~/.trekpoints/config.ini`.
//!
//! Settings structs live in [`settings`], constants in [`defaults`], parsing
//! in `parser` and serialization in `writer`. Environment overrides for
//! hosted deployments are applied by [`ConfigFile::with_env_overrides`].
//!
//! # Example
//!
//! ```ignore
//! use trekpoints::config::ConfigFile;
//!
//! let config = ConfigFile::load()?.with_env_overrides();
//! println!("fetching from {}", config.sources.origin);
//! ```

pub mod defaults;
mod env;
mod file;
mod parser;
pub mod settings;
mod writer;

pub use defaults::*;
pub use env::{ENV_DEPLOY_PRIME_URL, ENV_LAMBDA_FUNCTION, ENV_NETLIFY, ENV_URL};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, GeometrySettings, LoggingSettings, OutputSettings, SourcesSettings,
};
