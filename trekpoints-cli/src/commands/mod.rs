//! CLI command implementations.
//!
//! - [`build`] - Run the ingestion pipeline and write the output document
//! - [`config`] - Configuration management (path, show, init)
//! - [`convert`] - CSV → map-pin JSON conversion
//! - [`datasets`] - List the dataset registry
//! - [`locate`] - Resolve the state for one coordinate

pub mod build;
pub mod config;
pub mod convert;
pub mod datasets;
pub mod locate;
