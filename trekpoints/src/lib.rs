//! Trekpoints - canonical recreation points for the United States
//!
//! This library ingests recreation-site records (trailheads, campgrounds,
//! free-camping sites, swimming holes, long-trail waypoints) published by
//! several agencies in incompatible JSON schemas and turns them into one
//! deduplicated list of [`Point`]s, each tagged with the US state it lies in.
//!
//! # Architecture
//!
//! ```text
//! SourceReader ──► FieldNormalizer ──► dedupe ──► aggregate
//!   (per dataset)      │
//!                      ▼
//!                 StateResolver
//!        ExplicitField → TextPattern → PolygonTest → BboxTest
//!                                          │            │
//!                                   GeometryIndex  BboxGazetteer
//! ```
//!
//! # Example
//!
//! ```ignore
//! use trekpoints::config::ConfigFile;
//! use trekpoints::pipeline::Pipeline;
//! use trekpoints::source::AsyncReqwestClient;
//!
//! let config = ConfigFile::load()?.with_env_overrides();
//! let client = AsyncReqwestClient::with_timeout(config.sources.timeout_secs)?;
//! let output = Pipeline::new(&config, client).run().await;
//! let index = trekpoints::aggregate::aggregate(&output.points);
//! ```

pub mod aggregate;
pub mod config;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod pins;
pub mod pipeline;
pub mod source;
pub mod states;

pub use model::{FileSpec, Point, PointType, DATASETS};
