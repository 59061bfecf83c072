//! Dataset retrieval.
//!
//! [`SourceReader`] fetches a dataset over HTTP from the configured origin
//! and falls back to the local public directory. Retrieval never fails: a
//! dataset that cannot be read degrades to an empty record list.
//!
//! # Example
//!
//! ```ignore
//! use trekpoints::source::{AsyncReqwestClient, SourceReader, SourceSettings};
//!
//! let client = AsyncReqwestClient::with_timeout(10)?;
//! let reader = SourceReader::new(client, SourceSettings::default());
//! let read = reader.read_records("/data/freecamping.json").await;
//! println!("{} records via {}", read.records.len(), read.origin);
//! ```

mod error;
mod http;
mod reader;

pub use error::SourceError;
pub use http::{AsyncHttpClient, AsyncReqwestClient};
pub use reader::{
    as_array, SourceOrigin, SourceRead, SourceReader, SourceSettings, DEFAULT_ORIGIN,
    DEFAULT_PUBLIC_DIR, DEFAULT_SOURCE_TIMEOUT,
};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
