//! Minimal CouchDB client.
//!
//! Covers the database lifecycle: create, get, destroy and list. Every call
//! sends exactly one JSON request and yields either the parsed response body
//! or a [`CouchError`] saying whether the server was unreachable, reported a
//! failure, or answered with something that is not JSON.
//!
//! # Example
//!
//! ```ignore
//! use siloxane_couch::{ConfigSource, Couch};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let couch = Couch::new(ConfigSource::from_fn(|name| {
//!         format!("http://127.0.0.1:5984/{name}")
//!     }))?;
//!
//!     couch.db().create("alice").await?;
//!     println!("{}", couch.db().list().await?);
//!     couch.db().destroy("alice").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! A settings file works too: `Couch::new("/etc/siloxane.toml")` reads
//! `url = "http://127.0.0.1:5984"` from it before returning.

mod client;
mod config;
mod db;
mod error;
mod request;
mod transport;

pub use client::{Callback, Couch};
pub use config::{ConfigSource, DatabaseUrls, ServerConfig};
pub use db::{ALL_DBS, Databases};
pub use error::{ConfigError, CouchError, TransportError};
pub use request::{JSON_HEADERS, Method, RequestDescriptor};
pub use transport::{HttpTransport, RawResponse, Transport};

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory this crate was built from.
pub const PATH: &str = env!("CARGO_MANIFEST_DIR");
