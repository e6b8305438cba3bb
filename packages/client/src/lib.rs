//! # simpledb-client
//!
//! Blocking HTTP client for SimpleDB, a hierarchical path-addressed
//! key-value store.
//!
//! ## Protocol
//!
//! Every operation is one round trip against the server's base URL:
//!
//! - `read(path)` → `GET /read/{path}` → leaf or folder JSON
//! - `write(path, value)` → `PUT /write/{path}` with `{"value": ...}`
//! - `delete_value(path)` → `DELETE /delete_value/{path}` → deleted leaf
//! - `delete_folder(path)` → `DELETE /delete_folder/{path}` → deleted subtree
//!
//! The server wraps each stored value in a metadata envelope (`created_at`,
//! `created_by`, `updated_at`, `updated_by`). [`Client::read`] strips those
//! envelopes recursively; [`Client::read_with_metadata`] hands back the raw
//! body.
//!
//! ## Example
//!
//! ```ignore
//! use simpledb_client::{path, Client};
//! use serde_json::json;
//!
//! let client = Client::new("http://127.0.0.1:6924")?;
//!
//! client.write(&path!("greetings/hello"), &json!({"message": "hi"}))?;
//!
//! // Some({"message": "hi"})
//! let value = client.read(&path!("greetings/hello"))?;
//!
//! // A read of a path the store has never seen is Ok(None), not an error.
//! assert!(client.read(&path!("no/such/path"))?.is_none());
//! ```

mod client;
mod error;

pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL};
pub use error::Error;

// Re-export the core layer so callers need only one crate.
pub use simpledb_core::{
    classify, is_metadata_key, path, strip, Envelope, Path, PathError, Shape, METADATA_KEYS,
};
