//! Core layer for the SimpleDB client.
//!
//! SimpleDB stores values at slash-delimited paths, nesting them in folders
//! and wrapping every leaf in a metadata envelope. This crate holds the
//! transport-independent pieces:
//! - `Path`: validated path with slash-delimited components
//! - `classify`/`strip`: interpretation of the store's JSON responses,
//!   telling leaf envelopes apart from folders and peeling metadata off
//! - `Envelope`: typed view of a metadata-wrapped leaf
//!
//! The HTTP client that talks to a running server lives in `simpledb-client`.

mod interpret;
mod path;

pub use interpret::{classify, is_metadata_key, strip, Envelope, Shape, METADATA_KEYS};
pub use path::{Path, PathError};
