//! Folio Collector Library
//!
//! Loads content collections from disk and admits only documents whose
//! front matter satisfies the collection schema.
//!
//! # Modules
//!
//! - [`collector`] - Directory walking, parsing and validation
//! - [`collection`] - Validated collections and entries
//! - [`manifest`] - JSON hand-off of validated collections

pub mod collection;
pub mod collector;
pub mod manifest;

pub use collection::{Collection, CollectionStats, Entry};
pub use collector::{
    CollectorError, ContentCollector, DocumentError, DocumentReport, Rejection, Result,
};
pub use manifest::{Manifest, read_manifest, write_manifest};
