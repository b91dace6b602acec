//! Folio Core Library
//!
//! Front matter parsing, collection schemas, configuration, and error
//! handling for Folio content collections.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;
pub mod schema;
pub mod value;

pub use config::{CollectionDef, CollectionRegistry, Config, InvalidPolicy};
pub use content::{ContentType, EntryId};
pub use error::{CoreError, Result, SchemaError};
pub use frontmatter::parse_frontmatter;
pub use schema::{ChapterFrontmatter, FieldSchema, FieldType, Record, Schema};
pub use value::{Metadata, RawValue, ValueKind};
