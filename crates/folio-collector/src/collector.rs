//! Content collection loading.
//!
//! Walks a collection directory, parses each document's front matter and
//! validates it against the collection schema. Documents are independent of
//! each other, so they are parsed in parallel; results are keyed by entry id
//! so the outcome does not depend on scheduling order.

use std::{
    collections::HashMap,
    fmt, fs,
    path::{Path, PathBuf},
};

use folio_core::{
    CollectionDef, CollectionRegistry, Config, ContentType, CoreError, EntryId, InvalidPolicy,
    SchemaError, parse_frontmatter,
};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::collection::{Collection, Entry};

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// The requested collection is not registered.
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// The collection directory does not exist.
    #[error("collection `{name}` directory not found: {}", .path.display())]
    MissingDirectory { name: String, path: PathBuf },

    /// A content file whose path cannot be turned into an entry id.
    #[error("invalid content path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// Two files resolve to the same entry id.
    #[error("duplicate entry `{id}` in collection `{collection}`: {} and {}", .first.display(), .second.display())]
    DuplicateId {
        collection: String,
        id: EntryId,
        first: PathBuf,
        second: PathBuf,
    },

    /// One or more documents were rejected under [`InvalidPolicy::Fail`].
    #[error("collection `{collection}`: {} document(s) rejected", .rejected.len())]
    Invalid {
        collection: String,
        rejected: Vec<Rejection>,
    },

    /// Manifest serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Why a single document was not admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The front matter block is not valid YAML/TOML.
    Syntax(String),
    /// The metadata does not match the collection schema.
    Schema(SchemaError),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(message) => f.write_str(message),
            Self::Schema(err) => write!(f, "{err}"),
        }
    }
}

impl From<SchemaError> for DocumentError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

/// A rejected document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub id: EntryId,
    pub path: PathBuf,
    pub error: DocumentError,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Every problem found in one document, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    pub id: EntryId,
    pub path: PathBuf,
    pub errors: Vec<DocumentError>,
}

impl DocumentReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Content collector that walks collection directories and validates files.
#[derive(Debug, Clone)]
pub struct ContentCollector {
    registry: CollectionRegistry,
    policy: InvalidPolicy,
}

impl ContentCollector {
    /// Create a new content collector.
    #[must_use]
    pub fn new(registry: CollectionRegistry, policy: InvalidPolicy) -> Self {
        Self { registry, policy }
    }

    /// Create a collector for every collection in a configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.registry(), config.build.on_invalid)
    }

    pub fn registry(&self) -> &CollectionRegistry {
        &self.registry
    }

    pub fn policy(&self) -> InvalidPolicy {
        self.policy
    }

    /// Load and validate a single collection.
    pub fn collect(&self, name: &str) -> Result<Collection> {
        let def = self.definition(name)?;
        info!(collection = %def.name, dir = %def.directory.display(), "collecting content");

        let files = self.discover(def)?;
        info!(count = files.len(), "found content files");

        let outcomes = files
            .par_iter()
            .map(|(id, path)| load_document(def, id, path))
            .collect::<Result<Vec<_>>>()?;

        let mut collection = Collection::new(&def.name);
        collection.stats.discovered = files.len();

        let mut rejected = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(entry) => {
                    debug!(id = %entry.id, "accepted");
                    collection.insert(entry);
                }
                Err(rejection) => rejected.push(rejection),
            }
        }

        if !rejected.is_empty() {
            match self.policy {
                InvalidPolicy::Fail => {
                    for r in &rejected {
                        warn!(path = %r.path.display(), error = %r.error, "rejected document");
                    }
                    return Err(CollectorError::Invalid {
                        collection: def.name.clone(),
                        rejected,
                    });
                }
                InvalidPolicy::Skip => {
                    for r in &rejected {
                        warn!(path = %r.path.display(), error = %r.error, "skipping document");
                    }
                    collection.stats.skipped = rejected.len();
                }
            }
        }

        collection.stats.accepted = collection.len();
        info!(
            collection = %collection.name,
            accepted = collection.stats.accepted,
            skipped = collection.stats.skipped,
            "content collection complete"
        );

        Ok(collection)
    }

    /// Load and validate every registered collection, in name order.
    pub fn collect_all(&self) -> Result<Vec<Collection>> {
        self.registry
            .names()
            .map(|name| self.collect(name))
            .collect()
    }

    /// Report every problem in every document of a collection without
    /// applying the invalid-document policy.
    pub fn diagnose(&self, name: &str) -> Result<Vec<DocumentReport>> {
        let def = self.definition(name)?;
        let files = self.discover(def)?;

        files
            .par_iter()
            .map(|(id, path)| -> Result<DocumentReport> {
                let source_id = path.display().to_string();
                let errors = match read_source(path)? {
                    Ok(content) => match parse_frontmatter(&content, path) {
                        Ok((metadata, _)) => def
                            .schema
                            .diagnose(&metadata, &source_id)
                            .into_iter()
                            .map(DocumentError::Schema)
                            .collect(),
                        Err(e) => vec![syntax_error(e)],
                    },
                    Err(e) => vec![e],
                };
                Ok(DocumentReport {
                    id: id.clone(),
                    path: path.clone(),
                    errors,
                })
            })
            .collect()
    }

    fn definition(&self, name: &str) -> Result<&CollectionDef> {
        let def = self
            .registry
            .get(name)
            .ok_or_else(|| CollectorError::UnknownCollection(name.to_string()))?;

        if !def.directory.is_dir() {
            return Err(CollectorError::MissingDirectory {
                name: def.name.clone(),
                path: def.directory.clone(),
            });
        }

        Ok(def)
    }

    /// Find content files and assign entry ids, rejecting id collisions.
    fn discover(&self, def: &CollectionDef) -> Result<Vec<(EntryId, PathBuf)>> {
        let mut files = Vec::new();
        let mut seen: HashMap<EntryId, PathBuf> = HashMap::new();

        for entry in WalkDir::new(&def.directory)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        {
            let entry = entry?;
            if !entry.file_type().is_file() || ContentType::from_path(entry.path()).is_none() {
                continue;
            }

            let path = entry.into_path();
            let relative = path.strip_prefix(&def.directory).unwrap_or(&path);
            let id = EntryId::from_path(relative)
                .ok_or_else(|| CollectorError::InvalidPath(path.clone()))?;

            if let Some(first) = seen.get(&id) {
                return Err(CollectorError::DuplicateId {
                    collection: def.name.clone(),
                    id,
                    first: first.clone(),
                    second: path,
                });
            }

            seen.insert(id.clone(), path.clone());
            files.push((id, path));
        }

        Ok(files)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn syntax_error(err: CoreError) -> DocumentError {
    match err {
        CoreError::Frontmatter { message, .. } => DocumentError::Syntax(message),
        other => DocumentError::Syntax(other.to_string()),
    }
}

/// Read a document's source text. Bytes that are not UTF-8 reject the
/// document rather than the collection.
fn read_source(path: &Path) -> Result<std::result::Result<String, DocumentError>> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8(bytes)
        .map_err(|e| DocumentError::Syntax(format!("not valid UTF-8: {}", e.utf8_error()))))
}

/// Read, parse and validate one document.
///
/// The outer result carries I/O failures, which always abort; the inner one
/// is the admit-or-reject decision.
fn load_document(
    def: &CollectionDef,
    id: &EntryId,
    path: &Path,
) -> Result<std::result::Result<Entry, Rejection>> {
    debug!(path = %path.display(), "parsing file");

    let reject = |error: DocumentError| Rejection {
        id: id.clone(),
        path: path.to_path_buf(),
        error,
    };

    let content = match read_source(path)? {
        Ok(content) => content,
        Err(e) => return Ok(Err(reject(e))),
    };

    let (metadata, body) = match parse_frontmatter(&content, path) {
        Ok(parsed) => parsed,
        Err(e) => return Ok(Err(reject(syntax_error(e)))),
    };

    let source_id = path.display().to_string();
    let data = match def.schema.validate(&metadata, &source_id) {
        Ok(record) => record,
        Err(e) => return Ok(Err(reject(e.into()))),
    };

    let content_type = ContentType::from_path(path)
        .ok_or_else(|| CollectorError::InvalidPath(path.to_path_buf()))?;

    Ok(Ok(Entry {
        id: id.clone(),
        source: path.to_path_buf(),
        content_type,
        data,
        body,
    }))
}
