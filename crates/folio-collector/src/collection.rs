//! Validated collections and their entries.

use std::{collections::BTreeMap, path::PathBuf};

use folio_core::{ChapterFrontmatter, ContentType, EntryId, Record, SchemaError};
use serde::{Deserialize, Serialize};

/// A document admitted into a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Identity within the collection.
    pub id: EntryId,

    /// Source file the entry was loaded from.
    pub source: PathBuf,

    /// Source format.
    pub content_type: ContentType,

    /// Validated front matter.
    pub data: Record,

    /// Document body, passed through unmodified.
    pub body: String,
}

impl Entry {
    /// Typed chapter view of this entry's data.
    pub fn chapter(&self) -> Result<ChapterFrontmatter, SchemaError> {
        ChapterFrontmatter::from_record(self.data.clone(), &self.source.display().to_string())
    }
}

/// Counters for a single collection load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    /// Content files found on disk.
    pub discovered: usize,
    /// Documents admitted.
    pub accepted: usize,
    /// Documents rejected and left out.
    pub skipped: usize,
}

/// A named set of validated entries.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub name: String,
    pub(crate) entries: BTreeMap<EntryId, Entry>,
    pub stats: CollectionStats,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in id order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Entries sorted by an integer field; entries without it go last, ties by id.
    pub fn ordered_by(&self, field: &str) -> Vec<&Entry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by(|a, b| {
            let key = |e: &Entry| e.data.integer(field).map_or((1, 0), |n| (0, n));
            key(a).cmp(&key(b)).then_with(|| a.id.cmp(&b.id))
        });
        entries
    }

    /// Typed chapters ordered by `chapterNumber`.
    pub fn chapters(&self) -> Result<Vec<(&EntryId, ChapterFrontmatter)>, SchemaError> {
        self.ordered_by(folio_core::schema::chapter_fields::CHAPTER_NUMBER)
            .into_iter()
            .map(|entry| entry.chapter().map(|chapter| (&entry.id, chapter)))
            .collect()
    }

    pub(crate) fn insert(&mut self, entry: Entry) {
        self.entries.insert(entry.id.clone(), entry);
    }
}
