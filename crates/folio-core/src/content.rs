//! Content file types and entry identities.

use std::{borrow::Borrow, fmt, path::Path};

use serde::{Deserialize, Serialize};

/// Type of content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Markdown content (.md, .markdown files).
    Markdown,
    /// MDX content (.mdx files). The body is carried through untouched.
    Mdx,
}

impl ContentType {
    /// Determine content type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "mdx" => Some(Self::Mdx),
            _ => None,
        }
    }

    /// Determine content type from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Get the canonical file extension for this content type.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Mdx => "mdx",
        }
    }
}

/// Identity of a document within its collection, derived from its path.
///
/// - `intro.md` → `intro`
/// - `Using Reflect.md` → `using-reflect`
/// - `traps/get.md` → `traps/get`
/// - `traps/index.md` → `traps`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Derive an id from a path relative to the collection directory.
    ///
    /// Returns `None` for paths that are not content files.
    pub fn from_path(relative: &Path) -> Option<Self> {
        ContentType::from_path(relative)?;
        let stem = relative.file_stem()?.to_str()?;

        let parent = relative
            .parent()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();

        let raw = if stem.eq_ignore_ascii_case("index") && !parent.is_empty() {
            parent
        } else if parent.is_empty() {
            stem.to_string()
        } else {
            format!("{parent}/{stem}")
        };

        let id = raw
            .trim_matches('/')
            .split('/')
            .map(slugify)
            .collect::<Vec<_>>()
            .join("/");

        (!id.is_empty()).then_some(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

fn slugify(segment: &str) -> String {
    segment
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
