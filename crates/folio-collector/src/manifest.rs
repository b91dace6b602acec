//! JSON manifest of validated collections, handed to the rendering stage.

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    collection::{Collection, CollectionStats, Entry},
    collector::Result,
};

/// Serialized form of every collection in a build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub collections: BTreeMap<String, ManifestCollection>,
}

/// One collection inside the manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestCollection {
    pub stats: CollectionStats,
    pub entries: Vec<Entry>,
}

impl Manifest {
    /// Build a manifest from loaded collections. Entries keep id order.
    pub fn from_collections(collections: &[Collection]) -> Self {
        let collections = collections
            .iter()
            .map(|c| {
                (
                    c.name.clone(),
                    ManifestCollection {
                        stats: c.stats,
                        entries: c.entries().cloned().collect(),
                    },
                )
            })
            .collect();
        Self { collections }
    }

    /// Total number of entries across collections.
    pub fn entry_count(&self) -> usize {
        self.collections.values().map(|c| c.entries.len()).sum()
    }
}

/// Write the manifest for `collections` to `path`, creating parent directories.
pub fn write_manifest(collections: &[Collection], path: &Path) -> Result<Manifest> {
    let manifest = Manifest::from_collections(collections);

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(path, json)?;

    info!(
        path = %path.display(),
        collections = manifest.collections.len(),
        entries = manifest.entry_count(),
        "wrote manifest"
    );

    Ok(manifest)
}

/// Read a manifest previously written by [`write_manifest`].
pub fn read_manifest(path: &Path) -> Result<Manifest> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
