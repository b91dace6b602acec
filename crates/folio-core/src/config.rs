//! Project configuration and the collection registry.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    schema::{FieldSchema, Schema},
};

/// Name of the collection used when none is configured.
pub const DEFAULT_COLLECTION: &str = "js-proxy";

/// Main configuration structure for Folio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Collections keyed by name.
    #[serde(default)]
    pub collections: BTreeMap<String, CollectionConfig>,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Root directory holding one sub-directory per collection.
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Where the validated collection manifest is written.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// What to do with documents that fail validation.
    #[serde(default)]
    pub on_invalid: InvalidPolicy,
}

/// Handling of documents rejected by their collection schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidPolicy {
    /// Abort the build.
    #[default]
    Fail,
    /// Leave the document out and report it.
    Skip,
}

/// Configuration for a single collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Directory holding the collection's documents.
    /// Defaults to `<content_dir>/<name>`.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Declared fields. Empty means the chapter schema.
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_output() -> PathBuf {
    PathBuf::from("dist/collections.json")
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            output: default_output(),
            on_invalid: InvalidPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration layering `FOLIO__`-prefixed environment variables
    /// over the file, e.g. `FOLIO__BUILD__ON_INVALID=skip`. A missing file
    /// yields the defaults.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        for (name, collection) in &self.collections {
            if name.trim().is_empty() {
                return Err(CoreError::config("collection name cannot be empty"));
            }

            let mut seen = HashSet::new();
            for field in &collection.fields {
                if field.name.is_empty() {
                    return Err(CoreError::config(format!(
                        "collections.{name}: field name cannot be empty"
                    )));
                }
                if !seen.insert(field.name.as_str()) {
                    return Err(CoreError::config(format!(
                        "collections.{name}: duplicate field `{}`",
                        field.name
                    )));
                }
            }
        }

        if self.build.output.as_os_str().is_empty() {
            return Err(CoreError::config("build.output cannot be empty"));
        }

        Ok(())
    }

    /// Build the collection registry described by this configuration.
    pub fn registry(&self) -> CollectionRegistry {
        let mut collections: BTreeMap<String, CollectionDef> = self
            .collections
            .iter()
            .map(|(name, cfg)| {
                let directory = cfg
                    .directory
                    .clone()
                    .unwrap_or_else(|| self.build.content_dir.join(name));
                let schema = if cfg.fields.is_empty() {
                    Schema::chapters()
                } else {
                    Schema::new(cfg.fields.clone())
                };
                (
                    name.clone(),
                    CollectionDef {
                        name: name.clone(),
                        directory,
                        schema,
                    },
                )
            })
            .collect();

        if collections.is_empty() {
            tracing::debug!("no collections configured, using `{DEFAULT_COLLECTION}`");
            collections.insert(
                DEFAULT_COLLECTION.to_string(),
                CollectionDef {
                    name: DEFAULT_COLLECTION.to_string(),
                    directory: self.build.content_dir.join(DEFAULT_COLLECTION),
                    schema: Schema::chapters(),
                },
            );
        }

        CollectionRegistry { collections }
    }
}

/// A resolved collection: where its documents live and the schema they obey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDef {
    pub name: String,
    pub directory: PathBuf,
    pub schema: Schema,
}

/// Collection name to definition mapping handed to the collector.
#[derive(Debug, Clone, Default)]
pub struct CollectionRegistry {
    collections: BTreeMap<String, CollectionDef>,
}

impl CollectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection, replacing any previous one with the same name.
    pub fn register(&mut self, def: CollectionDef) {
        self.collections.insert(def.name.clone(), def);
    }

    pub fn get(&self, name: &str) -> Option<&CollectionDef> {
        self.collections.get(name)
    }

    /// Iterate collections in name order.
    pub fn iter(&self) -> impl Iterator<Item = &CollectionDef> {
        self.collections.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
