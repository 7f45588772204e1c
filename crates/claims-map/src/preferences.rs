//! Saved mapping preferences.
//!
//! Users who correct a suggested mapping usually receive the same export
//! layout again next month. Preferences remember `source -> target`
//! assignments per schema type so they can be re-applied with
//! [`MappingSet::apply_preferences`](crate::MappingSet::apply_preferences).
//!
//! # Storage Format
//!
//! [`JsonFilePreferenceStore`] keeps one JSON object per file:
//!
//! ```json
//! { "claims": { "Member #": "claimantId" }, "experience": {} }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PreferenceError;
use crate::schema::SchemaType;

/// Saved assignments, `source column -> target field`.
pub type Preferences = BTreeMap<String, String>;

/// Storage for mapping preferences.
pub trait PreferenceStore {
    /// Replaces the saved preferences for `schema`.
    fn save(&mut self, schema: SchemaType, preferences: &Preferences) -> Result<(), PreferenceError>;

    /// Saved preferences for `schema`; empty when nothing was saved.
    fn load(&self, schema: SchemaType) -> Result<Preferences, PreferenceError>;
}

/// In-process store, mostly for tests and one-shot runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    entries: BTreeMap<SchemaType, Preferences>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn save(&mut self, schema: SchemaType, preferences: &Preferences) -> Result<(), PreferenceError> {
        self.entries.insert(schema, preferences.clone());
        Ok(())
    }

    fn load(&self, schema: SchemaType) -> Result<Preferences, PreferenceError> {
        Ok(self.entries.get(&schema).cloned().unwrap_or_default())
    }
}

/// Preferences persisted to a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
}

impl JsonFilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<SchemaType, Preferences>, PreferenceError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(|source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|source| PreferenceError::Json {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn save(&mut self, schema: SchemaType, preferences: &Preferences) -> Result<(), PreferenceError> {
        let mut all = self.read_all()?;
        all.insert(schema, preferences.clone());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PreferenceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(&all).map_err(|source| PreferenceError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), schema = %schema, count = preferences.len(), "saved mapping preferences");
        Ok(())
    }

    fn load(&self, schema: SchemaType) -> Result<Preferences, PreferenceError> {
        Ok(self.read_all()?.remove(&schema).unwrap_or_default())
    }
}
