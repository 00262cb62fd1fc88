//! Optional username to image lookup.
//!
//! The mapping file is auxiliary: any failure to read it degrades to an empty
//! mapping and a diagnostic, never an error.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use race_model::{Diagnostic, Diagnostics, normalize_username};
use serde::Serialize;
use serde_json::Value;

use crate::error::{IngestError, Result, file_error};

/// Default name of the image mapping file.
pub const DEFAULT_IMAGE_MAPPING_FILE: &str = "image-mapping.json";

/// Username to image reference, keyed by normalized username.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImageMapping {
    entries: BTreeMap<String, String>,
}

impl ImageMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a JSON object of `username -> image`.
    ///
    /// Keys are normalized the same way usernames are. Entries whose value is
    /// not a string are ignored.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| file_error(path, e))?;
        let object: serde_json::Map<String, Value> =
            serde_json::from_str(&content).map_err(|e| IngestError::JsonParse {
                path: path.to_path_buf(),
                source: e,
            })?;
        let mut mapping = Self::new();
        for (key, value) in object {
            match value {
                Value::String(image) => mapping.insert(&key, image),
                other => {
                    tracing::debug!(key = %key, value = %other, "Ignoring non-string image mapping entry");
                }
            }
        }
        Ok(mapping)
    }

    pub fn insert(&mut self, username: &str, image: impl Into<String>) {
        let key = normalize_username(username);
        if !key.is_empty() {
            self.entries.insert(key, image.into());
        }
    }

    /// Image reference for a username, with or without a leading `@`.
    pub fn image_for(&self, username: &str) -> Option<&str> {
        self.entries
            .get(&normalize_username(username))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Loads the mapping, reporting failures as diagnostics.
pub fn load_image_mapping(path: &Path, diagnostics: &mut Diagnostics) -> ImageMapping {
    match ImageMapping::load(path) {
        Ok(mapping) => {
            tracing::debug!(path = %path.display(), entries = mapping.len(), "Loaded image mapping");
            mapping
        }
        Err(IngestError::FileNotFound { .. }) => {
            diagnostics.push(Diagnostic::info("no image mapping file, images disabled").with_path(path));
            ImageMapping::new()
        }
        Err(error) => {
            diagnostics.push(
                Diagnostic::warning(format!("image mapping ignored: {error}")).with_path(path),
            );
            ImageMapping::new()
        }
    }
}

/// Read-once holder for the image mapping.
///
/// The file is read on first access and reused for the lifetime of the
/// cache value; drop the cache to force a reread.
#[derive(Debug)]
pub struct ImageMappingCache {
    path: PathBuf,
    mapping: OnceLock<ImageMapping>,
}

impl ImageMappingCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mapping: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the mapping, reading the file on first call.
    ///
    /// Diagnostics are only recorded by the call that performs the read.
    pub fn get(&self, diagnostics: &mut Diagnostics) -> &ImageMapping {
        self.mapping
            .get_or_init(|| load_image_mapping(&self.path, diagnostics))
    }

    pub fn is_loaded(&self) -> bool {
        self.mapping.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_normalizes_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("image-mapping.json");
        std::fs::write(
            &path,
            r#"{"@pilot1": "images/pilot1.jpg", "pilot2": "images/pilot2.jpg", "bad": 3}"#,
        )
        .unwrap();

        let mapping = ImageMapping::load(&path).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.image_for("pilot1"), Some("images/pilot1.jpg"));
        assert_eq!(mapping.image_for("@pilot2"), Some("images/pilot2.jpg"));
        assert_eq!(mapping.image_for("bad"), None);
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let mut diagnostics = Diagnostics::new();
        let mapping = load_image_mapping(&dir.path().join("image-mapping.json"), &mut diagnostics);
        assert!(mapping.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.warning_count(), 0);
    }

    #[test]
    fn test_malformed_file_degrades_with_warning() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("image-mapping.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let mut diagnostics = Diagnostics::new();
        let mapping = load_image_mapping(&path, &mut diagnostics);
        assert!(mapping.is_empty());
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_cache_reads_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("image-mapping.json");
        std::fs::write(&path, r#"{"a": "a.png"}"#).unwrap();

        let cache = ImageMappingCache::new(&path);
        let mut diagnostics = Diagnostics::new();
        assert!(!cache.is_loaded());
        assert_eq!(cache.get(&mut diagnostics).len(), 1);

        std::fs::write(&path, r#"{"a": "a.png", "b": "b.png"}"#).unwrap();
        assert_eq!(cache.get(&mut diagnostics).len(), 1);
        assert!(cache.is_loaded());
    }
}
