//! File-backed metadata store: one JSON document for all conversations.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use super::{ConversationMetadata, MetadataStore};
use crate::error::{Error, Result};

/// Metadata store backed by a single JSON file.
///
/// Writes are atomic: the document is written to a sibling temp file and
/// renamed over the target, so a crash mid-write never truncates the
/// stored set. A missing file reads as an empty set.
#[derive(Debug)]
pub struct JsonMetadataStore {
    path: PathBuf,
}

impl JsonMetadataStore {
    /// Creates a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MetadataStore for JsonMetadataStore {
    fn load_all(&self) -> Result<IndexMap<String, ConversationMetadata>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no metadata file yet");
            return Ok(IndexMap::new());
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| Error::persistence_io("reading metadata", e))?;
        serde_json::from_str(&raw).map_err(|e| Error::persistence_json("decoding metadata", e))
    }

    fn save_all(&self, conversations: &IndexMap<String, ConversationMetadata>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::persistence_io("creating metadata directory", e))?;
        }

        let raw = serde_json::to_string_pretty(conversations)
            .map_err(|e| Error::persistence_json("encoding metadata", e))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(|e| Error::persistence_io("writing metadata", e))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| Error::persistence_io("replacing metadata", e))?;

        debug!(path = %self.path.display(), count = conversations.len(), "metadata saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use chrono::Utc;

    fn sample() -> ConversationMetadata {
        ConversationMetadata {
            messages: vec![Message::new("01/02/23", "14:05", "Alice", "hi")],
            timestamp: Utc::now(),
            has_media: true,
        }
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonMetadataStore::new(dir.path().join("meta.json"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonMetadataStore::new(dir.path().join("meta.json"));

        let mut map = IndexMap::new();
        map.insert("Alice".to_string(), sample());
        store.save_all(&map).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        let meta = &loaded["Alice"];
        assert!(meta.has_media);
        assert_eq!(meta.messages[0].sender(), "Alice");
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonMetadataStore::new(dir.path().join("nested/deeper/meta.json"));
        store.save_all(&IndexMap::new()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_save_replaces_previous_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonMetadataStore::new(dir.path().join("meta.json"));

        let mut map = IndexMap::new();
        map.insert("Alice".to_string(), sample());
        map.insert("Bob".to_string(), sample());
        store.save_all(&map).unwrap();

        map.shift_remove("Alice");
        store.save_all(&map).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key("Bob"));
    }

    #[test]
    fn test_corrupt_file_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.json");
        fs::write(&path, "{ not json").unwrap();
        let err = JsonMetadataStore::new(path).load_all().unwrap_err();
        assert!(err.is_persistence());
    }
}
