//! File-backed content store: one record pair per media file.
//!
//! Each record is split into a small `.json` descriptor (everything except
//! the payload) and a sibling `.bin` payload, named by a stable hash of
//! the conversation and file names. Loading scans the descriptor files and
//! filters by owning conversation; a descriptor that fails to decode, or a
//! payload that fails to read, is logged and skipped rather than failing
//! the whole load.

use std::fs;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{ContentStore, MediaRecord};
use crate::error::{Error, Result};

/// Content store backed by a directory of record pairs.
#[derive(Debug)]
pub struct FsContentStore {
    dir: PathBuf,
}

impl FsContentStore {
    /// Creates a store backed by the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the backing directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stable record id for a (conversation, file) pair: a 12-hex-char
    /// hash, so arbitrary names never produce unsafe filesystem paths.
    fn record_id(conversation_name: &str, file_name: &str) -> String {
        let mut hasher = DefaultHasher::new();
        conversation_name.hash(&mut hasher);
        file_name.hash(&mut hasher);
        format!("{:012x}", hasher.finish() & 0xffff_ffff_ffff)
    }

    fn descriptor_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn payload_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.bin"))
    }
}

impl ContentStore for FsContentStore {
    fn put(&self, record: &MediaRecord) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| Error::persistence_io("creating content directory", e))?;

        let id = Self::record_id(&record.conversation_name, &record.file_name);
        let descriptor = serde_json::to_string(record)
            .map_err(|e| Error::persistence_json("encoding media record", e))?;

        fs::write(self.payload_path(&id), &record.content)
            .map_err(|e| Error::persistence_io("writing media payload", e))?;
        fs::write(self.descriptor_path(&id), descriptor)
            .map_err(|e| Error::persistence_io("writing media record", e))?;

        debug!(id, file = %record.file_name, "media record stored");
        Ok(())
    }

    fn load_for_conversation(&self, conversation_name: &str) -> Result<Vec<MediaRecord>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| Error::persistence_io("scanning content directory", e))?;

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::persistence_io("scanning content directory", e))?;
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            let mut record: MediaRecord = match fs::read_to_string(&path)
                .map_err(Error::from)
                .and_then(|raw| serde_json::from_str(&raw).map_err(Error::from))
            {
                Ok(record) => record,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable media record");
                    continue;
                }
            };

            if record.conversation_name != conversation_name {
                continue;
            }

            match fs::read(path.with_extension("bin")) {
                Ok(content) => record.content = content,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping record with missing payload");
                    continue;
                }
            }
            records.push(record);
        }

        Ok(records)
    }

    fn delete_for_conversation(&self, conversation_name: &str) -> Result<()> {
        if !self.dir.exists() {
            return Ok(());
        }
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| Error::persistence_io("scanning content directory", e))?;

        for entry in entries {
            let entry = entry.map_err(|e| Error::persistence_io("scanning content directory", e))?;
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            let owner = fs::read_to_string(&path)
                .ok()
                .and_then(|raw| serde_json::from_str::<MediaRecord>(&raw).ok())
                .map(|record| record.conversation_name);
            if owner.as_deref() != Some(conversation_name) {
                continue;
            }

            fs::remove_file(path.with_extension("bin"))
                .map_err(|e| Error::persistence_io("deleting media payload", e))?;
            fs::remove_file(&path)
                .map_err(|e| Error::persistence_io("deleting media record", e))?;
        }

        Ok(())
    }
}
