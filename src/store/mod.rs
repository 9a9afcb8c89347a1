//! Persistence collaborators: a lightweight metadata store and a bulk
//! content store, kept separate so listings never load media payloads.
//!
//! Both stores are traits so the registry stays testable against
//! in-memory fakes. The bundled implementations are file-backed:
//! [`JsonMetadataStore`] keeps every conversation's metadata in one JSON
//! document, and [`FsContentStore`] keeps one record pair per media file.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::media::MediaType;
use crate::message::Message;

pub mod content;
pub mod metadata;

pub use content::FsContentStore;
pub use metadata::JsonMetadataStore;

/// What the metadata store keeps per conversation: everything needed to
/// list and display it, without media payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationMetadata {
    /// Messages in chronological order.
    pub messages: Vec<Message>,
    /// When the conversation was imported or last saved.
    pub timestamp: DateTime<Utc>,
    /// Sticky evidence-of-attachments flag.
    #[serde(default)]
    pub has_media: bool,
}

/// One persisted media file, tagged with its owning conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Name of the owning conversation.
    pub conversation_name: String,
    /// Key the file is stored under (normalized basename).
    pub file_name: String,
    /// Binary payload.
    #[serde(skip)]
    pub content: Vec<u8>,
    /// Attachment kind.
    pub media_type: MediaType,
    /// Lowercased, dot-prefixed extension.
    pub extension: String,
    /// Full path inside the source archive.
    pub original_path: String,
    /// When the record was written.
    pub timestamp: DateTime<Utc>,
}

/// Store for conversation metadata, loaded whole at startup.
pub trait MetadataStore: Send + Sync {
    /// Loads every stored conversation's metadata, keyed by name.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be read or decoded.
    fn load_all(&self) -> Result<IndexMap<String, ConversationMetadata>>;

    /// Replaces the stored set with `conversations`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be written.
    fn save_all(&self, conversations: &IndexMap<String, ConversationMetadata>) -> Result<()>;
}

/// Store for bulk media content, loaded per conversation on demand.
pub trait ContentStore: Send + Sync {
    /// Writes one media record. An existing record for the same
    /// conversation and file name is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error when the record cannot be written.
    fn put(&self, record: &MediaRecord) -> Result<()>;

    /// Loads every record belonging to `conversation_name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be scanned.
    fn load_for_conversation(&self, conversation_name: &str) -> Result<Vec<MediaRecord>>;

    /// Deletes every record belonging to `conversation_name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be scanned or a
    /// record cannot be removed.
    fn delete_for_conversation(&self, conversation_name: &str) -> Result<()>;
}
