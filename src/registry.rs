//! The conversation registry: the in-memory collection of imported
//! conversations plus its persistence collaborators.
//!
//! The registry hydrates metadata at open and media content lazily, the
//! first time a conversation is actually viewed. Persistence is best
//! effort throughout: a store failure is logged, the registry flags
//! itself degraded, and the in-memory state stays authoritative for the
//! rest of the session.

use chrono::Utc;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::conversation::Conversation;
use crate::media::MediaEntry;
use crate::store::{ContentStore, ConversationMetadata, MediaRecord, MetadataStore};

/// Named collection of conversations with best-effort persistence.
pub struct ConversationRegistry {
    conversations: IndexMap<String, Conversation>,
    metadata: Box<dyn MetadataStore>,
    content: Box<dyn ContentStore>,
    persistence_degraded: bool,
}

impl ConversationRegistry {
    /// Opens a registry, hydrating conversation metadata from the store.
    ///
    /// A metadata load failure does not prevent opening: the registry
    /// starts empty and degraded, and the session carries on in memory.
    pub fn open(metadata: Box<dyn MetadataStore>, content: Box<dyn ContentStore>) -> Self {
        let mut registry = Self {
            conversations: IndexMap::new(),
            metadata,
            content,
            persistence_degraded: false,
        };

        match registry.metadata.load_all() {
            Ok(stored) => {
                for (name, meta) in stored {
                    let mut conversation = Conversation::new(name.clone(), meta.messages);
                    conversation.timestamp = meta.timestamp;
                    conversation.has_media = meta.has_media;
                    registry.conversations.insert(name, conversation);
                }
                info!(count = registry.conversations.len(), "registry hydrated");
            }
            Err(err) => {
                warn!(error = %err, "metadata unavailable, starting with empty registry");
                registry.persistence_degraded = true;
            }
        }

        registry
    }

    /// Whether any store operation has failed this session.
    pub fn is_persistence_degraded(&self) -> bool {
        self.persistence_degraded
    }

    /// Inserts or replaces a conversation and persists the metadata set.
    ///
    /// The conversation's timestamp is refreshed to now. Store failures
    /// are logged, never propagated.
    pub fn save(&mut self, mut conversation: Conversation) {
        conversation.timestamp = Utc::now();
        self.conversations
            .insert(conversation.name.clone(), conversation);
        self.persist_metadata();
    }

    /// Persists every media entry of the named conversation to the
    /// content store. Per-entry failures are logged and skipped.
    pub fn persist_media(&mut self, name: &str) {
        let Some(conversation) = self.conversations.get(name) else {
            return;
        };
        let timestamp = Utc::now();
        let mut failed = false;

        for (key, entry) in &conversation.media_files {
            // Alias keys share the entry; only the basename key is stored.
            if *key != crate::media::basename(&entry.original_path) {
                continue;
            }
            let record = MediaRecord {
                conversation_name: name.to_string(),
                file_name: key.clone(),
                content: entry.content.clone(),
                media_type: entry.media_type,
                extension: entry.extension.clone(),
                original_path: entry.original_path.clone(),
                timestamp,
            };
            if let Err(err) = self.content.put(&record) {
                warn!(file = %key, error = %err, "failed to persist media entry");
                failed = true;
            }
        }

        if failed {
            self.persistence_degraded = true;
        }
    }

    /// Returns the named conversation for viewing, hydrating its media
    /// from the content store on first access.
    ///
    /// Updates the access time and persists metadata so recency survives
    /// restarts. Returns `None` for unknown names.
    pub fn load(&mut self, name: &str) -> Option<&Conversation> {
        if !self.conversations.contains_key(name) {
            return None;
        }

        let needs_media = self
            .conversations
            .get(name)
            .is_some_and(|c| c.media_files.is_empty());
        if needs_media {
            match self.content.load_for_conversation(name) {
                Ok(records) => {
                    let conversation = self.conversations.get_mut(name)?;
                    for record in records {
                        conversation.insert_media(MediaEntry {
                            content: record.content,
                            media_type: record.media_type,
                            extension: record.extension,
                            original_path: record.original_path,
                        });
                    }
                    debug!(name, count = conversation.media_files.len(), "media hydrated");
                }
                Err(err) => {
                    warn!(name, error = %err, "failed to hydrate media");
                    self.persistence_degraded = true;
                }
            }
        }

        self.conversations.get_mut(name)?.touch();
        self.persist_metadata();
        self.conversations.get(name)
    }

    /// Returns the named conversation without touching access time or the
    /// stores.
    pub fn get(&self, name: &str) -> Option<&Conversation> {
        self.conversations.get(name)
    }

    /// Removes a conversation and its stored media records.
    ///
    /// Returns whether the conversation existed. Store failures are
    /// logged, never propagated.
    pub fn delete(&mut self, name: &str) -> bool {
        if self.conversations.shift_remove(name).is_none() {
            return false;
        }
        if let Err(err) = self.content.delete_for_conversation(name) {
            warn!(name, error = %err, "failed to delete media records");
            self.persistence_degraded = true;
        }
        self.persist_metadata();
        true
    }

    /// Lists all conversations, lexicographically by name.
    pub fn list(&self) -> Vec<&Conversation> {
        let mut all: Vec<&Conversation> = self.conversations.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// Number of conversations held.
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether the registry holds no conversations.
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    fn persist_metadata(&mut self) {
        let snapshot: IndexMap<String, ConversationMetadata> = self
            .conversations
            .iter()
            .map(|(name, c)| {
                (
                    name.clone(),
                    ConversationMetadata {
                        messages: c.messages.clone(),
                        timestamp: c.timestamp,
                        has_media: c.has_media,
                    },
                )
            })
            .collect();

        if let Err(err) = self.metadata.save_all(&snapshot) {
            warn!(error = %err, "failed to persist metadata");
            self.persistence_degraded = true;
        }
    }
}

impl std::fmt::Debug for ConversationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationRegistry")
            .field("conversations", &self.conversations.len())
            .field("persistence_degraded", &self.persistence_degraded)
            .finish_non_exhaustive()
    }
}
