//! Assembled conversations and missing-media diagnostics.
//!
//! A [`Conversation`] pairs the chronologically ordered messages of one
//! import with the media pulled from the same archive. After assembly,
//! [`Conversation::reassociate`] re-binds message references to actual
//! media keys, and [`Conversation::missing_media_report`] summarizes what
//! could not be bound. The `has_media` flag is sticky: once a conversation
//! has shown evidence of attachments, the flag survives even if the media
//! content itself is later unavailable.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::media::{MediaEntry, MediaMap, MediaResolver, ReferenceExtractor, insert_aliased};
use crate::message::Message;

/// Diagnostics about references that could not be resolved to media.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingMediaReport {
    /// Whether any reference failed to resolve.
    pub has_missing_media: bool,
    /// Number of messages whose reference failed to resolve.
    pub missing_media_count: usize,
    /// Unresolved references, deduplicated, in first-seen order.
    pub missing_media_list: Vec<String>,
}

/// One imported chat: named, ordered messages plus keyed media.
#[derive(Debug)]
pub struct Conversation {
    /// Display name of the conversation.
    pub name: String,
    /// Messages in chronological order.
    pub messages: Vec<Message>,
    /// Media entries keyed by basename and full archive path.
    pub media_files: MediaMap,
    /// When this conversation was imported or last saved.
    pub timestamp: DateTime<Utc>,
    /// Sticky evidence-of-attachments flag.
    pub has_media: bool,
    /// When this conversation was last opened for viewing.
    pub last_accessed: Option<DateTime<Utc>>,
}

impl Conversation {
    /// Creates a conversation from parsed messages.
    pub fn new(name: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            name: name.into(),
            messages,
            media_files: MediaMap::new(),
            timestamp: Utc::now(),
            has_media: false,
            last_accessed: None,
        }
    }

    /// Adds a media entry under its basename and full-path aliases and
    /// marks the conversation as media-bearing.
    ///
    /// Returns the basename key.
    pub fn insert_media(&mut self, entry: MediaEntry) -> String {
        self.has_media = true;
        insert_aliased(&mut self.media_files, entry)
    }

    /// Looks up the media entry bound to a message, if any.
    pub fn media_for(&self, message: &Message) -> Option<&Arc<MediaEntry>> {
        self.media_files.get(message.media_reference()?)
    }

    /// Re-binds message media references to actual stored keys.
    ///
    /// Only messages *without* a reference get a second extraction pass;
    /// an existing reference is then resolved and, on success, replaced by
    /// the resolved key so later lookups are exact. References that do not
    /// resolve are left as extracted, to be surfaced by
    /// [`missing_media_report`](Self::missing_media_report).
    pub fn reassociate(&mut self, extractor: &ReferenceExtractor, resolver: &MediaResolver) {
        for message in &mut self.messages {
            if message.media_reference.is_none() {
                message.media_reference = extractor.extract(&message.text);
            }
            if let Some(reference) = message.media_reference.as_deref() {
                if let Some(resolved) = resolver.resolve(reference, &self.media_files) {
                    message.media_reference = Some(resolved);
                }
            }
        }
    }

    /// Summarizes references that point at no stored media entry.
    ///
    /// The count is per message; the list is deduplicated in first-seen
    /// order, so three messages citing the same lost file count as three
    /// but list once.
    pub fn missing_media_report(&self) -> MissingMediaReport {
        let mut report = MissingMediaReport::default();
        for message in &self.messages {
            let Some(reference) = message.media_reference() else {
                continue;
            };
            if self.media_files.contains_key(reference) {
                continue;
            }
            report.missing_media_count += 1;
            if !report.missing_media_list.iter().any(|r| r == reference) {
                report.missing_media_list.push(reference.to_string());
            }
        }
        report.has_missing_media = report.missing_media_count > 0;
        report
    }

    /// Updates the sticky `has_media` flag from current evidence: stored
    /// entries, or references that claim attachments existed.
    pub fn mark_media_presence(&mut self) {
        if !self.media_files.is_empty()
            || self.messages.iter().any(|m| m.media_reference.is_some())
        {
            self.has_media = true;
        }
    }

    /// Records a viewing access.
    pub fn touch(&mut self) {
        self.last_accessed = Some(Utc::now());
    }
}
