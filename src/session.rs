//! Session orchestration: the import pipeline and the viewing surface.
//!
//! A [`Session`] drives the whole flow for one user: decode an archive,
//! parse the transcript, bind media, hand the assembled conversation to
//! the registry, and later serve it back with missing-media diagnostics.
//! The session moves through a small state machine
//! (`Idle -> Importing -> Ready -> Viewing`); a failed import always
//! lands back in `Idle`.

use tracing::{info, warn};

use crate::archive::extract_archive;
use crate::conversation::{Conversation, MissingMediaReport};
use crate::error::Result;
use crate::media::{MediaEntry, MediaResolver, ReferenceExtractor};
use crate::parser::TranscriptParser;
use crate::registry::ConversationRegistry;

/// Where the session currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing imported or selected.
    Idle,
    /// An archive import is in flight.
    Importing,
    /// An import completed; its conversation is the active one.
    Ready,
    /// A conversation is open for viewing.
    Viewing,
}

/// Name used when neither the caller nor the transcript supplies one.
const FALLBACK_NAME: &str = "unnamed";

/// Summary handed back after a successful import.
#[derive(Debug, Clone)]
pub struct ImportSummary {
    /// Name the conversation was registered under.
    pub name: String,
    /// Number of parsed messages.
    pub message_count: usize,
    /// Number of media map keys, path aliases included.
    pub media_count: usize,
    /// References that failed to resolve.
    pub missing: MissingMediaReport,
}

/// One user's session over the registry.
pub struct Session {
    registry: ConversationRegistry,
    state: SessionState,
    active: Option<String>,
    parser: TranscriptParser,
    resolver: MediaResolver,
    extractor: ReferenceExtractor,
    self_senders: Vec<String>,
}

impl Session {
    /// Creates an idle session over the given registry.
    pub fn new(registry: ConversationRegistry) -> Self {
        Self {
            registry,
            state: SessionState::Idle,
            active: None,
            parser: TranscriptParser::new(),
            resolver: MediaResolver::new(),
            extractor: ReferenceExtractor::new(),
            self_senders: Vec::new(),
        }
    }

    /// Sets the sender names treated as the session owner's own messages.
    #[must_use]
    pub fn with_self_senders(mut self, senders: Vec<String>) -> Self {
        self.self_senders = senders;
        self
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Name of the active conversation, if any.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Read access to the underlying registry.
    pub fn registry(&self) -> &ConversationRegistry {
        &self.registry
    }

    /// Whether a message was sent by the session owner.
    pub fn is_own_message(&self, sender: &str) -> bool {
        self.self_senders.iter().any(|s| s == sender)
    }

    /// Imports an export bundle: decode, parse, bind media, register.
    ///
    /// The conversation name is `explicit_name` when given, else the first
    /// sender in transcript order, else a fixed fallback. Importing the
    /// same name again replaces the previous conversation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Archive`](crate::Error::Archive) when the bytes
    /// are not a valid zip bundle; the session returns to idle and the
    /// registry is untouched.
    pub fn import_archive(
        &mut self,
        bytes: &[u8],
        explicit_name: Option<&str>,
    ) -> Result<ImportSummary> {
        self.state = SessionState::Importing;
        self.active = None;

        let contents = match extract_archive(bytes) {
            Ok(contents) => contents,
            Err(err) => {
                self.state = SessionState::Idle;
                return Err(err);
            }
        };

        let parsed = self
            .parser
            .parse(contents.transcript.as_deref().unwrap_or(""));
        if contents.transcript.is_none() {
            warn!("archive contained no transcript entry");
        }

        let name = explicit_name
            .map(str::to_string)
            .or(parsed.first_sender)
            .unwrap_or_else(|| FALLBACK_NAME.to_string());

        let mut conversation = Conversation::new(name.clone(), parsed.messages);
        for raw in contents.media {
            conversation.insert_media(MediaEntry {
                content: raw.content,
                media_type: raw.media_type,
                extension: raw.extension,
                original_path: raw.path,
            });
        }
        conversation.reassociate(&self.extractor, &self.resolver);
        conversation.mark_media_presence();

        let missing = conversation.missing_media_report();
        let summary = ImportSummary {
            name: name.clone(),
            message_count: conversation.messages.len(),
            media_count: conversation.media_files.len(),
            missing,
        };

        self.registry.save(conversation);
        self.registry.persist_media(&name);

        info!(
            name = %summary.name,
            messages = summary.message_count,
            media = summary.media_count,
            "import complete"
        );

        self.active = Some(name);
        self.state = SessionState::Ready;
        Ok(summary)
    }

    /// Opens a conversation for viewing, with missing-media diagnostics.
    ///
    /// When the conversation claims media (`has_media`) but no content
    /// could be hydrated at all, the report is forced: every message with
    /// a reference counts as missing, so a lost content store is surfaced
    /// rather than silently shown as a text-only chat.
    ///
    /// Returns `None` for unknown names; the session state is unchanged
    /// in that case.
    pub fn open(&mut self, name: &str) -> Option<(&Conversation, MissingMediaReport)> {
        self.registry.load(name)?;
        self.active = Some(name.to_string());
        self.state = SessionState::Viewing;

        let conversation = self.registry.get(name)?;
        let report = if conversation.has_media && conversation.media_files.is_empty() {
            let referencing: Vec<String> = conversation
                .messages
                .iter()
                .filter_map(|m| m.media_reference().map(str::to_string))
                .collect();
            let mut list = Vec::new();
            for reference in &referencing {
                if !list.contains(reference) {
                    list.push(reference.clone());
                }
            }
            warn!(name, "conversation claims media but none is available");
            MissingMediaReport {
                has_missing_media: true,
                missing_media_count: referencing.len(),
                missing_media_list: list,
            }
        } else {
            conversation.missing_media_report()
        };

        Some((conversation, report))
    }

    /// Deletes a conversation. Clears the active selection when it was
    /// the deleted one.
    pub fn delete(&mut self, name: &str) -> bool {
        let deleted = self.registry.delete(name);
        if deleted && self.active.as_deref() == Some(name) {
            self.active = None;
            self.state = SessionState::Idle;
        }
        deleted
    }

    /// Lists conversations by name, lexicographically.
    pub fn list(&self) -> Vec<&Conversation> {
        self.registry.list()
    }
}
