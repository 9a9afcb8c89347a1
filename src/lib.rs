//! # Chatlens
//!
//! A Rust library for importing, inspecting, and persisting chat export
//! bundles (zip archives containing a transcript and its media files).
//!
//! ## Overview
//!
//! Chatlens takes an export bundle and turns it into a browsable
//! conversation:
//! - **Extract** — the zip archive is split into transcript text and
//!   media entries, filtered by supported extensions
//! - **Parse** — dated transcript lines become ordered message records,
//!   multi-line messages included
//! - **Bind** — filename-like references in message text are matched to
//!   the extracted media, with tolerant fuzzy resolution
//! - **Persist** — conversations survive restarts through a metadata
//!   store and a separate bulk content store
//!
//! Missing attachments are never silently dropped: every conversation can
//! report which referenced files were not present in the archive.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatlens::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let registry = ConversationRegistry::open(
//!         Box::new(JsonMetadataStore::new("data/conversations.json")),
//!         Box::new(FsContentStore::new("data/media")),
//!     );
//!     let mut session = Session::new(registry);
//!
//!     let bytes = std::fs::read("export.zip")?;
//!     let summary = session.import_archive(&bytes, None)?;
//!     println!("{}: {} messages", summary.name, summary.message_count);
//!
//!     if let Some((conversation, report)) = session.open(&summary.name) {
//!         for message in &conversation.messages {
//!             println!("{} {}: {}", message.date, message.sender, message.text);
//!         }
//!         if report.has_missing_media {
//!             println!("{} attachments missing", report.missing_media_count);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`archive`] — zip bundle decoding ([`extract_archive`](archive::extract_archive))
//! - [`parser`] — transcript parsing ([`TranscriptParser`](parser::TranscriptParser))
//! - [`message`] — the [`Message`] record and its chronological key
//! - [`media`] — media typing, reference extraction, fuzzy resolution
//! - [`conversation`] — assembled [`Conversation`](conversation::Conversation)s
//!   and missing-media reports
//! - [`registry`] — the persistent [`ConversationRegistry`](registry::ConversationRegistry)
//! - [`session`] — import pipeline and viewing surface ([`Session`](session::Session))
//! - [`store`] — persistence traits and the file-backed implementations
//! - [`error`] — unified error types ([`Error`], [`Result`])
//! - [`prelude`] — convenient re-exports

pub mod archive;
pub mod conversation;
pub mod error;
pub mod media;
pub mod message;
pub mod parser;
pub mod registry;
pub mod session;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export the main types at the crate root for convenience
pub use error::{Error, Result};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatlens::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::Message;
    pub use crate::conversation::{Conversation, MissingMediaReport};

    // Error types
    pub use crate::error::{Error, Result};

    // Import pipeline
    pub use crate::archive::extract_archive;
    pub use crate::parser::TranscriptParser;
    pub use crate::session::{ImportSummary, Session, SessionState};

    // Media handling
    pub use crate::media::{MediaEntry, MediaMap, MediaResolver, MediaType, ReferenceExtractor};

    // Registry and stores
    pub use crate::registry::ConversationRegistry;
    pub use crate::store::{
        ContentStore, ConversationMetadata, FsContentStore, JsonMetadataStore, MediaRecord,
        MetadataStore,
    };
}
