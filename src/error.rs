//! Unified error types for chatlens.
//!
//! This module provides a single [`Error`] enum that covers all error
//! cases in the library.
//!
//! # Error Handling Philosophy
//!
//! - A bundle that cannot be decoded as a zip archive is **fatal** to the
//!   import ([`Error::Archive`]).
//! - A single media entry that fails to decode is logged and skipped; the
//!   import continues ([`Error::MediaExtraction`] is only ever reported,
//!   never propagated past the extractor).
//! - Persistence failures are logged and the in-memory state remains
//!   authoritative for the session ([`Error::Persistence`]).
//! - Parse ambiguity is not an error: extraction and resolution silently
//!   yield `None` when nothing matches.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatlens operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for all chatlens operations.
///
/// Each variant contains context about what went wrong and, where
/// applicable, the underlying source error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The bundle could not be decoded as a valid zip archive.
    ///
    /// This aborts the import; the caller must retry with a new file.
    #[error("Failed to decode archive{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Archive {
        /// The underlying zip error
        #[source]
        source: zip::result::ZipError,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// A single media entry inside the archive failed to decode.
    ///
    /// Contained at the per-entry level: the entry is skipped and the
    /// import continues.
    #[error("Failed to extract media entry '{entry}': {message}")]
    MediaExtraction {
        /// Path of the entry inside the archive
        entry: String,
        /// Description of the failure
        message: String,
    },

    /// A persistence store was unavailable or a read/write failed.
    ///
    /// Logged, never fatal: in-memory state remains authoritative for the
    /// session.
    #[error("Persistence error in {context}: {source}")]
    Persistence {
        /// Description of the operation that failed
        context: String,
        /// The underlying store error
        #[source]
        source: PersistenceErrorKind,
    },

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Kinds of persistence errors.
#[derive(Debug, Error)]
pub enum PersistenceErrorKind {
    /// IO error talking to the store
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Serialization error for a stored document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Archive {
            source: err,
            path: None,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl Error {
    /// Creates an archive decode error with an associated file path.
    pub fn archive(source: zip::result::ZipError, path: Option<PathBuf>) -> Self {
        Error::Archive { source, path }
    }

    /// Creates a per-entry media extraction error.
    pub fn media_extraction(entry: impl Into<String>, message: impl Into<String>) -> Self {
        Error::MediaExtraction {
            entry: entry.into(),
            message: message.into(),
        }
    }

    /// Creates a persistence error from an IO failure.
    pub fn persistence_io(context: impl Into<String>, source: io::Error) -> Self {
        Error::Persistence {
            context: context.into(),
            source: PersistenceErrorKind::Io(source),
        }
    }

    /// Creates a persistence error from a JSON failure.
    pub fn persistence_json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Persistence {
            context: context.into(),
            source: PersistenceErrorKind::Json(source),
        }
    }

    /// Returns `true` if this is a fatal archive decode error.
    pub fn is_archive(&self) -> bool {
        matches!(self, Error::Archive { .. })
    }

    /// Returns `true` if this is a per-entry media extraction error.
    pub fn is_media_extraction(&self) -> bool {
        matches!(self, Error::MediaExtraction { .. })
    }

    /// Returns `true` if this is a persistence error.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Persistence { .. })
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_archive_error_with_path() {
        let err = Error::archive(
            zip::result::ZipError::InvalidArchive("bad magic".into()),
            Some(PathBuf::from("/path/to/export.zip")),
        );
        let display = err.to_string();
        assert!(display.contains("Failed to decode archive"));
        assert!(display.contains("/path/to/export.zip"));
    }

    #[test]
    fn test_archive_error_without_path() {
        let err: Error = zip::result::ZipError::InvalidArchive("bad magic".into()).into();
        let display = err.to_string();
        assert!(display.contains("Failed to decode archive"));
        assert!(!display.contains("file:"));
    }

    #[test]
    fn test_media_extraction_display() {
        let err = Error::media_extraction("media/IMG-0001.jpg", "truncated entry");
        let display = err.to_string();
        assert!(display.contains("IMG-0001.jpg"));
        assert!(display.contains("truncated entry"));
    }

    #[test]
    fn test_persistence_io_display() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::persistence_io("writing metadata", io_err);
        let display = err.to_string();
        assert!(display.contains("Persistence error"));
        assert!(display.contains("writing metadata"));
    }

    #[test]
    fn test_persistence_json_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err = Error::persistence_json("reading metadata", json_err);
        assert!(err.to_string().contains("reading metadata"));
    }

    #[test]
    fn test_utf8_error_display() {
        let invalid_bytes = vec![0xff, 0xfe];
        let utf8_err = String::from_utf8(invalid_bytes).unwrap_err();
        let err = Error::Utf8 {
            context: "reading transcript".into(),
            source: utf8_err,
        };
        let display = err.to_string();
        assert!(display.contains("UTF-8"));
        assert!(display.contains("reading transcript"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error as _;
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::persistence_io("saving", io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_is_methods() {
        let archive_err: Error = zip::result::ZipError::InvalidArchive("nope".into()).into();
        assert!(archive_err.is_archive());
        assert!(!archive_err.is_media_extraction());
        assert!(!archive_err.is_persistence());
        assert!(!archive_err.is_io());

        let media_err = Error::media_extraction("a.jpg", "short read");
        assert!(media_err.is_media_extraction());
        assert!(!media_err.is_archive());

        let io_err = Error::Io(io::Error::new(io::ErrorKind::NotFound, ""));
        assert!(io_err.is_io());
        assert!(!io_err.is_persistence());
    }

    #[test]
    fn test_error_debug() {
        let err = Error::media_extraction("a.jpg", "short read");
        let debug = format!("{:?}", err);
        assert!(debug.contains("MediaExtraction"));
    }
}
