//! Archive extraction: splitting a zip bundle into transcript text and
//! candidate media entries.
//!
//! The transcript is the first non-directory entry whose name ends in
//! `.txt` (case-insensitive). Media entries are filtered by the supported
//! extension sets; anything else is silently skipped. A bundle that cannot
//! be decoded as a zip archive at all is a fatal [`Error::Archive`]; a
//! single entry that fails to read is logged and skipped so the rest of
//! the import can settle.

use std::io::{Cursor, Read};

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::media::{MediaType, basename};

/// One media candidate pulled out of the archive, not yet keyed.
#[derive(Debug, Clone)]
pub struct RawMediaEntry {
    /// Full path inside the archive
    pub path: String,
    /// Attachment kind derived from the extension
    pub media_type: MediaType,
    /// Lowercased, dot-prefixed extension
    pub extension: String,
    /// Binary payload
    pub content: Vec<u8>,
}

/// The result of decoding an export bundle.
#[derive(Debug, Default)]
pub struct ArchiveContents {
    /// Transcript text, if the bundle contained one
    pub transcript: Option<String>,
    /// Every media entry with a supported extension that decoded cleanly
    pub media: Vec<RawMediaEntry>,
}

/// Decodes `bytes` as a zip bundle and separates transcript from media.
///
/// # Errors
///
/// Returns [`Error::Archive`] when the bytes are not a valid zip archive.
/// Per-entry read failures are contained: logged via `tracing` and skipped.
pub fn extract_archive(bytes: &[u8]) -> Result<ArchiveContents> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(Error::from)?;

    let mut contents = ArchiveContents::default();

    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(index, error = %err, "skipping unreadable archive entry");
                continue;
            }
        };

        if entry.is_dir() {
            continue;
        }

        let path = entry.name().to_string();

        if contents.transcript.is_none() && path.to_lowercase().ends_with(".txt") {
            let mut raw = Vec::new();
            match entry.read_to_end(&mut raw) {
                Ok(_) => {
                    contents.transcript = Some(String::from_utf8_lossy(&raw).into_owned());
                    debug!(entry = %path, "found transcript");
                }
                Err(err) => {
                    warn!(entry = %path, error = %err, "failed to read transcript entry");
                }
            }
            continue;
        }

        let Some(extension) = entry_extension(&path) else {
            continue;
        };
        let Some(media_type) = MediaType::from_extension(&extension) else {
            // Unrecognized extension: skipped, not an error.
            continue;
        };

        let mut content = Vec::new();
        if let Err(err) = entry.read_to_end(&mut content) {
            let report = Error::media_extraction(&path, err.to_string());
            warn!(error = %report, "media entry skipped");
            continue;
        }

        contents.media.push(RawMediaEntry {
            path,
            media_type,
            extension,
            content,
        });
    }

    Ok(contents)
}

/// Extension of the entry's basename, lowercased and dot-prefixed.
fn entry_extension(path: &str) -> Option<String> {
    let name = basename(path);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_lowercase()))
}
