//! Media entry types and the filename-keyed media mapping.
//!
//! Archive entries with a supported extension become [`MediaEntry`] values
//! held in a [`MediaMap`]. One entry may be reachable under two keys (its
//! normalized basename and its full archive path); both keys hold a shared
//! [`Arc`] handle to the same entry. This is intentional aliasing, not
//! duplication.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod reference;
pub mod resolver;

pub use reference::ReferenceExtractor;
pub use resolver::MediaResolver;

/// Image extensions recognized in archive entries.
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Video extensions recognized in archive entries.
pub const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".mov", ".avi", ".webm"];

/// Audio extensions recognized in archive entries.
pub const AUDIO_EXTENSIONS: &[&str] = &[".mp3", ".ogg", ".opus", ".m4a", ".wav"];

/// Kind of a media attachment, derived from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Still image
    Image,
    /// Video clip
    Video,
    /// Voice note or audio file
    Audio,
}

impl MediaType {
    /// Classifies a lowercased, dot-prefixed extension.
    ///
    /// Returns `None` for unsupported extensions; such entries are
    /// discarded at extraction, never stored.
    pub fn from_extension(extension: &str) -> Option<Self> {
        if IMAGE_EXTENSIONS.contains(&extension) {
            Some(MediaType::Image)
        } else if VIDEO_EXTENSIONS.contains(&extension) {
            Some(MediaType::Video)
        } else if AUDIO_EXTENSIONS.contains(&extension) {
            Some(MediaType::Audio)
        } else {
            None
        }
    }

    /// Returns the lowercase name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Audio => "audio",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A media attachment extracted from the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEntry {
    /// Binary payload
    pub content: Vec<u8>,
    /// Attachment kind
    pub media_type: MediaType,
    /// Lowercased, dot-prefixed extension
    pub extension: String,
    /// Full path inside the archive, may include directory segments
    pub original_path: String,
}

/// Filename-like key to shared media entries, in insertion order.
///
/// Insertion order matters: the resolver's containment step returns the
/// first key that matches, in this order.
pub type MediaMap = IndexMap<String, Arc<MediaEntry>>;

/// Returns the normalized basename of an archive path (last `/` segment).
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Inserts an entry under its normalized basename and, when different,
/// its full archive path. Both keys resolve to the same entry.
///
/// Returns the basename key.
pub fn insert_aliased(map: &mut MediaMap, entry: MediaEntry) -> String {
    let full_path = entry.original_path.clone();
    let base = basename(&full_path).to_string();
    let shared = Arc::new(entry);
    map.insert(base.clone(), Arc::clone(&shared));
    if base != full_path {
        map.insert(full_path, shared);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str) -> MediaEntry {
        MediaEntry {
            content: vec![1, 2, 3],
            media_type: MediaType::Image,
            extension: ".jpg".to_string(),
            original_path: path.to_string(),
        }
    }

    #[test]
    fn test_media_type_from_extension() {
        assert_eq!(MediaType::from_extension(".jpg"), Some(MediaType::Image));
        assert_eq!(MediaType::from_extension(".webp"), Some(MediaType::Image));
        assert_eq!(MediaType::from_extension(".mp4"), Some(MediaType::Video));
        assert_eq!(MediaType::from_extension(".opus"), Some(MediaType::Audio));
        assert_eq!(MediaType::from_extension(".pdf"), None);
        assert_eq!(MediaType::from_extension(".txt"), None);
    }

    #[test]
    fn test_media_type_display() {
        assert_eq!(MediaType::Image.to_string(), "image");
        assert_eq!(MediaType::Video.to_string(), "video");
        assert_eq!(MediaType::Audio.to_string(), "audio");
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("media/IMG-0001.jpg"), "IMG-0001.jpg");
        assert_eq!(basename("IMG-0001.jpg"), "IMG-0001.jpg");
        assert_eq!(basename("a/b/c.png"), "c.png");
    }

    #[test]
    fn test_insert_aliased_with_directory() {
        let mut map = MediaMap::new();
        let key = insert_aliased(&mut map, entry("media/IMG-0001.jpg"));
        assert_eq!(key, "IMG-0001.jpg");
        assert_eq!(map.len(), 2);

        // Both keys point to the same allocation, not copies.
        let by_base = map.get("IMG-0001.jpg").unwrap();
        let by_path = map.get("media/IMG-0001.jpg").unwrap();
        assert!(Arc::ptr_eq(by_base, by_path));
    }

    #[test]
    fn test_insert_aliased_flat_path() {
        let mut map = MediaMap::new();
        let key = insert_aliased(&mut map, entry("IMG-0001.jpg"));
        assert_eq!(key, "IMG-0001.jpg");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut map = MediaMap::new();
        insert_aliased(&mut map, entry("b.jpg"));
        insert_aliased(&mut map, entry("a.jpg"));
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["b.jpg", "a.jpg"]);
    }
}
