//! Resolution of extracted references against available media entries.
//!
//! Resolution tolerates renamed or relocated media: an exact key hit is
//! tried first, then a case-insensitive containment match in either
//! direction, and finally a type-pattern fallback that accepts any stored
//! image matching the vendor image naming convention. No match is not an
//! error; the message simply retains no bound media.

use regex::Regex;

use super::MediaMap;

/// Resolves reference strings to keys of a [`MediaMap`].
pub struct MediaResolver {
    image_pattern: Regex,
}

impl MediaResolver {
    /// Creates a resolver.
    pub fn new() -> Self {
        Self {
            image_pattern: Regex::new(r"(?i)IMG-.*\.jpe?g").unwrap(),
        }
    }

    /// Maps `reference` to a key present in `media_files`, or `None`.
    ///
    /// Resolution order, first hit wins:
    /// 1. Exact key match.
    /// 2. Case-insensitive containment in either direction, iterating keys
    ///    in insertion order.
    /// 3. If the reference matches the vendor image pattern, the first
    ///    stored key that also matches it, regardless of identity.
    pub fn resolve(&self, reference: &str, media_files: &MediaMap) -> Option<String> {
        if media_files.contains_key(reference) {
            return Some(reference.to_string());
        }

        let needle = reference.to_lowercase();
        for key in media_files.keys() {
            let stored = key.to_lowercase();
            if stored.contains(&needle) || needle.contains(&stored) {
                return Some(key.clone());
            }
        }

        if self.image_pattern.is_match(reference) {
            return media_files
                .keys()
                .find(|key| self.image_pattern.is_match(key))
                .cloned();
        }

        None
    }
}

impl Default for MediaResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MediaEntry, MediaType, insert_aliased};

    fn map_with(paths: &[&str]) -> MediaMap {
        let mut map = MediaMap::new();
        for path in paths {
            insert_aliased(
                &mut map,
                MediaEntry {
                    content: vec![0],
                    media_type: MediaType::Image,
                    extension: ".jpg".to_string(),
                    original_path: (*path).to_string(),
                },
            );
        }
        map
    }

    #[test]
    fn test_exact_match_short_circuits() {
        let resolver = MediaResolver::new();
        // Another IMG key comes first in insertion order; the exact hit
        // must still win.
        let map = map_with(&["IMG-20230101-WA0009.jpg", "IMG-20230201-WA0001.jpg"]);
        assert_eq!(
            resolver.resolve("IMG-20230201-WA0001.jpg", &map),
            Some("IMG-20230201-WA0001.jpg".to_string())
        );
    }

    #[test]
    fn test_containment_match_case_insensitive() {
        let resolver = MediaResolver::new();
        let map = map_with(&["IMG-20230201-WA0001.jpg"]);
        assert_eq!(
            resolver.resolve("img-20230201-wa0001.jpg", &map),
            Some("IMG-20230201-WA0001.jpg".to_string())
        );
    }

    #[test]
    fn test_containment_reference_contains_key() {
        let resolver = MediaResolver::new();
        let map = map_with(&["photo.jpg"]);
        assert_eq!(
            resolver.resolve("gallery/photo.jpg", &map),
            Some("photo.jpg".to_string())
        );
    }

    #[test]
    fn test_containment_returns_first_in_insertion_order() {
        let resolver = MediaResolver::new();
        let map = map_with(&["zz-photo.jpg", "aa-photo.jpg"]);
        assert_eq!(
            resolver.resolve("photo.jpg", &map),
            Some("zz-photo.jpg".to_string())
        );
    }

    #[test]
    fn test_image_pattern_fallback() {
        let resolver = MediaResolver::new();
        let map = map_with(&["IMG-20990101-WA9999.jpeg"]);
        // Completely different digits; still resolved via the type pattern.
        assert_eq!(
            resolver.resolve("IMG-20230201-WA0001.jpg", &map),
            Some("IMG-20990101-WA9999.jpeg".to_string())
        );
    }

    #[test]
    fn test_no_fallback_for_non_image_reference() {
        let resolver = MediaResolver::new();
        let map = map_with(&["IMG-20990101-WA9999.jpeg"]);
        assert_eq!(resolver.resolve("VID-20230201-WA0001.mp4", &map), None);
    }

    #[test]
    fn test_no_match_returns_none() {
        let resolver = MediaResolver::new();
        let map = map_with(&["other.jpg"]);
        assert_eq!(resolver.resolve("VID-20230201-WA0001.mp4", &map), None);
        assert_eq!(resolver.resolve("missing", &MediaMap::new()), None);
    }
}
