//! Extraction of filename-like media references from message text.
//!
//! The extractor applies an ordered list of matcher strategies; the first
//! one whose pattern matches decides the outcome. Vendor auto-generated
//! filenames (`IMG-20230201-WA0001.jpg` and friends) yield the matched
//! token; localized "attached file" phrases match but deliberately yield
//! nothing, so a caption like `foto.jpg (arquivo anexado)`'s phrase is
//! never mistaken for a filename. A trailing-extension heuristic runs last.
//!
//! Extraction is a pure function of the text: no side effects, same input
//! always gives the same output.

use regex::Regex;

/// What a matching pattern yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternAction {
    /// The matched token is the reference.
    Capture,
    /// The match is a localized attachment phrase, not a filename.
    Suppress,
}

/// One matcher strategy: a pattern plus what a match means.
struct ReferencePattern {
    regex: Regex,
    action: PatternAction,
}

impl ReferencePattern {
    fn new(pattern: &str, action: PatternAction) -> Self {
        Self {
            regex: Regex::new(pattern).unwrap(),
            action,
        }
    }
}

/// Extensions accepted by the trailing-filename heuristic.
const TRAILING_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".mp4", ".webp"];

/// Extracts media references from message text.
///
/// # Example
///
/// ```
/// use chatlens::media::ReferenceExtractor;
///
/// let extractor = ReferenceExtractor::new();
/// assert_eq!(
///     extractor.extract("IMG-20230201-WA0001.jpg"),
///     Some("IMG-20230201-WA0001.jpg".to_string()),
/// );
/// assert_eq!(extractor.extract("foto.jpg (arquivo anexado)"), None);
/// ```
pub struct ReferenceExtractor {
    patterns: Vec<ReferencePattern>,
}

impl ReferenceExtractor {
    /// Creates an extractor with the standard strategy order.
    pub fn new() -> Self {
        Self {
            patterns: vec![
                // Vendor auto-generated filenames: PREFIX-8DIGITS-WA4DIGITS.ext
                ReferencePattern::new(r"(?i)IMG-\d{8}-WA\d{4}\.\w{3,4}", PatternAction::Capture),
                ReferencePattern::new(r"(?i)VID-\d{8}-WA\d{4}\.\w{3,4}", PatternAction::Capture),
                ReferencePattern::new(r"(?i)PTT-\d{8}-WA\d{4}\.\w{3,4}", PatternAction::Capture),
                ReferencePattern::new(r"(?i)\w+-\d{8}-WA\d{4}\.\w{3,4}", PatternAction::Capture),
                // Localized attachment phrases match but are not filenames.
                ReferencePattern::new(r"(?i)arquivo anexado", PatternAction::Suppress),
                ReferencePattern::new(r"(?i)attached file", PatternAction::Suppress),
            ],
        }
    }

    /// Returns the first media reference found in `text`, or `None`.
    ///
    /// First matching strategy wins; patterns are never combined.
    pub fn extract(&self, text: &str) -> Option<String> {
        for pattern in &self.patterns {
            if let Some(found) = pattern.regex.find(text) {
                return match pattern.action {
                    PatternAction::Capture => Some(found.as_str().to_string()),
                    PatternAction::Suppress => None,
                };
            }
        }
        trailing_filename(text)
    }
}

impl Default for ReferenceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Fallback heuristic for text ending in a known media extension: split on
/// whitespace and slashes and take the last token, provided it looks like
/// a filename (contains a `.` and exceeds 4 characters).
fn trailing_filename(text: &str) -> Option<String> {
    if !TRAILING_EXTENSIONS.iter().any(|ext| text.ends_with(ext)) {
        return None;
    }

    let last = text
        .split(|c: char| c.is_whitespace() || c == '/' || c == '\\')
        .filter(|part| !part.is_empty())
        .next_back()?;

    if last.contains('.') && last.len() > 4 {
        Some(last.to_string())
    } else {
        None
    }
}
