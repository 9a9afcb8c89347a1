//! Message record type for parsed transcripts.
//!
//! A [`Message`] keeps the `date` and `time` exactly as they appeared in
//! the transcript (locale-formatted, day/month/year). The chronological
//! sort key is derived separately by reinterpreting those strings, so the
//! display text never drifts from the source.
//!
//! # Examples
//!
//! ```
//! use chatlens::Message;
//!
//! let msg = Message::new("01/02/23", "14:05:10", "Alice", "hello");
//! assert_eq!(msg.sender(), "Alice");
//! assert!(msg.sort_key().is_some());
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Formats attempted when reinterpreting a `date` + `time` pair as a
/// chronological key. Covers 2- and 4-digit years and optional seconds.
const SORT_KEY_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%y %H:%M",
];

/// A single parsed transcript message.
///
/// Immutable once parsed except for [`media_reference`](Self::media_reference),
/// which may be back-filled during reassociation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Date exactly as written in the transcript header (D/M/Y, 2-4 digit year).
    pub date: String,

    /// Time exactly as written in the transcript header (H:MM, optional seconds).
    pub time: String,

    /// Display name of the sender, trimmed.
    pub sender: String,

    /// Message text. Continuation lines are newline-joined into this field,
    /// so multi-line messages stay a single record.
    pub text: String,

    /// A filename-like token extracted from `text`, presumed to denote an
    /// attachment. After reassociation this holds the *resolved* media key.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub media_reference: Option<String>,
}

impl Message {
    /// Creates a new message. The sender is trimmed.
    pub fn new(
        date: impl Into<String>,
        time: impl Into<String>,
        sender: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            sender: sender.into().trim().to_string(),
            text: text.into(),
            media_reference: None,
        }
    }

    /// Builder method to set the media reference.
    #[must_use]
    pub fn with_media_reference(mut self, reference: impl Into<String>) -> Self {
        self.media_reference = Some(reference.into());
        self
    }

    /// Returns the sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the media reference, if any.
    pub fn media_reference(&self) -> Option<&str> {
        self.media_reference.as_deref()
    }

    /// Appends a continuation line to the text, newline-separated.
    pub fn append_line(&mut self, line: &str) {
        self.text.push('\n');
        self.text.push_str(line);
    }

    /// Reinterprets `date` (day/month/year) plus `time` as a composite
    /// chronological key.
    ///
    /// Returns `None` when the pair does not form a valid instant (e.g.
    /// `31/02`); such messages keep their transcript order under a stable
    /// sort and collate before keyed ones.
    pub fn sort_key(&self) -> Option<NaiveDateTime> {
        let datetime_str = format!("{} {}", self.date, self.time);
        for format in SORT_KEY_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(&datetime_str, format) {
                return Some(naive);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_message_new_trims_sender() {
        let msg = Message::new("01/02/23", "14:05", "  Alice ", "hi");
        assert_eq!(msg.sender(), "Alice");
        assert_eq!(msg.text(), "hi");
        assert!(msg.media_reference().is_none());
    }

    #[test]
    fn test_sort_key_two_digit_year() {
        let msg = Message::new("01/02/23", "14:05:10", "Alice", "hi");
        let key = msg.sort_key().unwrap();
        assert_eq!(key.year(), 2023);
        assert_eq!(key.month(), 2);
        assert_eq!(key.day(), 1);
        assert_eq!(key.second(), 10);
    }

    #[test]
    fn test_sort_key_four_digit_year_no_seconds() {
        let msg = Message::new("15/01/2024", "10:30", "Bob", "hi");
        let key = msg.sort_key().unwrap();
        assert_eq!(key.year(), 2024);
        assert_eq!(key.hour(), 10);
        assert_eq!(key.second(), 0);
    }

    #[test]
    fn test_sort_key_invalid_date() {
        let msg = Message::new("31/02/23", "10:30", "Bob", "hi");
        assert!(msg.sort_key().is_none());
    }

    #[test]
    fn test_sort_key_orders_across_dates() {
        let a = Message::new("31/12/22", "23:59", "A", "old year");
        let b = Message::new("01/01/23", "00:00", "B", "new year");
        assert!(a.sort_key().unwrap() < b.sort_key().unwrap());
    }

    #[test]
    fn test_append_line() {
        let mut msg = Message::new("01/02/23", "14:05", "Alice", "first");
        msg.append_line("second");
        msg.append_line("third");
        assert_eq!(msg.text(), "first\nsecond\nthird");
    }

    #[test]
    fn test_serialization_skips_none_reference() {
        let msg = Message::new("01/02/23", "14:05", "Alice", "hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("media_reference"));

        let with_ref = msg.with_media_reference("IMG-20230201-WA0001.jpg");
        let json = serde_json::to_string(&with_ref).unwrap();
        assert!(json.contains("IMG-20230201-WA0001.jpg"));
    }

    #[test]
    fn test_deserialization_round_trip() {
        let msg = Message::new("01/02/23", "14:05:10", "Alice", "line1\nline2")
            .with_media_reference("VID-20230201-WA0002.mp4");
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, parsed);
    }
}
