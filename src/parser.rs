//! Transcript parser.
//!
//! Transcripts follow one known export convention:
//!
//! ```text
//! [D/M/Y, H:MM[:SS]] - Sender: Text
//! ```
//!
//! with the brackets and the comma optional. A line matching the header
//! starts a new message; a non-matching, non-blank line is a continuation
//! of the current message; blank lines are dropped. The final sequence is
//! stable-sorted chronologically, which corrects transcripts whose entries
//! are not in strict order (merged or quirky exports).

use regex::Regex;

use crate::media::ReferenceExtractor;
use crate::message::Message;

/// Header pattern capturing `(date, time, sender, text)`. The sender is
/// any run of characters up to the first colon.
const HEADER_PATTERN: &str =
    r"^\[?(\d{1,2}/\d{1,2}/\d{2,4}),?\s+(\d{1,2}:\d{2}(?::\d{2})?)\]?\s+-\s+([^:]+):\s+(.+)$";

/// The outcome of parsing one transcript.
#[derive(Debug, Default)]
pub struct ParsedTranscript {
    /// Messages in chronological order.
    pub messages: Vec<Message>,
    /// First sender encountered in transcript order (before sorting);
    /// used for conversation name derivation when no explicit name exists.
    pub first_sender: Option<String>,
}

/// Parser for the dated-line transcript format.
///
/// # Example
///
/// ```
/// use chatlens::parser::TranscriptParser;
///
/// let parser = TranscriptParser::new();
/// let parsed = parser.parse("[01/02/23, 14:05:10] - Alice: hello");
/// assert_eq!(parsed.messages.len(), 1);
/// assert_eq!(parsed.messages[0].sender(), "Alice");
/// ```
pub struct TranscriptParser {
    header: Regex,
    extractor: ReferenceExtractor,
}

impl TranscriptParser {
    /// Creates a parser with the standard header pattern.
    pub fn new() -> Self {
        Self {
            header: Regex::new(HEADER_PATTERN).unwrap(),
            extractor: ReferenceExtractor::new(),
        }
    }

    /// Parses transcript text into dated message records.
    ///
    /// Each message's media reference is set eagerly at parse time.
    /// Ambiguous lines never fail: anything that is not a header and not
    /// blank is folded into the current message, and orphan lines before
    /// the first header are dropped.
    pub fn parse(&self, content: &str) -> ParsedTranscript {
        let mut messages: Vec<Message> = Vec::new();
        let mut first_sender: Option<String> = None;
        let mut current: Option<Message> = None;

        for line in content.lines() {
            if let Some(caps) = self.header.captures(line) {
                if let Some(finished) = current.take() {
                    messages.push(finished);
                }

                let date = caps.get(1).map_or("", |m| m.as_str());
                let time = caps.get(2).map_or("", |m| m.as_str());
                let sender = caps.get(3).map_or("", |m| m.as_str());
                let text = caps.get(4).map_or("", |m| m.as_str());

                let mut message = Message::new(date, time, sender, text);
                message.media_reference = self.extractor.extract(text);

                if first_sender.is_none() {
                    first_sender = Some(message.sender.clone());
                }
                current = Some(message);
            } else if !line.trim().is_empty() {
                // Continuation of the previous message (multiline).
                if let Some(message) = current.as_mut() {
                    message.append_line(line.trim());
                }
            }
        }

        if let Some(finished) = current.take() {
            messages.push(finished);
        }

        // Stable sort: unparseable keys keep transcript order and collate
        // before keyed messages.
        messages.sort_by_cached_key(Message::sort_key);

        ParsedTranscript {
            messages,
            first_sender,
        }
    }
}

impl Default for TranscriptParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> ParsedTranscript {
        TranscriptParser::new().parse(content)
    }

    #[test]
    fn test_parse_bracketed_header() {
        let parsed = parse("[01/02/23, 14:05:10] - Alice: hello there");
        assert_eq!(parsed.messages.len(), 1);
        let msg = &parsed.messages[0];
        assert_eq!(msg.date, "01/02/23");
        assert_eq!(msg.time, "14:05:10");
        assert_eq!(msg.sender(), "Alice");
        assert_eq!(msg.text(), "hello there");
    }

    #[test]
    fn test_parse_unbracketed_header_without_comma() {
        let parsed = parse("1/2/2023 9:05 - Bob: terse");
        assert_eq!(parsed.messages.len(), 1);
        assert_eq!(parsed.messages[0].sender(), "Bob");
        assert_eq!(parsed.messages[0].time, "9:05");
    }

    #[test]
    fn test_continuation_lines_joined_with_newlines() {
        let parsed = parse(
            "[01/02/23, 14:05] - Alice: first line\nsecond line\n\nthird line\n[01/02/23, 14:06] - Bob: ok",
        );
        assert_eq!(parsed.messages.len(), 2);
        // Blank line dropped; continuations joined in original order.
        assert_eq!(parsed.messages[0].text(), "first line\nsecond line\nthird line");
        assert_eq!(parsed.messages[1].text(), "ok");
    }

    #[test]
    fn test_orphan_lines_before_first_header_dropped() {
        let parsed = parse("stray preamble\n[01/02/23, 14:05] - Alice: hi");
        assert_eq!(parsed.messages.len(), 1);
        assert_eq!(parsed.messages[0].text(), "hi");
    }

    #[test]
    fn test_messages_sorted_chronologically() {
        let parsed = parse(
            "[02/02/23, 08:00] - Bob: later\n[01/02/23, 14:05] - Alice: earlier\n[01/02/23, 09:00] - Carol: earliest",
        );
        let senders: Vec<_> = parsed.messages.iter().map(|m| m.sender()).collect();
        assert_eq!(senders, vec!["Carol", "Alice", "Bob"]);
    }

    #[test]
    fn test_sort_is_day_month_year_not_lexicographic() {
        // Lexicographically "02/01/23" < "10/12/22", chronologically the
        // december message comes first.
        let parsed = parse("[02/01/23, 10:00] - A: jan\n[10/12/22, 10:00] - B: dec");
        assert_eq!(parsed.messages[0].text(), "dec");
        assert_eq!(parsed.messages[1].text(), "jan");
    }

    #[test]
    fn test_media_reference_set_eagerly() {
        let parsed = parse("[01/02/23, 14:05] - Alice: IMG-20230201-WA0001.jpg");
        assert_eq!(
            parsed.messages[0].media_reference(),
            Some("IMG-20230201-WA0001.jpg")
        );
    }

    #[test]
    fn test_attached_file_phrase_yields_no_reference() {
        let parsed = parse("[01/02/23, 14:05] - Alice: veja o documento (arquivo anexado)");
        assert_eq!(parsed.messages[0].media_reference(), None);
    }

    #[test]
    fn test_first_sender_is_transcript_order_not_sorted_order() {
        let parsed = parse("[02/02/23, 08:00] - Bob: later\n[01/02/23, 14:05] - Alice: earlier");
        // Alice sorts first, but Bob appeared first in the transcript.
        assert_eq!(parsed.first_sender.as_deref(), Some("Bob"));
        assert_eq!(parsed.messages[0].sender(), "Alice");
    }

    #[test]
    fn test_sender_trimmed() {
        let parsed = parse("[01/02/23, 14:05] -  Alice Wonder : spaced");
        assert_eq!(parsed.messages[0].sender(), "Alice Wonder");
    }

    #[test]
    fn test_empty_transcript() {
        let parsed = parse("");
        assert!(parsed.messages.is_empty());
        assert!(parsed.first_sender.is_none());
    }

    #[test]
    fn test_ordering_property_non_decreasing() {
        let parsed = parse(
            "[03/02/23, 10:00] - A: one\n[01/02/23, 10:00] - B: two\n[02/02/23, 10:00] - C: three\n[01/02/23, 09:59] - D: four",
        );
        let keys: Vec<_> = parsed.messages.iter().map(Message::sort_key).collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    }
}
