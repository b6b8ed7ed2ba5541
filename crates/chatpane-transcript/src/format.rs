//! Plain-text archive format.
//!
//! ```text
//! Title: <title>
//! Date: <YYYY-MM-DD HH:MM:SS>
//! =====================================
//!
//! [<timestamp>] <role>: <content>
//!
//! ```
//!
//! Content is written verbatim. Newlines are not escaped, so continuation lines
//! of multi-line content do not survive a reload.

use crate::model::{Message, Role};

/// Header/body separator line.
pub const SEPARATOR: &str = "=====================================";
/// Marker that switches the parser from header to body.
const SEPARATOR_MARKER: &str = "=====";

const TITLE_PREFIX: &str = "Title: ";
const DATE_PREFIX: &str = "Date: ";

/// Render a transcript into archive text.
pub fn render(title: &str, saved_at: &str, messages: &[Message]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{TITLE_PREFIX}{title}\n"));
    out.push_str(&format!("{DATE_PREFIX}{saved_at}\n"));
    out.push_str(SEPARATOR);
    out.push_str("\n\n");
    for message in messages {
        out.push_str(&render_message(message));
        out.push_str("\n\n");
    }
    out
}

/// Render one message line without its trailing blank line.
pub fn render_message(message: &Message) -> String {
    format!(
        "[{}] {}: {}",
        message.timestamp, message.role, message.content
    )
}

/// Result of parsing an archive file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTranscript {
    /// Title from the header, if present.
    pub title: Option<String>,
    /// Save date from the header, if present.
    pub saved_at: Option<String>,
    /// Messages in file order.
    pub messages: Vec<Message>,
    /// Non-blank body lines that were not message lines.
    pub skipped_lines: usize,
}

/// Parse archive text. Malformed body lines are skipped, never fatal.
pub fn parse(contents: &str) -> ParsedTranscript {
    let mut parsed = ParsedTranscript::default();
    let mut in_body = false;

    for line in contents.lines() {
        if !in_body {
            if line.contains(SEPARATOR_MARKER) {
                in_body = true;
            } else if let Some(title) = line.strip_prefix(TITLE_PREFIX) {
                parsed.title = Some(title.to_string());
            } else if let Some(date) = line.strip_prefix(DATE_PREFIX) {
                parsed.saved_at = Some(date.to_string());
            }
            continue;
        }

        if line.trim().is_empty() {
            continue;
        }
        match parse_message_line(line) {
            Some(message) => parsed.messages.push(message),
            None => parsed.skipped_lines += 1,
        }
    }
    parsed
}

/// Parse `[<timestamp>] <role>: <content>`.
///
/// The timestamp ends at the first `]` and the role at the first `: ` after it.
pub fn parse_message_line(line: &str) -> Option<Message> {
    let rest = line.strip_prefix('[')?;
    let (timestamp, rest) = rest.split_once(']')?;
    let rest = rest.strip_prefix(' ')?;
    let (role, content) = rest.split_once(": ")?;
    Some(Message::with_timestamp(Role::from(role), content, timestamp))
}
