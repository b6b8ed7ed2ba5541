//! Transcript message model.

use chrono::{DateTime, Local};
use std::fmt;

/// Timestamp layout used for messages and the archive `Date:` header.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a local time with [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(time: DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Current wall-clock time formatted for a message.
pub fn now_timestamp() -> String {
    format_timestamp(Local::now())
}

/// Speaker of a transcript message.
///
/// Archives store the role as free text; anything other than `user` or `bot`
/// round-trips through [`Role::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// Line typed by the person at the terminal.
    User,
    /// Reply produced by the chatbot.
    Bot,
    /// Any other role read back from an archive.
    Other(String),
}

impl Role {
    /// Archive spelling of the role.
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
            Role::Other(role) => role.as_str(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "user" => Role::User,
            "bot" => Role::Bot,
            other => Role::Other(other.to_string()),
        }
    }
}

/// One transcript entry. Immutable once appended to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Speaker.
    pub role: Role,
    /// Free-text content.
    pub content: String,
    /// `YYYY-MM-DD HH:MM:SS` in local time.
    pub timestamp: String,
}

impl Message {
    /// Build a message stamped with the current time.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self::with_timestamp(role, content, now_timestamp())
    }

    /// Build a message with an explicit timestamp, e.g. when reloading.
    pub fn with_timestamp(
        role: Role,
        content: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }
}
