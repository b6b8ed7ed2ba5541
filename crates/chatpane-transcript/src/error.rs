//! Error types for transcript operations.

/// Errors returned by the transcript store and archive.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Save requested on a transcript without messages.
    #[error("conversation is empty; nothing to save")]
    EmptyTranscript,
    /// Referenced archive entry does not exist.
    #[error("conversation not found: {0}")]
    NotFound(String),
}
