//! Conversation transcripts for chatpane.
//!
//! Owns the active transcript, its plain-text archive format, archive-level
//! queries, and the background autosave loop.

pub mod archive;
pub mod autosave;
pub mod error;
pub mod format;
pub mod model;
pub mod store;

/// Archive directory queries and ordering.
pub use archive::{Archive, ArchiveOrder};
/// Background autosave task.
pub use autosave::{AutosaveHandle, DEFAULT_AUTOSAVE_INTERVAL, spawn_autosave};
/// Transcript error type.
pub use error::TranscriptError;
/// Message model.
pub use model::{Message, Role};
/// Active transcript store.
pub use store::{PROVISIONAL_PREFIX, SaveOutcome, TranscriptStore, is_provisional_title};
