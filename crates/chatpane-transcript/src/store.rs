//! Active transcript state shared by the session driver and autosave task.

use crate::archive::Archive;
use crate::error::TranscriptError;
use crate::format;
use crate::model::{Message, Role, format_timestamp};
use chrono::{DateTime, Local, Utc};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Prefix of titles synthesized by autosave.
pub const PROVISIONAL_PREFIX: &str = "autosave_";

/// Whether `title` was synthesized by autosave rather than chosen by a user.
pub fn is_provisional_title(title: &str) -> bool {
    title.starts_with(PROVISIONAL_PREFIX)
}

/// Result of an explicit save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Title the transcript was saved under.
    pub title: String,
    /// File that now holds the transcript.
    pub path: PathBuf,
    /// Provisional file removed because the save renamed it.
    pub renamed_from: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct TranscriptState {
    title: String,
    messages: Vec<Message>,
    backing_path: Option<PathBuf>,
    last_saved_at: Option<DateTime<Local>>,
}

/// The one active transcript of a chat session.
///
/// Every read and mutation goes through `state`. `dirty` mirrors the unsaved
/// flag so the autosave task can poll it without taking the lock; it is only
/// written while `state` is held.
#[derive(Debug)]
pub struct TranscriptStore {
    archive: Archive,
    state: Mutex<TranscriptState>,
    dirty: AtomicBool,
}

impl TranscriptStore {
    /// Create an empty store, creating the archive directory if needed.
    pub fn new(archive: Archive) -> Result<Self, TranscriptError> {
        archive.ensure_dir()?;
        info!(
            "initialized transcript store (root={}, order={:?})",
            archive.root().display(),
            archive.order()
        );
        Ok(Self {
            archive,
            state: Mutex::new(TranscriptState::default()),
            dirty: AtomicBool::new(false),
        })
    }

    /// Archive this store saves into.
    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    /// Append a message stamped with the current time.
    pub fn append(&self, role: Role, content: impl Into<String>) {
        let message = Message::new(role, content);
        let mut state = self.state.lock();
        debug!(
            "appending message (role={}, content_len={}, count={})",
            message.role,
            message.content.len(),
            state.messages.len() + 1
        );
        state.messages.push(message);
        self.dirty.store(true, Ordering::Release);
    }

    /// Set the title without saving.
    pub fn set_title(&self, title: impl Into<String>) {
        let mut state = self.state.lock();
        state.title = title.into();
        self.dirty.store(true, Ordering::Release);
    }

    /// Save under `title`, replacing a provisional autosave file if one backs
    /// the transcript.
    ///
    /// An empty transcript is not written. On any failure the in-memory state
    /// is left unchanged.
    pub fn save(&self, title: &str) -> Result<SaveOutcome, TranscriptError> {
        let mut state = self.state.lock();
        if state.messages.is_empty() {
            warn!("refusing to save empty conversation (title={title})");
            return Err(TranscriptError::EmptyTranscript);
        }

        let path = self.archive.path_for(title);
        let saved_at = Local::now();
        write_transcript(&path, title, saved_at, &state.messages)?;

        let mut renamed_from = None;
        if let Some(old_path) = state.backing_path.as_ref()
            && is_provisional_title(&state.title)
            && *old_path != path
            && old_path.exists()
        {
            match fs::remove_file(old_path) {
                Ok(()) => renamed_from = Some(old_path.clone()),
                Err(err) => warn!(
                    "failed to remove provisional file (path={}, error={})",
                    old_path.display(),
                    err
                ),
            }
        }

        info!(
            "conversation saved (title={}, messages={}, renamed={})",
            title,
            state.messages.len(),
            renamed_from.is_some()
        );
        state.title = title.to_string();
        state.backing_path = Some(path.clone());
        state.last_saved_at = Some(saved_at);
        self.dirty.store(false, Ordering::Release);
        Ok(SaveOutcome {
            title: title.to_string(),
            path,
            renamed_from,
        })
    }

    /// Persist unsaved changes, synthesizing a provisional title if needed.
    ///
    /// Returns whether a file was written. Never deletes files.
    pub fn autosave(&self) -> Result<bool, TranscriptError> {
        if !self.dirty.load(Ordering::Acquire) {
            return Ok(false);
        }
        let mut state = self.state.lock();
        if !self.dirty.load(Ordering::Acquire) || state.messages.is_empty() {
            return Ok(false);
        }

        let title = if state.title.is_empty() {
            format!("{PROVISIONAL_PREFIX}{}", Utc::now().timestamp())
        } else {
            state.title.clone()
        };
        let path = self.archive.path_for(&title);
        let saved_at = Local::now();
        write_transcript(&path, &title, saved_at, &state.messages)?;

        debug!(
            "autosaved conversation (title={}, messages={})",
            title,
            state.messages.len()
        );
        state.title = title;
        state.backing_path = Some(path);
        state.last_saved_at = Some(saved_at);
        self.dirty.store(false, Ordering::Release);
        Ok(true)
    }

    /// Drop messages, title, and backing file. Nothing is saved first.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        debug!("clearing conversation (messages={})", state.messages.len());
        *state = TranscriptState::default();
        self.dirty.store(false, Ordering::Release);
    }

    /// Replace the active transcript with the archived `title`.
    ///
    /// The file is read and parsed before any state changes, so a failed load
    /// leaves the current transcript intact. Returns the loaded message count.
    pub fn load_into(&self, title: &str) -> Result<usize, TranscriptError> {
        let path = self.archive.path_for(title);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!("conversation not found (title={title})");
                return Err(TranscriptError::NotFound(title.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        let parsed = format::parse(&contents);
        if parsed.skipped_lines > 0 {
            debug!(
                "skipped malformed lines while loading (title={}, skipped={})",
                title, parsed.skipped_lines
            );
        }

        let count = parsed.messages.len();
        let mut state = self.state.lock();
        state.messages = parsed.messages;
        state.title = title.to_string();
        state.backing_path = Some(path);
        state.last_saved_at = None;
        self.dirty.store(false, Ordering::Release);
        info!("conversation loaded (title={title}, messages={count})");
        Ok(count)
    }

    /// Whether no messages have been appended.
    pub fn is_empty(&self) -> bool {
        self.state.lock().messages.is_empty()
    }

    /// Number of messages in the transcript.
    pub fn len(&self) -> usize {
        self.state.lock().messages.len()
    }

    /// Current title; empty when untitled.
    pub fn title(&self) -> String {
        self.state.lock().title.clone()
    }

    /// Whether a title (provisional or chosen) is set.
    pub fn has_title(&self) -> bool {
        !self.state.lock().title.is_empty()
    }

    /// Whether unsaved changes exist.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Dirty and non-empty. Checks the atomic flag before taking the lock.
    pub fn needs_autosave(&self) -> bool {
        self.dirty.load(Ordering::Acquire) && !self.is_empty()
    }

    /// Snapshot of the messages in order.
    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().messages.clone()
    }

    /// First message with `role`, if any.
    pub fn first_message(&self, role: &Role) -> Option<Message> {
        self.state
            .lock()
            .messages
            .iter()
            .find(|message| &message.role == role)
            .cloned()
    }

    /// File the transcript was last written to or loaded from.
    pub fn backing_path(&self) -> Option<PathBuf> {
        self.state.lock().backing_path.clone()
    }

    /// Time of the last successful save or autosave.
    pub fn last_saved_at(&self) -> Option<DateTime<Local>> {
        self.state.lock().last_saved_at
    }
}

/// Write the archive file through a temp file and rename.
fn write_transcript(
    path: &Path,
    title: &str,
    saved_at: DateTime<Local>,
    messages: &[Message],
) -> Result<(), TranscriptError> {
    let contents = format::render(title, &format_timestamp(saved_at), messages);
    let mut temp_name = path.as_os_str().to_os_string();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);
    let written = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&temp_path)
        .and_then(|mut file| file.write_all(contents.as_bytes()))
        .and_then(|()| fs::rename(&temp_path, path));
    if let Err(err) = written {
        if let Err(remove_err) = fs::remove_file(&temp_path)
            && remove_err.kind() != ErrorKind::NotFound
        {
            warn!(
                "failed to remove temp file (path={}, error={})",
                temp_path.display(),
                remove_err
            );
        }
        return Err(err.into());
    }
    Ok(())
}
