//! Archive directory of saved transcripts, keyed by title.

use crate::error::TranscriptError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Archive file extension, including the dot.
const ARCHIVE_EXTENSION: &str = ".txt";

/// Order used for listing titles and resolving ordinals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveOrder {
    /// Sorted by title; stable across platforms.
    #[default]
    Name,
    /// Raw directory enumeration order. Not portable between filesystems.
    Filesystem,
}

/// Directory of `<title>.txt` transcript files.
#[derive(Debug, Clone)]
pub struct Archive {
    /// Root directory for archive files.
    root: PathBuf,
    order: ArchiveOrder,
}

impl Archive {
    /// Describe an archive rooted at `root`. Does not touch the filesystem.
    pub fn new(root: impl AsRef<Path>, order: ArchiveOrder) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            order,
        }
    }

    /// Archive root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ordering used by listing queries.
    pub fn order(&self) -> ArchiveOrder {
        self.order
    }

    /// Path of the file backing `title`. Titles are not sanitized.
    pub fn path_for(&self, title: &str) -> PathBuf {
        self.root.join(format!("{title}{ARCHIVE_EXTENSION}"))
    }

    /// Create the archive directory if it is missing.
    pub fn ensure_dir(&self) -> Result<(), TranscriptError> {
        if !self.root.exists() {
            info!("creating archive directory (root={})", self.root.display());
        }
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Titles of every archived transcript in archive order.
    ///
    /// A missing archive directory is an empty archive.
    pub fn list_titles(&self) -> Result<Vec<String>, TranscriptError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("archive directory missing (root={})", self.root.display());
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let mut titles = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            match file_name.strip_suffix(ARCHIVE_EXTENSION) {
                Some(title) if !title.is_empty() => titles.push(title.to_string()),
                _ => continue,
            }
        }
        if self.order == ArchiveOrder::Name {
            titles.sort();
        }
        debug!(
            "listed archive (root={}, count={})",
            self.root.display(),
            titles.len()
        );
        Ok(titles)
    }

    /// Title at the 1-based position `ordinal`, or `None` when out of range.
    pub fn title_at_ordinal(&self, ordinal: usize) -> Result<Option<String>, TranscriptError> {
        if ordinal == 0 {
            return Ok(None);
        }
        Ok(self.list_titles()?.into_iter().nth(ordinal - 1))
    }

    /// Whether a transcript with `title` is archived.
    pub fn contains(&self, title: &str) -> bool {
        self.path_for(title).is_file()
    }

    /// Full text of an archived transcript.
    pub fn read_raw(&self, title: &str) -> Result<String, TranscriptError> {
        match fs::read_to_string(self.path_for(title)) {
            Ok(contents) => Ok(contents),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(TranscriptError::NotFound(title.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}
