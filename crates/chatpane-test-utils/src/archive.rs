use chatpane_transcript::format::render;
use chatpane_transcript::{Message, Role};
use std::fs;
use std::path::{Path, PathBuf};

/// `Date:` header written by [`write_archive_file`].
pub const FIXTURE_DATE: &str = "2024-01-01 12:00:00";

/// Write `<root>/<title>.txt` holding `(role, content)` messages.
///
/// Message timestamps are `2024-01-01 12:00:SS`, counting up from zero.
pub fn write_archive_file(root: &Path, title: &str, messages: &[(&str, &str)]) -> PathBuf {
    let messages: Vec<Message> = messages
        .iter()
        .enumerate()
        .map(|(index, (role, content))| {
            Message::with_timestamp(
                Role::from(*role),
                *content,
                format!("2024-01-01 12:00:{:02}", index % 60),
            )
        })
        .collect();
    fs::create_dir_all(root).expect("create archive dir");
    let path = root.join(format!("{title}.txt"));
    fs::write(&path, render(title, FIXTURE_DATE, &messages)).expect("write archive file");
    path
}
