//! Test helpers shared across chatpane crates.

pub mod archive;
pub mod console;
pub mod panel;

pub use archive::{FIXTURE_DATE, write_archive_file};
pub use console::ScriptedConsole;
pub use panel::RecordingPanel;
