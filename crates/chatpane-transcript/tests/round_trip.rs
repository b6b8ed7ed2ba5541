//! Save/load round-trip and archive scenarios.

use chatpane_transcript::{Archive, ArchiveOrder, Role, TranscriptStore, is_provisional_title};
use pretty_assertions::assert_eq;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

const PROCESS_ANSWER: &str = "A process is an instance of a running program.";

fn store_in(root: &Path) -> TranscriptStore {
    TranscriptStore::new(Archive::new(root, ArchiveOrder::Name)).expect("store")
}

/// Save followed by load into a fresh store preserves role, content,
/// timestamp, and order.
#[test]
fn save_then_load_round_trips() {
    let temp = tempdir().expect("tempdir");
    let original = store_in(temp.path());
    original.append(Role::User, "what are pipes");
    original.append(Role::Bot, "Pipes are a method of IPC: data flows one way.");
    original.append(Role::User, "  padded  ");
    original.append(Role::Other("system".to_string()), "[bracketed] text");
    original.save("pipes").expect("save");

    let fresh = store_in(temp.path());
    let count = fresh.load_into("pipes").expect("load");

    assert_eq!(count, 4);
    assert_eq!(fresh.messages(), original.messages());
    assert_eq!(fresh.title(), "pipes");
}

/// The documented `proc_demo` file layout.
#[test]
fn proc_demo_file_layout() {
    let temp = tempdir().expect("tempdir");
    let archive_root = temp.path().join("conversations");
    let store = store_in(&archive_root);
    store.append(Role::User, "what is a process");
    store.append(Role::Bot, PROCESS_ANSWER);
    store.save("proc_demo").expect("save");

    let contents = fs::read_to_string(archive_root.join("proc_demo.txt")).expect("read");
    let lines: Vec<&str> = contents.split('\n').collect();
    let stamp = r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}";

    assert_eq!(lines[0], "Title: proc_demo");
    assert!(Regex::new(&format!("^Date: {stamp}$")).expect("regex").is_match(lines[1]));
    assert_eq!(lines[2], "=====================================");
    assert_eq!(lines[3], "");
    assert!(
        Regex::new(&format!(r"^\[{stamp}\] user: what is a process$"))
            .expect("regex")
            .is_match(lines[4])
    );
    assert_eq!(lines[5], "");
    assert!(
        Regex::new(&format!(r"^\[{stamp}\] bot: {}$", regex::escape(PROCESS_ANSWER)))
            .expect("regex")
            .is_match(lines[6])
    );
    assert_eq!(&lines[7..], &["", ""]);
}

/// Autosave names untitled transcripts `autosave_<secs>`; a real save
/// replaces that file.
#[test]
fn provisional_title_is_replaced_by_save() {
    let temp = tempdir().expect("tempdir");
    let store = store_in(temp.path());
    store.append(Role::User, "what is fork");
    assert!(store.autosave().expect("autosave"));

    let title = store.title();
    assert!(Regex::new(r"^autosave_\d+$").expect("regex").is_match(&title));
    assert!(is_provisional_title(&title));
    assert_eq!(store.archive().list_titles().expect("list"), vec![title]);

    store.save("foo").expect("save");
    assert_eq!(
        store.archive().list_titles().expect("list"),
        vec!["foo".to_string()]
    );
}

/// Ordinals resolve through the archive listing.
#[test]
fn ordinal_resolves_saved_titles() {
    let temp = tempdir().expect("tempdir");
    let store = store_in(temp.path());
    for title in ["alpha", "beta"] {
        store.append(Role::User, title);
        store.save(title).expect("save");
    }
    let archive = store.archive();
    assert_eq!(archive.title_at_ordinal(2).expect("lookup"), Some("beta".to_string()));
    assert_eq!(archive.title_at_ordinal(5).expect("lookup"), None);
}

/// Appends racing autosave never lose messages or leave the flag stale.
#[test]
fn concurrent_appends_and_autosaves_stay_consistent() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(store_in(temp.path()));
    store.append(Role::User, "seed");
    store.save("race").expect("save");

    let writer = {
        let store = store.clone();
        thread::spawn(move || {
            for i in 0..200 {
                store.append(Role::User, format!("line {i}"));
            }
        })
    };
    let saver = {
        let store = store.clone();
        thread::spawn(move || {
            for _ in 0..200 {
                store.autosave().expect("autosave");
            }
        })
    };
    writer.join().expect("writer");
    saver.join().expect("saver");
    store.autosave().expect("final autosave");

    assert_eq!(store.is_dirty(), false);
    let reloaded = store_in(temp.path());
    assert_eq!(reloaded.load_into("race").expect("load"), 201);
    assert_eq!(reloaded.messages(), store.messages());
}
