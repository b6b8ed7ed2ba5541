//! Session driver scenarios against scripted input and a recording panel.

use chatpane_core::{Flow, QuestionBank, Session};
use chatpane_panel::Panel;
use chatpane_test_utils::{RecordingPanel, ScriptedConsole, write_archive_file};
use chatpane_transcript::{Archive, ArchiveOrder, Role, TranscriptStore};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn session_in(root: &Path, panel: RecordingPanel) -> Session<RecordingPanel> {
    let store = TranscriptStore::new(Archive::new(root, ArchiveOrder::Name)).expect("store");
    Session::new(Arc::new(store), QuestionBank::with_defaults(), panel)
}

fn fresh_store(root: &Path) -> TranscriptStore {
    TranscriptStore::new(Archive::new(root, ArchiveOrder::Name)).expect("store")
}

fn roles_and_contents(session: &Session<RecordingPanel>) -> Vec<(Role, String)> {
    session
        .store()
        .messages()
        .into_iter()
        .map(|message| (message.role, message.content))
        .collect()
}

#[tokio::test]
async fn known_question_opens_panel() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(Vec::<String>::new());

    let flow = session
        .handle_line(&mut console, "What is a process?")
        .await
        .expect("handle");

    assert_eq!(flow, Flow::Continue);
    assert_eq!(session.panel().shown().len(), 1);
    assert!(session.panel().shown()[0].starts_with("A process is an instance"));
    assert!(console.printed("Bot: Answer displayed in side panel"));
    let messages = roles_and_contents(&session);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], (Role::User, "What is a process?".to_string()));
    assert_eq!(messages[1].0, Role::Bot);
}

#[tokio::test]
async fn answer_prints_inline_without_panel() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::hidden());
    let mut console = ScriptedConsole::new(Vec::<String>::new());

    session
        .handle_line(&mut console, "what is tmux")
        .await
        .expect("handle");

    assert!(console.printed("Bot: Tmux is a terminal multiplexer"));
    assert!(!console.printed("side panel"));
}

#[tokio::test]
async fn unknown_question_records_miss() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(Vec::<String>::new());

    session
        .handle_line(&mut console, "what is the weather")
        .await
        .expect("handle");

    assert!(console.printed("I don't have an answer to that question"));
    assert_eq!(
        roles_and_contents(&session),
        vec![
            (Role::User, "what is the weather".to_string()),
            (Role::Bot, "Answer not found".to_string()),
        ]
    );
    assert!(session.panel().shown().is_empty());
}

#[tokio::test]
async fn blank_lines_are_ignored() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(Vec::<String>::new());

    let flow = session.handle_line(&mut console, "  \t").await.expect("handle");

    assert_eq!(flow, Flow::Continue);
    assert!(session.store().is_empty());
    assert!(console.output().is_empty());
}

#[tokio::test]
async fn help_outranks_exit() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(Vec::<String>::new());

    let flow = session
        .handle_line(&mut console, "help me exit")
        .await
        .expect("handle");

    assert_eq!(flow, Flow::Continue);
    assert!(console.printed("Commands:"));
    assert!(session.store().is_empty());
}

#[tokio::test]
async fn clear_clears_the_screen() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(Vec::<String>::new());

    session.handle_line(&mut console, "clear").await.expect("handle");

    assert_eq!(console.clears(), 1);
    assert!(session.store().is_empty());
}

#[tokio::test]
async fn list_and_load_question_by_number() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(Vec::<String>::new());

    session
        .handle_line(&mut console, "list questions")
        .await
        .expect("list");
    assert!(console.printed("1. fifo pipes"));
    assert!(console.printed("10. what is tmux"));

    session
        .handle_line(&mut console, "load question 3")
        .await
        .expect("load");
    let messages = roles_and_contents(&session);
    assert_eq!(messages[0], (Role::User, "shared resources".to_string()));
    assert!(messages[1].1.starts_with("Shared resources are memory regions"));
    assert_eq!(session.panel().shown().len(), 1);
}

#[tokio::test]
async fn load_question_rejects_bad_numbers() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(vec!["abc"]);

    session
        .handle_line(&mut console, "load question 99")
        .await
        .expect("handle");
    session
        .handle_line(&mut console, "load question")
        .await
        .expect("handle");

    assert_eq!(
        console
            .output()
            .iter()
            .filter(|line| line.starts_with("Invalid question number"))
            .count(),
        2
    );
    assert!(session.store().is_empty());
}

#[tokio::test]
async fn save_with_argument_writes_archive_file() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(Vec::<String>::new());

    session
        .handle_line(&mut console, "what is fork")
        .await
        .expect("ask");
    session
        .handle_line(&mut console, "save conversation fork_notes")
        .await
        .expect("save");

    assert!(temp.path().join("fork_notes.txt").is_file());
    assert!(console.printed("Conversation saved as: "));
    assert_eq!(session.store().title(), "fork_notes");
    assert_eq!(session.store().len(), 2);
}

#[tokio::test]
async fn save_without_title_uses_first_user_words() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(vec![""]);

    session
        .handle_line(&mut console, "What is fork?")
        .await
        .expect("ask");
    session.handle_line(&mut console, "save").await.expect("save");

    assert_eq!(session.store().title(), "What_is_fork");
    assert!(temp.path().join("What_is_fork.txt").is_file());
}

#[tokio::test]
async fn save_after_autosave_reports_rename() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(Vec::<String>::new());

    session
        .handle_line(&mut console, "what are pipes")
        .await
        .expect("ask");
    assert!(session.store().autosave().expect("autosave"));
    session
        .handle_line(&mut console, "save pipes")
        .await
        .expect("save");

    assert!(console.printed("Conversation renamed to: "));
    assert_eq!(
        session.store().archive().list_titles().expect("list"),
        vec!["pipes".to_string()]
    );
}

#[tokio::test]
async fn save_on_empty_conversation_writes_nothing() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(Vec::<String>::new());

    session.handle_line(&mut console, "save empty").await.expect("save");

    assert!(console.printed("Nothing to save yet."));
    assert_eq!(
        session.store().archive().list_titles().expect("list"),
        Vec::<String>::new()
    );
}

#[tokio::test]
async fn exit_saves_under_prompted_title() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(vec!["what is fork", "exit", "forkdemo"]);

    session.run(&mut console).await.expect("run");

    assert!(console.printed("Goodbye!"));
    assert_eq!(console.remaining(), 0);
    assert!(session.panel().closes() >= 1);
    let reloaded = fresh_store(temp.path());
    assert_eq!(reloaded.load_into("forkdemo").expect("load"), 3);
    let last = reloaded.messages().pop().expect("message");
    assert_eq!((last.role, last.content), (Role::User, "exit".to_string()));
}

#[tokio::test]
async fn exit_with_blank_title_derives_one() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(vec!["what is exec", "quit", ""]);

    session.run(&mut console).await.expect("run");

    assert!(temp.path().join("what_is_exec.txt").is_file());
}

#[tokio::test]
async fn end_of_input_autosaves() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(vec!["what is tmux"]);

    session.run(&mut console).await.expect("run");

    assert!(console.printed("Goodbye!"));
    let titles = session.store().archive().list_titles().expect("list");
    assert_eq!(titles.len(), 1);
    assert!(titles[0].starts_with("autosave_"));
    assert!(!session.store().is_dirty());
}

#[tokio::test]
async fn list_conversations_numbers_archive() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(Vec::<String>::new());

    session
        .handle_line(&mut console, "list conversations")
        .await
        .expect("list");
    assert!(console.printed("No conversations found."));

    write_archive_file(temp.path(), "beta", &[("user", "hi")]);
    write_archive_file(temp.path(), "alpha", &[("user", "hello")]);
    session.handle_line(&mut console, "history").await.expect("list");

    assert!(console.printed("=== Previous Conversations ==="));
    assert!(console.printed("1. alpha"));
    assert!(console.printed("2. beta"));
}

#[tokio::test]
async fn load_conversation_by_ordinal() {
    let temp = tempdir().expect("tempdir");
    write_archive_file(temp.path(), "alpha", &[("user", "first")]);
    write_archive_file(
        temp.path(),
        "beta",
        &[("user", "what is fork"), ("bot", "fork() is a system call")],
    );
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(Vec::<String>::new());

    session
        .handle_line(&mut console, "load conversation 2")
        .await
        .expect("load");

    assert!(console.printed("=== Loading Conversation: beta ==="));
    assert!(console.printed("[2024-01-01 12:00:01] bot: fork() is a system call"));
    assert_eq!(session.store().title(), "beta");
    assert_eq!(session.store().len(), 2);
    assert!(!session.store().is_dirty());
    assert!(console.prompts().is_empty());
}

#[tokio::test]
async fn load_conversation_offers_to_save_first() {
    let temp = tempdir().expect("tempdir");
    write_archive_file(temp.path(), "saved", &[("user", "old question")]);
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(vec!["yes", "current"]);

    session
        .handle_line(&mut console, "what is fork")
        .await
        .expect("ask");
    session
        .handle_line(&mut console, "resume saved")
        .await
        .expect("load");

    assert!(temp.path().join("current.txt").is_file());
    assert_eq!(session.store().title(), "saved");
    assert_eq!(
        roles_and_contents(&session),
        vec![(Role::User, "old question".to_string())]
    );
}

#[tokio::test]
async fn load_missing_conversation_keeps_state() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(Vec::<String>::new());

    session
        .handle_line(&mut console, "what is fork")
        .await
        .expect("ask");
    session
        .handle_line(&mut console, "load conversation nowhere")
        .await
        .expect("load");
    session
        .handle_line(&mut console, "load conversation 7")
        .await
        .expect("load");

    assert_eq!(
        console
            .output()
            .iter()
            .filter(|line| *line == "Conversation not found.")
            .count(),
        2
    );
    assert_eq!(session.store().len(), 2);
    assert!(console.prompts().is_empty());
}

#[tokio::test]
async fn new_conversation_discards_on_no() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(vec!["n"]);

    session
        .handle_line(&mut console, "what is fork")
        .await
        .expect("ask");
    session
        .handle_line(&mut console, "new conversation")
        .await
        .expect("new");

    assert!(console.printed("Started new conversation."));
    assert!(session.store().is_empty());
    assert_eq!(session.store().title(), "");
    assert_eq!(session.panel().closes(), 1);
    assert!(!session.panel().is_open());
    assert_eq!(
        session.store().archive().list_titles().expect("list"),
        Vec::<String>::new()
    );
}

#[tokio::test]
async fn close_records_panel_closed() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(Vec::<String>::new());

    session
        .handle_line(&mut console, "what is fork")
        .await
        .expect("ask");
    session
        .handle_line(&mut console, "close panel")
        .await
        .expect("close");

    assert_eq!(session.panel().closes(), 1);
    let messages = roles_and_contents(&session);
    assert_eq!(
        &messages[2..],
        &[
            (Role::User, "close panel".to_string()),
            (Role::Bot, "Panel closed".to_string()),
        ]
    );
}

#[tokio::test]
async fn view_conversation_prints_without_loading() {
    let temp = tempdir().expect("tempdir");
    write_archive_file(
        temp.path(),
        "notes",
        &[("user", "what is fork"), ("bot", "fork() is a system call")],
    );
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::new(vec!["1"]);

    session
        .handle_line(&mut console, "what is tmux")
        .await
        .expect("ask");
    session
        .handle_line(&mut console, "view conversation")
        .await
        .expect("view");

    assert!(console.printed("1. notes"));
    assert!(console.printed("=== Conversation: notes ==="));
    assert!(console.printed("Title: notes"));
    assert!(console.printed("[2024-01-01 12:00:01] bot: fork() is a system call"));
    assert_eq!(session.store().len(), 2);
    assert!(session.store().is_dirty());

    session
        .handle_line(&mut console, "read conversation elsewhere")
        .await
        .expect("view");
    assert!(console.printed("Conversation not found."));
}

#[tokio::test]
async fn console_failure_still_autosaves_and_closes_panel() {
    let temp = tempdir().expect("tempdir");
    let mut session = session_in(temp.path(), RecordingPanel::new());
    let mut console = ScriptedConsole::failing_after(vec!["what is tmux"]);

    let result = session.run(&mut console).await;

    assert!(result.is_err());
    assert!(console.printed("Goodbye!"));
    assert!(!session.panel().is_open());
    assert!(!session.store().is_dirty());
    let titles = session.store().archive().list_titles().expect("list");
    assert_eq!(titles.len(), 1);
    assert!(titles[0].starts_with("autosave_"));
}
