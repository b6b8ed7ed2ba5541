//! Command recognition.
//!
//! A command matches when any of its trigger phrases occurs as a substring of
//! the normalized input. Commands are tried in a fixed priority order and the
//! first match wins, so `"help me exit"` is a help request.

use crate::normalize::normalize;
use std::fmt;

/// Commands understood by the session, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Clear the terminal.
    Clear,
    /// Print the command list.
    Help,
    /// Print the numbered question bank.
    ListQuestions,
    /// Ask a bank question by number.
    LoadQuestion,
    /// Replace the transcript with a saved one.
    LoadConversation,
    /// Print a saved transcript without loading it.
    ViewConversation,
    /// Save the transcript under a title.
    Save,
    /// Save and quit.
    Exit,
    /// Close the answer panel.
    Close,
    /// Start an empty transcript.
    NewConversation,
    /// Print the numbered archive.
    ListConversations,
}

impl CommandKind {
    /// Every command, highest priority first.
    pub const ALL: [CommandKind; 11] = [
        CommandKind::Clear,
        CommandKind::Help,
        CommandKind::ListQuestions,
        CommandKind::LoadQuestion,
        CommandKind::LoadConversation,
        CommandKind::ViewConversation,
        CommandKind::Save,
        CommandKind::Exit,
        CommandKind::Close,
        CommandKind::NewConversation,
        CommandKind::ListConversations,
    ];

    /// Built-in trigger phrases. Longer phrases come first so argument
    /// extraction skips the whole phrase.
    pub fn triggers(self) -> &'static [&'static str] {
        match self {
            CommandKind::Clear => &["clear screen", "clear"],
            CommandKind::Help => &["help", "commands"],
            CommandKind::ListQuestions => &["list questions", "show questions"],
            CommandKind::LoadQuestion => &["load question", "ask question"],
            CommandKind::LoadConversation => &[
                "load conversation",
                "open conversation",
                "load convo",
                "resume",
            ],
            CommandKind::ViewConversation => {
                &["view conversation", "read conversation", "view convo"]
            }
            CommandKind::Save => &["save conversation", "save"],
            CommandKind::Exit => &["exit", "quit", "bye", "goodbye"],
            CommandKind::Close => &["close panel", "close", "hide answer"],
            CommandKind::NewConversation => &["new conversation", "start new", "restart"],
            CommandKind::ListConversations => &[
                "list conversations",
                "show conversations",
                "list",
                "history",
            ],
        }
    }

    /// Stable kebab-case name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Clear => "clear",
            CommandKind::Help => "help",
            CommandKind::ListQuestions => "list-questions",
            CommandKind::LoadQuestion => "load-question",
            CommandKind::LoadConversation => "load-conversation",
            CommandKind::ViewConversation => "view-conversation",
            CommandKind::Save => "save",
            CommandKind::Exit => "exit",
            CommandKind::Close => "close",
            CommandKind::NewConversation => "new-conversation",
            CommandKind::ListConversations => "list-conversations",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A recognized command and the text that followed its trigger phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Which command matched.
    pub kind: CommandKind,
    /// Trimmed text after the first matched trigger, in its original case.
    pub argument: String,
}

#[derive(Debug, Clone)]
struct CommandEntry {
    kind: CommandKind,
    triggers: Vec<String>,
}

/// Ordered list of commands and their trigger phrases.
#[derive(Debug, Clone)]
pub struct CommandSet {
    entries: Vec<CommandEntry>,
}

impl Default for CommandSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandSet {
    /// All commands with their built-in triggers, in priority order.
    pub fn new() -> Self {
        let entries = CommandKind::ALL
            .iter()
            .map(|kind| CommandEntry {
                kind: *kind,
                triggers: kind.triggers().iter().map(|t| t.to_string()).collect(),
            })
            .collect();
        Self { entries }
    }

    /// Command kinds in the order they are tried.
    pub fn kinds(&self) -> impl Iterator<Item = CommandKind> + '_ {
        self.entries.iter().map(|entry| entry.kind)
    }

    /// Whether `input` contains any trigger of `kind`.
    pub fn matches(&self, kind: CommandKind, input: &str) -> bool {
        let normalized = normalize(input);
        self.entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .any(|entry| first_trigger(entry, &normalized).is_some())
    }

    /// First command in priority order that `input` triggers.
    pub fn classify(&self, input: &str) -> Option<Command> {
        let trimmed = input.trim_matches([' ', '\t', '\r', '\n']);
        let normalized = normalize(trimmed);
        self.entries.iter().find_map(|entry| {
            let (start, trigger) = first_trigger(entry, &normalized)?;
            // ASCII lowercasing keeps byte offsets valid for `trimmed`.
            let argument = trimmed[start + trigger.len()..].trim().to_string();
            Some(Command {
                kind: entry.kind,
                argument,
            })
        })
    }

    // Per-command recognizers, each ignoring priority.

    /// Whether `input` asks to clear the screen.
    pub fn is_clear(&self, input: &str) -> bool {
        self.matches(CommandKind::Clear, input)
    }

    /// Whether `input` asks for help.
    pub fn is_help(&self, input: &str) -> bool {
        self.matches(CommandKind::Help, input)
    }

    /// Whether `input` asks for the question list.
    pub fn is_list_questions(&self, input: &str) -> bool {
        self.matches(CommandKind::ListQuestions, input)
    }

    /// Whether `input` asks a bank question by number.
    pub fn is_load_question(&self, input: &str) -> bool {
        self.matches(CommandKind::LoadQuestion, input)
    }

    /// Whether `input` asks to load a saved conversation.
    pub fn is_load_conversation(&self, input: &str) -> bool {
        self.matches(CommandKind::LoadConversation, input)
    }

    /// Whether `input` asks to print a saved conversation.
    pub fn is_view_conversation(&self, input: &str) -> bool {
        self.matches(CommandKind::ViewConversation, input)
    }

    /// Whether `input` asks to save.
    pub fn is_save(&self, input: &str) -> bool {
        self.matches(CommandKind::Save, input)
    }

    /// Whether `input` asks to quit.
    pub fn is_exit(&self, input: &str) -> bool {
        self.matches(CommandKind::Exit, input)
    }

    /// Whether `input` asks to close the panel.
    pub fn is_close(&self, input: &str) -> bool {
        self.matches(CommandKind::Close, input)
    }

    /// Whether `input` asks for a new conversation.
    pub fn is_new_conversation(&self, input: &str) -> bool {
        self.matches(CommandKind::NewConversation, input)
    }

    /// Whether `input` asks for the archive listing.
    pub fn is_list_conversations(&self, input: &str) -> bool {
        self.matches(CommandKind::ListConversations, input)
    }
}

/// First trigger of `entry` found in `normalized`, with its byte offset.
fn first_trigger<'a>(entry: &'a CommandEntry, normalized: &str) -> Option<(usize, &'a str)> {
    entry.triggers.iter().find_map(|trigger| {
        normalized
            .find(trigger.as_str())
            .map(|start| (start, trigger.as_str()))
    })
}
