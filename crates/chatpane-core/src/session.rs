//! Interactive chat session driver.

use crate::commands::{CommandKind, CommandSet};
use crate::console::Console;
use crate::error::CoreError;
use crate::lookup::QuestionBank;
use crate::normalize::{DEFAULT_TITLE_WORDS, first_words, normalize};
use chatpane_panel::Panel;
use chatpane_transcript::format::render_message;
use chatpane_transcript::{Role, TranscriptError, TranscriptStore, is_provisional_title};
use log::{debug, info, warn};
use std::sync::Arc;

const USER_PROMPT: &str = "\nYou: ";
const TITLE_PROMPT: &str = "Enter conversation title (or press Enter for auto-title): ";
const SAVE_FIRST_PROMPT: &str = "Save current conversation? (y/n): ";
const QUESTION_NUMBER_PROMPT: &str = "Enter question number: ";
const CONVERSATION_PROMPT: &str = "Enter conversation title or number: ";

const SIDE_PANEL_NOTICE: &str = "Bot: Answer displayed in side panel ➜";
const ANSWER_NOT_FOUND: &str = "Answer not found";
const PANEL_CLOSED: &str = "Panel closed";
const CONVERSATION_NOT_FOUND: &str = "Conversation not found.";

const WELCOME: &str = "\n╔════════════════════════════════════════╗\n\
                       ║        Welcome to chatpane!            ║\n\
                       ║   Answers open in a tmux side panel    ║\n\
                       ╚════════════════════════════════════════╝";

const HELP: &str = "Commands:\n  \
                    - Ask any question\n  \
                    - 'list questions' - Show the questions I can answer\n  \
                    - 'load question <n>' - Ask question number n\n  \
                    - 'save [title]' - Save this conversation\n  \
                    - 'list conversations' - View history\n  \
                    - 'load conversation <title|n>' - Resume a saved conversation\n  \
                    - 'view conversation <title|n>' - Print a saved conversation\n  \
                    - 'new conversation' - Start fresh\n  \
                    - 'close panel' - Close answer panel\n  \
                    - 'clear' - Clear the screen\n  \
                    - 'help' - Show this list\n  \
                    - 'exit' - Quit application";

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// One interactive conversation.
///
/// The session owns the panel and shares the transcript store with the
/// autosave task.
pub struct Session<P: Panel> {
    store: Arc<TranscriptStore>,
    bank: QuestionBank,
    commands: CommandSet,
    panel: P,
}

impl<P: Panel> Session<P> {
    /// Session over `store` answering from `bank` and showing answers in `panel`.
    pub fn new(store: Arc<TranscriptStore>, bank: QuestionBank, panel: P) -> Self {
        Self {
            store,
            bank,
            commands: CommandSet::new(),
            panel,
        }
    }

    /// Shared transcript store.
    pub fn store(&self) -> &Arc<TranscriptStore> {
        &self.store
    }

    /// Question bank used for lookups.
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Answer panel.
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Print the banner and process lines until exit or end of input.
    ///
    /// A console error ends the session like end of input does, then is
    /// returned.
    pub async fn run<C>(&mut self, console: &mut C) -> Result<(), CoreError>
    where
        C: Console + ?Sized,
    {
        info!("session started (questions={})", self.bank.len());
        console.print(WELCOME);
        console.print(HELP);
        loop {
            let step = match console.read_line(USER_PROMPT).await {
                Ok(Some(line)) => self.handle_line(console, &line).await,
                Ok(None) => {
                    self.finish_at_end_of_input(console);
                    break;
                }
                Err(err) => Err(err.into()),
            };
            match step {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(err) => {
                    warn!("console failed; flushing transcript: {err}");
                    self.finish_at_end_of_input(console);
                    return Err(err);
                }
            }
        }
        info!("session ended (messages={})", self.store.len());
        Ok(())
    }

    /// Classify and act on one input line.
    pub async fn handle_line<C>(&mut self, console: &mut C, line: &str) -> Result<Flow, CoreError>
    where
        C: Console + ?Sized,
    {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        let Some(command) = self.commands.classify(line) else {
            self.answer_question(console, line);
            return Ok(Flow::Continue);
        };
        debug!(
            "handling command (kind={}, argument_len={})",
            command.kind,
            command.argument.len()
        );

        match command.kind {
            CommandKind::Clear => console.clear_screen(),
            CommandKind::Help => console.print(HELP),
            CommandKind::ListQuestions => self.list_questions(console),
            CommandKind::LoadQuestion => self.load_question(console, &command.argument).await?,
            CommandKind::LoadConversation => {
                self.load_conversation(console, &command.argument).await?
            }
            CommandKind::ViewConversation => {
                self.view_conversation(console, &command.argument).await?
            }
            CommandKind::Save => self.save(console, &command.argument).await?,
            CommandKind::Exit => {
                self.exit(console, line).await?;
                return Ok(Flow::Exit);
            }
            CommandKind::Close => self.close_panel(line),
            CommandKind::NewConversation => self.new_conversation(console).await?,
            CommandKind::ListConversations => self.list_conversations(console),
        }
        Ok(Flow::Continue)
    }

    fn answer_question<C>(&mut self, console: &mut C, line: &str)
    where
        C: Console + ?Sized,
    {
        self.store.append(Role::User, line);
        match self.bank.find_answer(line).map(str::to_string) {
            Some(answer) => self.show_answer(console, &answer),
            None => {
                debug!("no answer found (input_len={})", line.len());
                console.print("Bot: I'm sorry, I don't have an answer to that question.");
                console.print("     Please try rephrasing or ask something else.");
                self.store.append(Role::Bot, ANSWER_NOT_FOUND);
            }
        }
    }

    /// Record `answer` and show it in the panel, or inline when the panel
    /// declines.
    fn show_answer<C>(&mut self, console: &mut C, answer: &str)
    where
        C: Console + ?Sized,
    {
        self.store.append(Role::Bot, answer);
        if self.panel.show(answer) {
            console.print(SIDE_PANEL_NOTICE);
        } else {
            console.print(&format!("Bot: {answer}"));
        }
    }

    fn list_questions<C>(&self, console: &mut C)
    where
        C: Console + ?Sized,
    {
        if self.bank.is_empty() {
            console.print("No questions available.");
            return;
        }
        console.print("\n=== Available Questions ===");
        for (index, (question, _)) in self.bank.questions().enumerate() {
            console.print(&format!("{}. {}", index + 1, question));
        }
    }

    async fn load_question<C>(&mut self, console: &mut C, argument: &str) -> Result<(), CoreError>
    where
        C: Console + ?Sized,
    {
        let input = if argument.is_empty() {
            self.list_questions(console);
            prompt(console, QUESTION_NUMBER_PROMPT).await?
        } else {
            argument.to_string()
        };
        let selected = input
            .parse::<usize>()
            .ok()
            .and_then(|number| self.bank.question_at(number))
            .map(|(question, answer)| (question.to_string(), answer.to_string()));
        let Some((question, answer)) = selected else {
            console.print("Invalid question number. Type 'list questions' to see the options.");
            return Ok(());
        };
        console.print(&format!("You asked: {question}"));
        self.store.append(Role::User, question);
        self.show_answer(console, &answer);
        Ok(())
    }

    /// Archived title named by `argument` (a title or 1-based ordinal),
    /// prompting when it is empty. Prints why when nothing matches.
    async fn select_conversation<C>(
        &self,
        console: &mut C,
        argument: &str,
    ) -> Result<Option<String>, CoreError>
    where
        C: Console + ?Sized,
    {
        let target = if argument.is_empty() {
            self.list_conversations(console);
            prompt(console, CONVERSATION_PROMPT).await?
        } else {
            argument.to_string()
        };
        if target.is_empty() {
            console.print("No conversation selected.");
            return Ok(None);
        }

        let archive = self.store.archive();
        let by_ordinal = match target.parse::<usize>() {
            Ok(ordinal) => match archive.title_at_ordinal(ordinal) {
                Ok(title) => title,
                Err(err) => {
                    warn!("failed to list conversations: {err}");
                    None
                }
            },
            Err(_) => None,
        };
        let title = by_ordinal.unwrap_or(target);
        if !archive.contains(&title) {
            console.print(CONVERSATION_NOT_FOUND);
            return Ok(None);
        }
        Ok(Some(title))
    }

    async fn load_conversation<C>(
        &mut self,
        console: &mut C,
        argument: &str,
    ) -> Result<(), CoreError>
    where
        C: Console + ?Sized,
    {
        let Some(title) = self.select_conversation(console, argument).await? else {
            return Ok(());
        };

        if !self.store.is_empty() {
            self.offer_save(console).await?;
        }

        match self.store.load_into(&title) {
            Ok(_) => {
                console.print(&format!("\n=== Loading Conversation: {title} ==="));
                for message in self.store.messages() {
                    console.print(&render_message(&message));
                }
                console.print("\n✓ Conversation loaded. You can continue from here.");
            }
            Err(TranscriptError::NotFound(_)) => console.print(CONVERSATION_NOT_FOUND),
            Err(err) => {
                warn!("failed to load conversation (title={title}, error={err})");
                console.print(&format!("Error: Could not load conversation ({err})"));
            }
        }
        Ok(())
    }

    /// Print a saved transcript as stored, leaving the current one alone.
    async fn view_conversation<C>(&self, console: &mut C, argument: &str) -> Result<(), CoreError>
    where
        C: Console + ?Sized,
    {
        let Some(title) = self.select_conversation(console, argument).await? else {
            return Ok(());
        };
        match self.store.archive().read_raw(&title) {
            Ok(contents) => {
                console.print(&format!("\n=== Conversation: {title} ==="));
                console.print(contents.trim_end());
            }
            Err(TranscriptError::NotFound(_)) => console.print(CONVERSATION_NOT_FOUND),
            Err(err) => {
                warn!("failed to read conversation (title={title}, error={err})");
                console.print(&format!("Error: Could not read conversation ({err})"));
            }
        }
        Ok(())
    }

    async fn save<C>(&mut self, console: &mut C, argument: &str) -> Result<(), CoreError>
    where
        C: Console + ?Sized,
    {
        if self.store.is_empty() {
            console.print("Nothing to save yet.");
            return Ok(());
        }
        let typed = if argument.is_empty() {
            prompt(console, TITLE_PROMPT).await?
        } else {
            argument.to_string()
        };
        let title = self.resolve_title(&typed);
        self.save_as(console, &title);
        Ok(())
    }

    async fn exit<C>(&mut self, console: &mut C, line: &str) -> Result<(), CoreError>
    where
        C: Console + ?Sized,
    {
        self.store.append(Role::User, line);
        console.print("\nSaving conversation before exit...");
        let typed = prompt(console, TITLE_PROMPT).await?;
        let title = self.resolve_title(&typed);
        self.save_as(console, &title);
        self.panel.close();
        console.print("Goodbye!");
        Ok(())
    }

    fn close_panel(&mut self, line: &str) {
        self.store.append(Role::User, line);
        self.panel.close();
        self.store.append(Role::Bot, PANEL_CLOSED);
    }

    async fn new_conversation<C>(&mut self, console: &mut C) -> Result<(), CoreError>
    where
        C: Console + ?Sized,
    {
        if !self.store.is_empty() {
            self.offer_save(console).await?;
        }
        self.store.clear();
        self.panel.close();
        console.print("Started new conversation.");
        Ok(())
    }

    fn list_conversations<C>(&self, console: &mut C)
    where
        C: Console + ?Sized,
    {
        let titles = match self.store.archive().list_titles() {
            Ok(titles) => titles,
            Err(err) => {
                warn!("failed to list conversations: {err}");
                console.print(&format!("Error: Could not list conversations ({err})"));
                return;
            }
        };
        if titles.is_empty() {
            console.print("No conversations found.");
            return;
        }
        console.print("\n=== Previous Conversations ===");
        for (index, title) in titles.iter().enumerate() {
            console.print(&format!("{}. {}", index + 1, title));
        }
    }

    /// Ask whether to save the current transcript and save it on yes.
    async fn offer_save<C>(&mut self, console: &mut C) -> Result<(), CoreError>
    where
        C: Console + ?Sized,
    {
        let reply = normalize(&prompt(console, SAVE_FIRST_PROMPT).await?);
        if reply != "y" && reply != "yes" {
            debug!("discarding current conversation (messages={})", self.store.len());
            return Ok(());
        }
        let typed = prompt(console, TITLE_PROMPT).await?;
        let title = self.resolve_title(&typed);
        self.save_as(console, &title);
        Ok(())
    }

    fn finish_at_end_of_input<C>(&mut self, console: &mut C)
    where
        C: Console + ?Sized,
    {
        info!("end of input");
        if let Err(err) = self.store.autosave() {
            warn!("final autosave failed: {err}");
        }
        self.panel.close();
        console.print("\nGoodbye!");
    }

    /// Typed title, else the current chosen title, else words from the first
    /// user message.
    fn resolve_title(&self, typed: &str) -> String {
        let typed = typed.trim();
        if !typed.is_empty() {
            return typed.to_string();
        }
        let current = self.store.title();
        if !current.is_empty() && !is_provisional_title(&current) {
            return current;
        }
        let first = self
            .store
            .first_message(&Role::User)
            .map(|message| message.content)
            .unwrap_or_default();
        first_words(&first, DEFAULT_TITLE_WORDS)
    }

    fn save_as<C>(&mut self, console: &mut C, title: &str)
    where
        C: Console + ?Sized,
    {
        match self.store.save(title) {
            Ok(outcome) if outcome.renamed_from.is_some() => console.print(&format!(
                "Conversation renamed to: {}",
                outcome.path.display()
            )),
            Ok(outcome) => console.print(&format!(
                "Conversation saved as: {}",
                outcome.path.display()
            )),
            Err(TranscriptError::EmptyTranscript) => console.print("Nothing to save yet."),
            Err(err) => {
                warn!("failed to save conversation (title={title}, error={err})");
                console.print(&format!("Error: Could not save conversation ({err})"));
            }
        }
    }
}

/// Read a reply to `text`; end of input reads as an empty reply.
async fn prompt<C>(console: &mut C, text: &str) -> Result<String, CoreError>
where
    C: Console + ?Sized,
{
    Ok(console
        .read_line(text)
        .await?
        .map(|reply| reply.trim().to_string())
        .unwrap_or_default())
}
