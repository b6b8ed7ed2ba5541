//! Hardcoded question bank and answer lookup.

use crate::normalize::normalize;
use log::{debug, warn};
use std::collections::BTreeMap;

const DEFAULT_QUESTIONS: &[(&str, &str)] = &[
    (
        "what is c++",
        "C++ is a high-performance programming language that supports object-oriented, \
         procedural, and generic programming. It was developed by Bjarne Stroustrup \
         as an extension of C.",
    ),
    (
        "what is tmux",
        "Tmux is a terminal multiplexer that allows you to create, access, and control \
         multiple terminals from a single screen. It's useful for managing multiple \
         terminal sessions.",
    ),
    (
        "what is a process",
        "A process is an instance of a running program. It contains the program code \
         and its current activity. Each process has its own memory space and system resources.",
    ),
    (
        "what is fork",
        "fork() is a system call that creates a new process by duplicating the calling \
         process. The new process is called the child process, and it runs concurrently \
         with the parent process.",
    ),
    (
        "how are you",
        "I'm doing great! I'm a terminal chatbot built to answer your questions about \
         programming and operating systems. How can I help you today?",
    ),
    (
        "what is multithreading",
        "Multithreading is the ability of a CPU to execute multiple threads concurrently. \
         Threads are lightweight processes that share the same memory space, making \
         communication between them faster than inter-process communication.",
    ),
    (
        "what are pipes",
        "Pipes are a method of inter-process communication (IPC) that allow data to flow \
         from one process to another. The pipe() system call creates a unidirectional \
         communication channel where one process writes to the pipe and another reads from it.",
    ),
    (
        "fifo pipes",
        "FIFO (First In First Out) pipes, also called named pipes, are similar to regular \
         pipes but have a name in the filesystem. Unlike anonymous pipes, FIFOs can be used \
         by unrelated processes and persist beyond the process that created them. Created \
         using mkfifo() system call.",
    ),
    (
        "shared resources",
        "Shared resources are memory regions or system resources that multiple processes or \
         threads can access concurrently. Common examples include shared memory segments, \
         files, and hardware devices. Proper synchronization mechanisms like semaphores, \
         mutexes, or locks are needed to prevent race conditions.",
    ),
    (
        "what is exec",
        "The exec family of functions replaces the current process image with a new program. \
         Common variants include: execl(), execv(), execle(), execve(), execlp(), execvp(). \
         They differ in how arguments are passed (list vs array) and whether they use PATH \
         or environment variables. After exec, the new program runs in the same process ID.",
    ),
];

/// Map of trigger phrases to canned answers.
///
/// Lookup is substring matching over the normalized input, tried in sorted
/// key order; the first phrase found wins.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    entries: BTreeMap<String, String>,
}

impl QuestionBank {
    /// Create an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bank seeded with the built-in questions.
    pub fn with_defaults() -> Self {
        let mut bank = Self::new();
        for (question, answer) in DEFAULT_QUESTIONS {
            bank.add_question(question, *answer);
        }
        bank
    }

    /// Insert or replace an entry keyed by the normalized question.
    ///
    /// A question that normalizes to nothing would match every input and is
    /// ignored.
    pub fn add_question(&mut self, question: &str, answer: impl Into<String>) {
        let key = normalize(question);
        if key.is_empty() {
            warn!("ignoring empty question bank entry");
            return;
        }
        debug!("adding question (question={key})");
        self.entries.insert(key, answer.into());
    }

    /// Answer for the first trigger phrase contained in `text`.
    pub fn find_answer(&self, text: &str) -> Option<&str> {
        let normalized = normalize(text);
        self.entries
            .iter()
            .find(|(question, _)| normalized.contains(question.as_str()))
            .map(|(_, answer)| answer.as_str())
    }

    /// Entries in lookup order.
    pub fn questions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(question, answer)| (question.as_str(), answer.as_str()))
    }

    /// Entry at the 1-based position `number` of [`QuestionBank::questions`].
    pub fn question_at(&self, number: usize) -> Option<(&str, &str)> {
        number.checked_sub(1).and_then(|index| self.questions().nth(index))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bank has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
