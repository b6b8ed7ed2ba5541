//! Chat logic for chatpane.
//!
//! Input lines are normalized, classified against an ordered command chain,
//! and otherwise answered from the [`QuestionBank`]. [`Session`] drives one
//! interactive conversation against a [`Console`] and a panel.

pub mod commands;
pub mod console;
pub mod error;
pub mod lookup;
pub mod normalize;
pub mod session;

pub use commands::{Command, CommandKind, CommandSet};
pub use console::Console;
pub use error::CoreError;
pub use lookup::QuestionBank;
pub use normalize::{DEFAULT_TITLE_WORDS, first_words, normalize};
pub use session::{Flow, Session};
