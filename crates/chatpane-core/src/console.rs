//! Line-oriented terminal abstraction used by [`crate::Session`].

use async_trait::async_trait;
use std::io;

/// Interactive input and output for a chat session.
#[async_trait]
pub trait Console: Send {
    /// Show `prompt` and read one line without its line ending.
    ///
    /// Returns `None` at end of input.
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Print one line of output.
    fn print(&mut self, text: &str);

    /// Clear the screen.
    fn clear_screen(&mut self);
}
