//! Error types for the session driver.

use thiserror::Error;

/// Errors that end a chat session.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Reading from the console failed.
    #[error("console error: {0}")]
    Console(#[from] std::io::Error),
}
