//! Error types for panel setup.

use thiserror::Error;

/// Errors returned while preparing a panel backend.
#[derive(Debug, Error)]
pub enum PanelError {
    /// The tmux binary is not on PATH.
    #[error("tmux not found on PATH")]
    TmuxNotFound,
    /// Spawning tmux failed.
    #[error("failed to run tmux: {0}")]
    Spawn(#[from] std::io::Error),
}
