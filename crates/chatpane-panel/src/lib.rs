//! Answer panel backends.
//!
//! The chat session only needs two things from a panel: show this text where
//! the user can see it, and close it again. [`TmuxPanel`] does that with a
//! tmux split pane; [`NoopPanel`] declines so callers print inline.

mod error;
mod noop;
mod tmux;

pub use error::PanelError;
pub use noop::NoopPanel;
pub use tmux::{TmuxPanel, TmuxSettings, inside_tmux, relaunch_in_tmux, shell_quote, tmux_available};

/// Side panel that displays answer text.
pub trait Panel: Send {
    /// Display `text`. Returns false when nothing was shown, so the caller
    /// should print the text itself.
    fn show(&mut self, text: &str) -> bool;

    /// Close the panel if it is open.
    fn close(&mut self);

    /// Whether a pane is currently open.
    fn is_open(&self) -> bool;
}

impl<P: Panel + ?Sized> Panel for Box<P> {
    fn show(&mut self, text: &str) -> bool {
        (**self).show(text)
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }
}
