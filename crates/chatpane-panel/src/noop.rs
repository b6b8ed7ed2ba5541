//! Panel that never displays anything.

use crate::Panel;
use log::debug;

/// Panel used when tmux is disabled or unavailable.
#[derive(Debug, Default)]
pub struct NoopPanel;

impl NoopPanel {
    /// Create a new no-op panel.
    pub fn new() -> Self {
        Self
    }
}

impl Panel for NoopPanel {
    fn show(&mut self, text: &str) -> bool {
        debug!("noop panel declined text (len={})", text.len());
        false
    }

    fn close(&mut self) {}

    fn is_open(&self) -> bool {
        false
    }
}
