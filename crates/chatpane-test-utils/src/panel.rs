use chatpane_panel::Panel;

/// Panel that records what it was asked to show.
#[derive(Debug, Clone)]
pub struct RecordingPanel {
    shown: Vec<String>,
    closes: usize,
    open: bool,
    visible: bool,
}

impl Default for RecordingPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingPanel {
    /// Panel that accepts every answer.
    pub fn new() -> Self {
        Self {
            shown: Vec::new(),
            closes: 0,
            open: false,
            visible: true,
        }
    }

    /// Panel that declines every answer, like a session without tmux.
    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::new()
        }
    }

    pub fn shown(&self) -> &[String] {
        &self.shown
    }

    pub fn closes(&self) -> usize {
        self.closes
    }
}

impl Panel for RecordingPanel {
    fn show(&mut self, text: &str) -> bool {
        self.shown.push(text.to_string());
        if self.visible {
            self.open = true;
        }
        self.visible
    }

    fn close(&mut self) {
        self.closes += 1;
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
