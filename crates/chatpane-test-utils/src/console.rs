use async_trait::async_trait;
use chatpane_core::Console;
use std::collections::VecDeque;
use std::io;

/// Console fed from a fixed list of input lines.
///
/// Reads past the end of the script return end of input, or a read error
/// when built with [`ScriptedConsole::failing_after`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    fail_when_exhausted: bool,
    prompts: Vec<String>,
    output: Vec<String>,
    clears: usize,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Console that fails with `InvalidData` once `inputs` are consumed.
    pub fn failing_after<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fail_when_exhausted: true,
            ..Self::new(inputs)
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// All printed lines joined with newlines.
    pub fn output_text(&self) -> String {
        self.output.join("\n")
    }

    /// Whether any printed line contains `needle`.
    pub fn printed(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    /// Input lines not consumed yet.
    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        match self.inputs.pop_front() {
            None if self.fail_when_exhausted => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "scripted read failure",
            )),
            line => Ok(line),
        }
    }

    fn print(&mut self, text: &str) {
        self.output.push(text.to_string());
    }

    fn clear_screen(&mut self) {
        self.clears += 1;
    }
}
