//! Console backed by the process stdin and stdout.

use async_trait::async_trait;
use chatpane_core::Console;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use log::{debug, warn};
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

/// Line console over the terminal.
///
/// Input is read as raw bytes; invalid UTF-8 is replaced rather than
/// rejected so a stray byte never ends the session.
pub struct StdConsole<R = BufReader<Stdin>> {
    reader: R,
}

impl StdConsole {
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> StdConsole<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Console reading lines from `reader` instead of stdin.
    pub fn from_reader(reader: R) -> Self {
        Self { reader }
    }

    async fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(None);
        }
        Ok(Some(decode_line(buf)))
    }
}

/// Strip the line ending and decode, replacing invalid UTF-8.
fn decode_line(mut buf: Vec<u8>) -> String {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    match String::from_utf8(buf) {
        Ok(line) => line,
        Err(err) => {
            debug!("input line is not valid UTF-8; replacing invalid bytes");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}

#[async_trait]
impl<R> Console for StdConsole<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        {
            let mut stdout = io::stdout();
            stdout.write_all(prompt.as_bytes())?;
            stdout.flush()?;
        }
        self.next_line().await
    }

    fn print(&mut self, text: &str) {
        println!("{text}");
    }

    fn clear_screen(&mut self) {
        if let Err(err) = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0)) {
            warn!("failed to clear screen: {err}");
        }
    }
}
