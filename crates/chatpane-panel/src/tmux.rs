//! tmux-backed answer panel.

use crate::{Panel, PanelError};
use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Settings for the tmux panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmuxSettings {
    /// Session created when relaunching outside tmux.
    pub session_name: String,
    /// Pane target used for updates and closing.
    pub target_pane: String,
    /// File the answer is written to before the pane prints it.
    pub temp_file: PathBuf,
}

/// Panel that shows answers in a horizontal tmux split.
#[derive(Debug)]
pub struct TmuxPanel {
    /// Path to the tmux executable.
    tmux_path: PathBuf,
    settings: TmuxSettings,
    open: bool,
}

impl TmuxPanel {
    /// Create a panel by resolving `tmux` on PATH.
    pub fn new(settings: TmuxSettings) -> Result<Self, PanelError> {
        let tmux_path = which::which("tmux").map_err(|_| PanelError::TmuxNotFound)?;
        Ok(Self::with_program(tmux_path, settings))
    }

    /// Create a panel that drives a specific tmux executable.
    pub fn with_program(tmux_path: impl AsRef<Path>, settings: TmuxSettings) -> Self {
        let tmux_path = tmux_path.as_ref().to_path_buf();
        info!(
            "tmux panel initialized (path={}, target_pane={})",
            tmux_path.display(),
            settings.target_pane
        );
        Self {
            tmux_path,
            settings,
            open: false,
        }
    }

    /// Shell command the answer pane runs.
    pub fn pane_command(&self) -> String {
        format!(
            "cat {} && echo \"\" && echo \"Press Enter to continue...\" && read",
            shell_quote(&self.settings.temp_file.to_string_lossy())
        )
    }

    fn write_answer(&self, text: &str) -> bool {
        match fs::write(&self.settings.temp_file, text) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "failed to write panel text (path={}, error={})",
                    self.settings.temp_file.display(),
                    err
                );
                false
            }
        }
    }

    /// Run tmux with `args`; failures are logged and reported as false.
    fn run_tmux(&self, args: &[&str]) -> bool {
        debug!("running tmux (args={:?})", args);
        let status = Command::new(&self.tmux_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(status) if status.success() => true,
            Ok(status) => {
                warn!("tmux exited unsuccessfully (args={:?}, status={})", args, status);
                false
            }
            Err(err) => {
                warn!("failed to spawn tmux (args={:?}, error={})", args, err);
                false
            }
        }
    }
}

impl Panel for TmuxPanel {
    fn show(&mut self, text: &str) -> bool {
        if !self.write_answer(text) {
            return false;
        }
        let command = self.pane_command();
        if self.open {
            let target = self.settings.target_pane.clone();
            if self.run_tmux(&["send-keys", "-t", &target, "C-c"])
                && self.run_tmux(&["send-keys", "-t", &target, &command, "Enter"])
            {
                return true;
            }
            // The pane exits once its `read` returns, so a failed send means it is gone.
            info!("answer pane not reachable; reopening (target={target})");
            self.open = false;
        }
        self.open = self.run_tmux(&["split-window", "-h", &command]);
        self.open
    }

    fn close(&mut self) {
        if !self.open {
            return;
        }
        let target = self.settings.target_pane.clone();
        self.run_tmux(&["kill-pane", "-t", &target]);
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// Whether this process runs inside a tmux client.
pub fn inside_tmux() -> bool {
    std::env::var_os("TMUX").is_some()
}

/// Whether a tmux binary is on PATH.
pub fn tmux_available() -> bool {
    which::which("tmux").is_ok()
}

/// Start a new tmux session running `program args...`, then the user's shell.
///
/// Blocks until the tmux client detaches or the session ends.
pub fn relaunch_in_tmux(
    session_name: &str,
    program: &Path,
    args: &[OsString],
) -> Result<ExitStatus, PanelError> {
    let tmux_path = which::which("tmux").map_err(|_| PanelError::TmuxNotFound)?;
    let mut command_line = shell_quote(&program.to_string_lossy());
    for arg in args {
        command_line.push(' ');
        command_line.push_str(&shell_quote(&arg.to_string_lossy()));
    }
    command_line.push_str(" && exec \"${SHELL:-sh}\"");
    info!("relaunching inside tmux (session={session_name})");
    let status = Command::new(tmux_path)
        .args(["new-session", "-s", session_name, &command_line])
        .status()?;
    Ok(status)
}

/// Quote `value` for a POSIX shell.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
