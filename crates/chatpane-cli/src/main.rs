//! Terminal chatbot with tmux answer panes and plain-text transcripts.

mod console;

use anyhow::Context;
use chatpane_config::{ChatpaneConfig, LayeredConfigOptions, PanelConfig};
use chatpane_core::{QuestionBank, Session};
use chatpane_panel::{
    NoopPanel, Panel, TmuxPanel, TmuxSettings, inside_tmux, relaunch_in_tmux, tmux_available,
};
use chatpane_transcript::{Archive, TranscriptStore, spawn_autosave};
use clap::Parser;
use console::StdConsole;
use log::{debug, info, warn};
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Command-line options for the chatpane binary.
#[derive(Debug, Parser)]
#[command(name = "chatpane", version)]
struct Cli {
    /// Optional path to a chatpane.json5 config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding saved conversations
    #[arg(long)]
    archive_dir: Option<PathBuf>,
    /// Print answers inline instead of opening a tmux pane
    #[arg(long)]
    no_panel: bool,
    /// Autosave interval in milliseconds
    #[arg(long)]
    autosave_interval_ms: Option<u64>,
}

/// Entry point for the chatpane binary.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    info!(
        "starting chatpane (config_set={}, archive_dir_set={}, no_panel={})",
        cli.config.is_some(),
        cli.archive_dir.is_some(),
        cli.no_panel
    );
    let config = load_config(&cli)?;

    if config.panel.enabled && !inside_tmux() && tmux_available() {
        let program = std::env::current_exe().context("failed to resolve current executable")?;
        let args: Vec<OsString> = std::env::args_os().skip(1).collect();
        match relaunch_in_tmux(&config.panel.session_name, &program, &args) {
            Ok(status) if status.success() => {
                info!("tmux session finished");
                return Ok(());
            }
            Ok(status) => warn!("tmux session failed (status={status}); continuing inline"),
            Err(err) => warn!("failed to start tmux session: {err}; continuing inline"),
        }
    }

    let archive = Archive::new(&config.archive.path, config.archive.order);
    let store = Arc::new(TranscriptStore::new(archive).context("failed to open archive")?);

    let mut bank = QuestionBank::with_defaults();
    for (question, answer) in &config.questions {
        bank.add_question(question, answer.clone());
    }
    debug!("question bank ready (entries={})", bank.len());

    let autosave = config.autosave.enabled.then(|| {
        spawn_autosave(
            store.clone(),
            Duration::from_millis(config.autosave.interval_ms),
        )
    });

    let mut session = Session::new(store, bank, build_panel(&config.panel));
    let mut console = StdConsole::new();
    let result = session.run(&mut console).await;

    if let Some(handle) = autosave {
        handle.stop().await;
    }
    result.context("chat session failed")?;
    Ok(())
}

/// Load the config file(s) and apply command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<ChatpaneConfig> {
    let cwd = std::env::current_dir().context("cwd")?;
    load_config_with(cli, LayeredConfigOptions::new(&cwd))
}

/// Layered load where `--config` is the last, highest-precedence layer.
fn load_config_with(
    cli: &Cli,
    mut options: LayeredConfigOptions,
) -> anyhow::Result<ChatpaneConfig> {
    if let Some(path) = cli.config.as_ref() {
        info!("adding runtime config layer: {}", path.display());
        options = options.with_runtime_path(path);
    }
    info!("loading layered config from cwd: {}", options.cwd.display());
    let layered =
        ChatpaneConfig::load_layered_with_options(options).context("failed to load config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    let mut config = layered.config;
    apply_overrides(&mut config, cli);
    config.validate().context("invalid config")?;
    Ok(config)
}

fn apply_overrides(config: &mut ChatpaneConfig, cli: &Cli) {
    if let Some(dir) = cli.archive_dir.as_ref() {
        config.archive.path = dir.to_string_lossy().to_string();
    }
    if cli.no_panel {
        config.panel.enabled = false;
    }
    if let Some(interval_ms) = cli.autosave_interval_ms {
        config.autosave.interval_ms = interval_ms;
    }
}

/// tmux panel when enabled and usable, otherwise a panel that prints inline.
fn build_panel(config: &PanelConfig) -> Box<dyn Panel> {
    if !config.enabled {
        info!("answer panel disabled");
        return Box::new(NoopPanel::new());
    }
    if !inside_tmux() {
        warn!("not running inside tmux; answers print inline");
        return Box::new(NoopPanel::new());
    }
    let settings = TmuxSettings {
        session_name: config.session_name.clone(),
        target_pane: config.target_pane.clone(),
        temp_file: PathBuf::from(&config.temp_file),
    };
    match TmuxPanel::new(settings) {
        Ok(panel) => Box::new(panel),
        Err(err) => {
            warn!("tmux panel unavailable: {err}");
            Box::new(NoopPanel::new())
        }
    }
}
