//! Configuration schema for chatpane.

use chatpane_transcript::ArchiveOrder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root config for the chatpane binary.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ChatpaneConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub autosave: AutosaveConfig,
    #[serde(default)]
    pub panel: PanelConfig,
    /// Extra question bank entries, keyed by trigger phrase.
    #[serde(default)]
    pub questions: BTreeMap<String, String>,
}

impl ChatpaneConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> ChatpaneConfigBuilder {
        ChatpaneConfigBuilder::new()
    }
}

/// Builder for assembling a `ChatpaneConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct ChatpaneConfigBuilder {
    config: ChatpaneConfig,
}

impl ChatpaneConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: ChatpaneConfig::default(),
        }
    }

    /// Replace the archive configuration.
    pub fn archive(mut self, archive: ArchiveConfig) -> Self {
        self.config.archive = archive;
        self
    }

    /// Replace the autosave configuration.
    pub fn autosave(mut self, autosave: AutosaveConfig) -> Self {
        self.config.autosave = autosave;
        self
    }

    /// Replace the panel configuration.
    pub fn panel(mut self, panel: PanelConfig) -> Self {
        self.config.panel = panel;
        self
    }

    /// Add one question bank entry.
    pub fn question(mut self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.config.questions.insert(question.into(), answer.into());
        self
    }

    /// Finalize and return the built `ChatpaneConfig`.
    pub fn build(self) -> ChatpaneConfig {
        self.config
    }
}

/// Where transcripts are archived and how the archive is numbered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
    #[serde(default = "default_archive_path")]
    pub path: String,
    #[serde(default)]
    pub order: ArchiveOrder,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            path: default_archive_path(),
            order: ArchiveOrder::default(),
        }
    }
}

fn default_archive_path() -> String {
    "conversations".to_string()
}

/// Background autosave settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AutosaveConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_autosave_interval_ms")]
    pub interval_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: default_autosave_interval_ms(),
        }
    }
}

fn default_autosave_interval_ms() -> u64 {
    1000
}

/// tmux answer panel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_session_name")]
    pub session_name: String,
    #[serde(default = "default_target_pane")]
    pub target_pane: String,
    #[serde(default = "default_temp_file")]
    pub temp_file: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            session_name: default_session_name(),
            target_pane: default_target_pane(),
            temp_file: default_temp_file(),
        }
    }
}

fn default_session_name() -> String {
    "chatpane_session".to_string()
}

fn default_target_pane() -> String {
    "1".to_string()
}

fn default_temp_file() -> String {
    std::env::temp_dir()
        .join("chatpane_answer.txt")
        .to_string_lossy()
        .to_string()
}

fn default_true() -> bool {
    true
}
