//! Semantic validation for decoded configs.

use crate::{ChatpaneConfig, ConfigError};

pub(super) fn validate_config(config: &ChatpaneConfig) -> Result<(), ConfigError> {
    if config.archive.path.trim().is_empty() {
        return Err(invalid("archive.path", "must not be empty"));
    }
    if config.autosave.interval_ms == 0 {
        return Err(invalid("autosave.interval_ms", "must be greater than zero"));
    }
    if config.panel.session_name.trim().is_empty() {
        return Err(invalid("panel.session_name", "must not be empty"));
    }
    if config.panel.target_pane.trim().is_empty() {
        return Err(invalid("panel.target_pane", "must not be empty"));
    }
    if let Some(question) = config.questions.keys().find(|q| q.trim().is_empty()) {
        return Err(invalid(
            "questions",
            &format!("empty question key {question:?}"),
        ));
    }
    Ok(())
}

fn invalid(path: &str, message: &str) -> ConfigError {
    ConfigError::InvalidField {
        path: path.to_string(),
        message: message.to_string(),
    }
}
