use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{ReaderError, ReaderResult};
use crate::logging::LoggingConfig;

/// Config file picked up from the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "chonker-reader.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub viewer: ViewerConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// 1-based page shown after a document loads (clamped to the page count)
    pub start_page: usize,

    /// Width of the extracted-text panel, percent of the screen
    pub text_panel_percent: u16,

    /// Width of the chat panel, percent of the screen
    pub chat_panel_percent: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Delay before the assistant reply lands
    pub reply_delay_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            start_page: 1,
            text_panel_percent: 30,
            chat_panel_percent: 30,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: 1000,
        }
    }
}

impl ChatConfig {
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}

impl ReaderConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ReaderResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ReaderError::file_io(path.as_ref().display().to_string(), e))?;

        let config: ReaderConfig = toml::from_str(&content).map_err(|e| {
            ReaderError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// File config when present, then environment overrides on top
    pub fn load(path: Option<&Path>) -> ReaderResult<Self> {
        let base = match path {
            Some(path) => Self::load_from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(delay) = std::env::var("CHONKER_READER_REPLY_DELAY_MS") {
            if let Ok(value) = delay.parse::<u64>() {
                self.chat.reply_delay_ms = value;
            }
        }

        if let Ok(level) = std::env::var("CHONKER_READER_LOG_LEVEL") {
            if !level.trim().is_empty() {
                self.logging.level = level.trim().to_lowercase();
            }
        }

        if let Ok(page) = std::env::var("CHONKER_READER_START_PAGE") {
            if let Ok(value) = page.parse::<usize>() {
                if value > 0 {
                    self.viewer.start_page = value;
                }
            }
        }

        self
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ReaderResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            ReaderError::configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| ReaderError::file_io(path.as_ref().display().to_string(), e))?;

        Ok(())
    }

    pub fn validate(&self) -> ReaderResult<()> {
        if self.viewer.start_page == 0 {
            return Err(ReaderError::configuration("viewer.start_page is 1-based"));
        }
        let panels = self.viewer.text_panel_percent + self.viewer.chat_panel_percent;
        if panels >= 90 {
            return Err(ReaderError::configuration(format!(
                "side panels take {}% of the screen, leave room for the page",
                panels
            )));
        }
        Ok(())
    }
}
