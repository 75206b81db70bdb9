//! Quiz generation and extraction settings, optionally loaded from TOML.
//!
//! ```toml
//! topic = "Git branching"
//! question_count = 10
//!
//! [extractor]
//! options_per_question = 4
//! free_text_fallback = true
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_TOPIC: &str =
    "Git (Introduction, add, commit, stash, branch, merge, push, pull, pull requests)";
pub const DEFAULT_QUESTION_COUNT: u32 = 20;
pub const DEFAULT_OPTIONS_PER_QUESTION: usize = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Exact option count required of structured elements.
    pub options_per_question: usize,
    /// Try the enumerated-text parser when no structured element survives.
    pub free_text_fallback: bool,
    /// Max characters of raw model output echoed into log lines.
    pub log_preview_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            options_per_question: DEFAULT_OPTIONS_PER_QUESTION,
            free_text_fallback: true,
            log_preview_chars: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    pub topic: String,
    pub question_count: u32,
    pub extractor: ExtractorConfig,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            question_count: DEFAULT_QUESTION_COUNT,
            extractor: ExtractorConfig::default(),
        }
    }
}

impl QuizConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: QuizConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::info!("loaded quiz config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.topic.trim().is_empty() {
            return Err(ConfigError::Invalid("topic is empty".to_string()));
        }
        if self.question_count == 0 {
            return Err(ConfigError::Invalid("question_count must be at least 1".to_string()));
        }
        if !(2..=26).contains(&self.extractor.options_per_question) {
            return Err(ConfigError::Invalid(format!(
                "options_per_question must be between 2 and 26, got {}",
                self.extractor.options_per_question
            )));
        }
        Ok(())
    }
}
