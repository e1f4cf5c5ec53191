//! Game and oracle configuration.

use crate::games::omok::{BOARD_SIZE, GameMode, Rules, WIN_LENGTH};
use crate::llm_client::{LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct OmokConfig {
    /// Board and mode.
    #[serde(default)]
    game: GameSettings,

    /// Move oracle.
    #[serde(default)]
    oracle: OracleSettings,
}

/// Board geometry and starting mode.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameSettings {
    /// Board side length.
    #[serde(default = "default_board_size")]
    board_size: usize,

    /// Run length needed to win.
    #[serde(default = "default_win_length")]
    win_length: usize,

    /// Mode used when the game starts.
    #[serde(default)]
    mode: GameMode,
}

/// How the move oracle is reached and how long it may take.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct OracleSettings {
    /// LLM provider (gemini or anthropic).
    #[serde(default = "default_provider")]
    provider: LlmProvider,

    /// Model name.
    #[serde(default = "default_model")]
    model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,

    /// Seconds before an oracle request counts as failed.
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,

    /// Pause before each request, so the thinking state is visible.
    #[serde(default = "default_think_delay_ms")]
    think_delay_ms: u64,

    /// Automatic re-requests after a failed oracle turn.
    #[serde(default = "default_max_retries")]
    max_retries: u32,
}

fn default_board_size() -> usize {
    BOARD_SIZE
}

fn default_win_length() -> usize {
    WIN_LENGTH
}

fn default_provider() -> LlmProvider {
    LlmProvider::Gemini
}

fn default_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_think_delay_ms() -> u64 {
    800
}

fn default_max_retries() -> u32 {
    1
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            board_size: default_board_size(),
            win_length: default_win_length(),
            mode: GameMode::default(),
        }
    }
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            think_delay_ms: default_think_delay_ms(),
            max_retries: default_max_retries(),
        }
    }
}

impl OracleSettings {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Pause before a request is sent.
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }

    /// Returns these settings with a different retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Returns these settings with a different think delay.
    pub fn with_think_delay_ms(mut self, think_delay_ms: u64) -> Self {
        self.think_delay_ms = think_delay_ms;
        self
    }

    /// Returns these settings with a different timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl OmokConfig {
    /// Loads and validates configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        info!(
            board_size = config.game.board_size,
            provider = ?config.oracle.provider,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Writes this configuration as TOML.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path.as_ref(), content)
            .map_err(|e| ConfigError::new(format!("Failed to write config file: {}", e)))?;
        info!("Config written");
        Ok(())
    }

    /// Checks board geometry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let board_size = self.game.board_size;
        let win_length = self.game.win_length;
        if board_size == 0 {
            return Err(ConfigError::new("board_size must be at least 1".to_string()));
        }
        if win_length < 2 || win_length > board_size {
            return Err(ConfigError::new(format!(
                "win_length must be between 2 and board_size ({}), got {}",
                board_size, win_length
            )));
        }
        Ok(())
    }

    /// Board size and win length for a new game.
    pub fn rules(&self) -> Rules {
        Rules::new(self.game.board_size, self.game.win_length)
    }

    /// Returns this configuration with a different starting mode.
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.game.mode = mode;
        self
    }

    /// Creates LLM configuration for the oracle.
    ///
    /// The API key comes from the provider's environment variable;
    /// Gemini also accepts `API_KEY`.
    #[instrument(skip(self), fields(provider = ?self.oracle.provider, model = %self.oracle.model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");
        let provider = self.oracle.provider;
        let var = provider.api_key_var();

        let api_key = std::env::var(var)
            .or_else(|err| match provider {
                LlmProvider::Gemini => std::env::var("API_KEY"),
                _ => Err(err),
            })
            .map_err(|_| ConfigError::new(format!("{} environment variable not set", var)))?;

        Ok(LlmConfig::new(
            provider,
            api_key,
            self.oracle.model.clone(),
            self.oracle.max_tokens,
        ))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
