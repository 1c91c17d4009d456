use std::env;
use thiserror::Error;

/// Prefix used when `COMMAND_PREFIX` is not set
pub const DEFAULT_PREFIX: &str = ".";

/// yt-dlp executable used when `YTDLP_PATH` is not set
pub const DEFAULT_YTDLP: &str = "yt-dlp";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    MissingVar(&'static str),
}

/// Settings read from the environment (and `.env`) at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub command_prefix: String,
    pub ytdlp_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            discord_token: non_empty("DISCORD_TOKEN").ok_or(ConfigError::MissingVar("DISCORD_TOKEN"))?,
            command_prefix: non_empty("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            ytdlp_path: non_empty("YTDLP_PATH").unwrap_or_else(|| DEFAULT_YTDLP.to_string()),
        })
    }
}
