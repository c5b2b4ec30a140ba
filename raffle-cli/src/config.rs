use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use tracing::Level;

use raffle_core::{DEFAULT_TIMESTAMP_FORMAT, DrawTimings};
use raffle_persistence::connection::{DEFAULT_STATE_FILE, STATE_FILE_ENV};

pub const PARTICIPANTS_FILE_ENV: &str = "RAFFLE_PARTICIPANTS_FILE";
pub const OUTPUT_ENV: &str = "RAFFLE_OUTPUT";
pub const TIMESTAMP_FORMAT_ENV: &str = "RAFFLE_TIMESTAMP_FORMAT";
pub const LOG_LEVEL_ENV: &str = "RAFFLE_LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json, // One DisplayUpdate per line
}

impl FromStr for OutputMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputMode::Text),
            "json" => Ok(OutputMode::Json),
            other => bail!("expected 'text' or 'json', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub state_file: PathBuf,
    pub participants_file: Option<PathBuf>,
    pub output: OutputMode,
    pub timestamp_format: String,
    pub log_level: Level,
    pub timings: DrawTimings,
}

impl Config {
    pub fn new() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any variable source. Unset variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let output = match lookup(OUTPUT_ENV) {
            Some(value) => value
                .parse::<OutputMode>()
                .with_context(|| format!("Invalid {}", OUTPUT_ENV))?,
            None => defaults.output,
        };
        let log_level = match lookup(LOG_LEVEL_ENV) {
            Some(value) => value
                .trim()
                .parse::<Level>()
                .with_context(|| format!("Invalid {} '{}'", LOG_LEVEL_ENV, value))?,
            None => defaults.log_level,
        };

        Ok(Self {
            state_file: lookup(STATE_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.state_file),
            participants_file: lookup(PARTICIPANTS_FILE_ENV)
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            output,
            // An invalid format is replaced when the raffle is built
            timestamp_format: lookup(TIMESTAMP_FORMAT_ENV).unwrap_or(defaults.timestamp_format),
            log_level,
            timings: defaults.timings,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            participants_file: None,
            output: OutputMode::Text,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            log_level: Level::INFO,
            timings: DrawTimings::default(),
        }
    }
}
