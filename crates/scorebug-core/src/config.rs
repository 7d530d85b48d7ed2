//! Configuration loading and typed config structures for the Scorebug engine.
//!
//! The canonical configuration lives in `scorebug-config.yaml` in the working
//! directory. Every section and every field has a default, so an empty or
//! partial file is valid and a missing file means "all defaults".

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `scorebug-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Match clock settings.
    #[serde(default)]
    pub clock: ClockConfig,

    /// Overlay and flash durations.
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Files read and written by the engine.
    #[serde(default)]
    pub paths: PathsConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `SCOREBUG_PORT` overrides `observer.port`
    /// - `SCOREBUG_STATE_FILE` overrides `paths.state_file`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply env overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Override selected values with environment variables when set.
    ///
    /// An unparseable `SCOREBUG_PORT` is ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SCOREBUG_PORT") {
            match val.trim().parse::<u16>() {
                Ok(port) => self.observer.port = port,
                Err(e) => tracing::warn!(value = %val, error = %e, "Ignoring invalid SCOREBUG_PORT"),
            }
        }
        if let Ok(val) = std::env::var("SCOREBUG_STATE_FILE") {
            if !val.trim().is_empty() {
                self.paths.state_file = PathBuf::from(val);
            }
        }
    }
}

/// Match clock configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClockConfig {
    /// Milliseconds between clock ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Minute at which the first half auto-pauses.
    #[serde(default = "default_first_half_end_minutes")]
    pub first_half_end_minutes: u32,

    /// Minute at which the second half auto-pauses.
    #[serde(default = "default_second_half_end_minutes")]
    pub second_half_end_minutes: u32,

    /// Largest accepted added-time value.
    #[serde(default = "default_max_added_minutes")]
    pub max_added_minutes: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            first_half_end_minutes: default_first_half_end_minutes(),
            second_half_end_minutes: default_second_half_end_minutes(),
            max_added_minutes: default_max_added_minutes(),
        }
    }
}

/// Durations of the transient overlays and indicators, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OverlayConfig {
    /// How long a GOAL overlay stays up.
    #[serde(default = "default_event_duration_ms")]
    pub goal_duration_ms: u64,

    /// How long a CARD overlay stays up.
    #[serde(default = "default_event_duration_ms")]
    pub card_duration_ms: u64,

    /// How long a SUB overlay stays up.
    #[serde(default = "default_event_duration_ms")]
    pub sub_duration_ms: u64,

    /// How long a STATS overlay stays up.
    #[serde(default = "default_stats_duration_ms")]
    pub stats_duration_ms: u64,

    /// How long the flash indicator pulses after a card.
    #[serde(default = "default_flash_duration_ms")]
    pub flash_duration_ms: u64,

    /// Delay between a goal command and its overlay.
    #[serde(default = "default_goal_grace_ms")]
    pub goal_grace_ms: u64,

    /// How long an operator notice stays visible.
    #[serde(default = "default_notice_duration_ms")]
    pub notice_duration_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            goal_duration_ms: default_event_duration_ms(),
            card_duration_ms: default_event_duration_ms(),
            sub_duration_ms: default_event_duration_ms(),
            stats_duration_ms: default_stats_duration_ms(),
            flash_duration_ms: default_flash_duration_ms(),
            goal_grace_ms: default_goal_grace_ms(),
            notice_duration_ms: default_notice_duration_ms(),
        }
    }
}

/// Files read and written by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PathsConfig {
    /// Persisted match record (JSON).
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Rendered overlay document (HTML).
    #[serde(default = "default_document_file")]
    pub document_file: PathBuf,

    /// Compact state record polled by the renderer (JSON).
    #[serde(default = "default_record_file")]
    pub record_file: PathBuf,

    /// Team and player directory (YAML).
    #[serde(default = "default_roster_file")]
    pub roster_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            document_file: default_document_file(),
            record_file: default_record_file(),
            roster_file: default_roster_file(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// First port tried.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of consecutive ports tried before giving up.
    #[serde(default = "default_port_attempts")]
    pub port_attempts: u16,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            port_attempts: default_port_attempts(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_tick_interval_ms() -> u64 {
    300
}

const fn default_first_half_end_minutes() -> u32 {
    45
}

const fn default_second_half_end_minutes() -> u32 {
    90
}

const fn default_max_added_minutes() -> u32 {
    15
}

const fn default_event_duration_ms() -> u64 {
    5500
}

const fn default_stats_duration_ms() -> u64 {
    7000
}

const fn default_flash_duration_ms() -> u64 {
    3000
}

const fn default_goal_grace_ms() -> u64 {
    1200
}

const fn default_notice_duration_ms() -> u64 {
    3000
}

fn default_state_file() -> PathBuf {
    PathBuf::from("config.json")
}

fn default_document_file() -> PathBuf {
    PathBuf::from("TXT/salida.html")
}

fn default_record_file() -> PathBuf {
    PathBuf::from("TXT/estado.json")
}

fn default_roster_file() -> PathBuf {
    PathBuf::from("roster.yaml")
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    3333
}

const fn default_port_attempts() -> u16 {
    10
}

fn default_log_level() -> String {
    String::from("info")
}
