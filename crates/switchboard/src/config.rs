//! Bridge configuration loading from environment variables
//!
//! ## Environment Variables
//!
//! - `SWITCHBOARD_TOOL_TIMEOUT_SECS` - Default deadline for each tool call (default: 30, max: 300)
//! - `SWITCHBOARD_SCRIPT_TIMEOUT_SECS` - Time limit for each automation script (default: 20, max: 300,
//!   below the tool timeout while automation is enabled)
//! - `SWITCHBOARD_LOG_FORMAT` - `json` or `pretty` (default: json)
//! - `SWITCHBOARD_ENABLE_AUTOMATION` - Arm the maps tools against the automation host (default: true)

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_TOOL_TIMEOUT: &str = "SWITCHBOARD_TOOL_TIMEOUT_SECS";
pub const ENV_SCRIPT_TIMEOUT: &str = "SWITCHBOARD_SCRIPT_TIMEOUT_SECS";
pub const ENV_LOG_FORMAT: &str = "SWITCHBOARD_LOG_FORMAT";
pub const ENV_ENABLE_AUTOMATION: &str = "SWITCHBOARD_ENABLE_AUTOMATION";

const MAX_TIMEOUT_SECS: u64 = 300;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => Err(ConfigError::ValidationError(format!(
                "unknown log format '{value}', expected json or pretty"
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => f.write_str("json"),
            LogFormat::Pretty => f.write_str("pretty"),
        }
    }
}

/// Validated bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub tool_timeout: Duration,
    pub script_timeout: Duration,
    pub log_format: LogFormat,
    pub enable_automation: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            tool_timeout: Duration::from_secs(30),
            script_timeout: Duration::from_secs(20),
            log_format: LogFormat::Json,
            enable_automation: true,
        }
    }
}

impl fmt::Display for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tool timeout {}, script timeout {}, logs {}, automation {}",
            humantime::format_duration(self.tool_timeout),
            humantime::format_duration(self.script_timeout),
            self.log_format,
            if self.enable_automation { "on" } else { "off" }
        )
    }
}

/// Builder for [`BridgeConfig`] with environment variable support
#[derive(Debug, Clone)]
pub struct BridgeConfigBuilder {
    tool_timeout_secs: u64,
    script_timeout_secs: u64,
    log_format: LogFormat,
    enable_automation: bool,
}

impl Default for BridgeConfigBuilder {
    fn default() -> Self {
        let defaults = BridgeConfig::default();
        Self {
            tool_timeout_secs: defaults.tool_timeout.as_secs(),
            script_timeout_secs: defaults.script_timeout.as_secs(),
            log_format: defaults.log_format,
            enable_automation: defaults.enable_automation,
        }
    }
}

impl BridgeConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::default();

        if let Some(secs) = get_u64(&lookup, ENV_TOOL_TIMEOUT)? {
            builder = builder.tool_timeout_secs(secs);
        }
        if let Some(secs) = get_u64(&lookup, ENV_SCRIPT_TIMEOUT)? {
            builder = builder.script_timeout_secs(secs);
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            let format =
                format
                    .parse::<LogFormat>()
                    .map_err(|err| ConfigError::InvalidEnvVar {
                        key: ENV_LOG_FORMAT.to_string(),
                        message: err.to_string(),
                    })?;
            builder = builder.log_format(format);
        }
        if let Some(enabled) = get_bool(&lookup, ENV_ENABLE_AUTOMATION)? {
            builder = builder.enable_automation(enabled);
        }

        Ok(builder)
    }

    #[must_use]
    pub fn tool_timeout_secs(mut self, secs: u64) -> Self {
        self.tool_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn script_timeout_secs(mut self, secs: u64) -> Self {
        self.script_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    #[must_use]
    pub fn enable_automation(mut self, enabled: bool) -> Self {
        self.enable_automation = enabled;
        self
    }

    /// Validate configuration and build [`BridgeConfig`]
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if a timeout is out of range, or
    /// if automation is enabled and the script limit is not shorter than the
    /// tool deadline.
    pub fn build(self) -> Result<BridgeConfig, ConfigError> {
        self.validate()?;

        Ok(BridgeConfig {
            tool_timeout: Duration::from_secs(self.tool_timeout_secs),
            script_timeout: Duration::from_secs(self.script_timeout_secs),
            log_format: self.log_format,
            enable_automation: self.enable_automation,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, secs) in [
            ("tool_timeout_secs", self.tool_timeout_secs),
            ("script_timeout_secs", self.script_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{field} must be greater than 0"
                )));
            }
            if secs > MAX_TIMEOUT_SECS {
                return Err(ConfigError::ValidationError(format!(
                    "{field} must be <= {MAX_TIMEOUT_SECS} (5 minutes)"
                )));
            }
        }
        // Scripts must hit their own limit before the call deadline fires.
        if self.enable_automation && self.script_timeout_secs >= self.tool_timeout_secs {
            return Err(ConfigError::ValidationError(format!(
                "script_timeout_secs ({}) must be less than tool_timeout_secs ({})",
                self.script_timeout_secs, self.tool_timeout_secs
            )));
        }
        Ok(())
    }
}

fn get_bool<F>(lookup: &F, key: &str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!(
                    "invalid boolean value '{val}', expected true/false/1/0/yes/no/on/off"
                ),
            }),
        },
        None => Ok(None),
    }
}

fn get_u64<F>(lookup: &F, key: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!("invalid u64 value '{val}': {e}"),
            }),
        None => Ok(None),
    }
}
