//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Environment variable prefix, e.g. `TTS_SYNC__OBSERVER__BOT_TTS_ENABLED=false`
pub const ENV_PREFIX: &str = "TTS_SYNC";

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    /// Protocol observer feature flags
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Timestamp accumulator behavior
    #[serde(default)]
    pub timestamps: TimestampConfig,

    /// In-process frame bus
    #[serde(default)]
    pub bus: BusConfig,

    /// Outbound client message queue
    #[serde(default)]
    pub transport: TransportConfig,

    /// Logging
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Protocol observer feature flags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObserverConfig {
    /// Forward timestamped TTS text to the client as `bot-tts-text`
    #[serde(default = "default_true")]
    pub bot_tts_enabled: bool,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            bot_tts_enabled: true,
        }
    }
}

/// How a new utterance anchor relates to the previous utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPolicy {
    /// The caller guarantees time advances between utterances (e.g. by
    /// waiting for playback); `start` never fails
    #[default]
    CallerContract,
    /// `start` fails unless the clock has moved past the last timestamp
    /// recorded in the previous utterance
    Enforced,
}

/// Timestamp accumulator configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TimestampConfig {
    #[serde(default)]
    pub anchor_policy: AnchorPolicy,
}

/// Frame bus configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BusConfig {
    /// Capacity of the event channel feeding the bus task
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    64
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Client transport configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransportConfig {
    /// Capacity of the queue of serialized messages awaiting the client
    #[serde(default = "default_outbound_capacity")]
    pub outbound_capacity: usize,
}

fn default_outbound_capacity() -> usize {
    256
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            outbound_capacity: default_outbound_capacity(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservabilityConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON
    #[serde(default)]
    pub json_logs: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bus.channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "bus.channel_capacity".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.transport.outbound_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "transport.outbound_capacity".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        let level = self.observability.log_level.to_ascii_lowercase();
        if !LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "observability.log_level".to_string(),
                message: format!(
                    "Expected one of {:?}, got '{}'",
                    LEVELS, self.observability.log_level
                ),
            });
        }

        Ok(())
    }
}

/// Load settings from `config/` and the environment
///
/// Priority: env vars > config/{env} > config/default > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from a specific config directory and the environment
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(
        File::with_name(&dir.join("default").to_string_lossy()).required(false),
    );

    if let Some(env_name) = env {
        builder = builder
            .add_source(File::with_name(&dir.join(env_name).to_string_lossy()).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;

    tracing::debug!(
        dir = %dir.display(),
        env = env.unwrap_or("default"),
        "Settings loaded"
    );

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.observer.bot_tts_enabled);
        assert_eq!(settings.timestamps.anchor_policy, AnchorPolicy::CallerContract);
        assert_eq!(settings.bus.channel_capacity, 64);
        assert_eq!(settings.transport.outbound_capacity, 256);
        assert_eq!(settings.observability.log_level, "info");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut settings = Settings::default();
        settings.bus.channel_capacity = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "bus.channel_capacity"
        ));

        let mut settings = Settings::default();
        settings.transport.outbound_capacity = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "transport.outbound_capacity"
        ));

        let mut settings = Settings::default();
        settings.observability.log_level = "loud".into();
        assert!(settings.validate().is_err());

        settings.observability.log_level = "DEBUG".into();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_environment_file_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
[observer]
bot_tts_enabled = false

[bus]
channel_capacity = 16

[transport]
outbound_capacity = 32
"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("strict.toml"),
            r#"
[timestamps]
anchor_policy = "enforced"

[bus]
channel_capacity = 8
"#,
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), None).unwrap();
        assert!(!settings.observer.bot_tts_enabled);
        assert_eq!(settings.bus.channel_capacity, 16);
        assert_eq!(settings.transport.outbound_capacity, 32);
        assert_eq!(settings.timestamps.anchor_policy, AnchorPolicy::CallerContract);

        let settings = load_settings_from(dir.path(), Some("strict")).unwrap();
        assert!(!settings.observer.bot_tts_enabled);
        assert_eq!(settings.bus.channel_capacity, 8);
        assert_eq!(settings.timestamps.anchor_policy, AnchorPolicy::Enforced);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[bus]\nchannel_capacity = 0\n",
        )
        .unwrap();
        assert!(load_settings_from(dir.path(), None).is_err());
    }

    #[test]
    fn test_settings_round_trip_through_toml() {
        let mut settings = Settings::default();
        settings.timestamps.anchor_policy = AnchorPolicy::Enforced;
        let text = toml::to_string(&settings).unwrap();
        assert!(text.contains("anchor_policy = \"enforced\""));
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
