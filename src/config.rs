use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub voice: VoiceSettings,
    #[serde(default)]
    pub pool: PoolSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Remote voice-processing service settings.
///
/// The credential is optional: when absent the remote transcription path is
/// skipped entirely and only local recognition is used.
#[derive(Clone, Deserialize)]
pub struct VoiceSettings {
    #[serde(default = "default_voice_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    /// Max seconds to wait for a transcription cycle before abandoning it.
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,
}

impl fmt::Debug for VoiceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceSettings")
            .field("endpoint", &self.endpoint)
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("language", &self.language)
            .field("max_wait_secs", &self.max_wait_secs)
            .finish()
    }
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            endpoint: default_voice_endpoint(),
            api_key: None,
            language: default_language(),
            max_wait_secs: default_max_wait_secs(),
        }
    }
}

fn default_voice_endpoint() -> String {
    "https://api.omnidim.io/v1".to_string()
}
fn default_language() -> String {
    "en-US".to_string()
}
fn default_max_wait_secs() -> u64 {
    30
}

/// Candidate pool settings
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PoolSettings {
    /// JSON file with the candidate/room pool. Falls back to the built-in
    /// seed pool when unset or unreadable.
    #[serde(default)]
    pub file: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_sleep_weight")]
    pub sleep: f64,
    #[serde(default = "default_cleanliness_weight")]
    pub cleanliness: f64,
    #[serde(default = "default_noise_weight")]
    pub noise: f64,
    #[serde(default = "default_social_weight")]
    pub social: f64,
    #[serde(default = "default_values_weight")]
    pub values: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            sleep: default_sleep_weight(),
            cleanliness: default_cleanliness_weight(),
            noise: default_noise_weight(),
            social: default_social_weight(),
            values: default_values_weight(),
        }
    }
}

fn default_sleep_weight() -> f64 { 0.25 }
fn default_cleanliness_weight() -> f64 { 0.25 }
fn default_noise_weight() -> f64 { 0.20 }
fn default_social_weight() -> f64 { 0.15 }
fn default_values_weight() -> f64 { 0.15 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ROOMIE_)
    ///    e.g., ROOMIE_VOICE__API_KEY -> voice.api_key
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("ROOMIE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("ROOMIE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
