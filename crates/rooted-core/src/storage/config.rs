//! TOML-based application configuration.
//!
//! Stores:
//! - The AI endpoint, credentials and model names
//! - Assessment scoring options
//! - Breathing session defaults
//! - Storage retention
//!
//! Configuration is stored at `~/.config/rooted/config.toml`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::assessment::StressScoring;
use crate::breathing::ZeroPhasePolicy;
use crate::error::ConfigError;

/// Remote text/image generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Configured for completeness; nothing generates video.
    #[serde(default = "default_video_model")]
    pub video_model: String,
    /// Sent as the `customerId` header when non-empty.
    #[serde(default)]
    pub customer_id: String,
    /// Bearer token. `ROOTED_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentConfig {
    /// Score stress_4/stress_5 as 4 - x.
    #[serde(default)]
    pub reverse_positive_stress_items: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathingConfig {
    #[serde(default = "default_cycles")]
    pub default_cycles: u32,
    #[serde(default)]
    pub zero_phase: ZeroPhasePolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Keep only this many breathwork sessions. Unset keeps all.
    #[serde(default)]
    pub session_log_limit: Option<usize>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/rooted/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub assessment: AssessmentConfig,
    #[serde(default)]
    pub breathing: BreathingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

const SECRET_KEYS: [&str; 1] = ["ai.api_key"];
const REDACTED: &str = "[REDACTED]";

fn default_endpoint() -> String {
    "https://oi-server.onrender.com/chat/completions".into()
}
fn default_chat_model() -> String {
    "openrouter/anthropic/claude-sonnet-4".into()
}
fn default_image_model() -> String {
    "replicate/black-forest-labs/flux-1.1-pro".into()
}
fn default_video_model() -> String {
    "replicate/google/veo-3".into()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_cycles() -> u32 {
    5
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            chat_model: default_chat_model(),
            image_model: default_image_model(),
            video_model: default_video_model(),
            customer_id: String::new(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            default_cycles: default_cycles(),
            zero_phase: ZeroPhasePolicy::default(),
        }
    }
}

impl AiConfig {
    /// Effective bearer token, env override first.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var("ROOTED_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| Some(self.api_key.clone()).filter(|k| !k.is_empty()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn endpoint_url(&self) -> Result<url::Url, ConfigError> {
        let url = url::Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidValue {
            key: "ai.endpoint".into(),
            message: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidValue {
                key: "ai.endpoint".into(),
                message: format!("unsupported scheme '{other}'"),
            }),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(root: &mut Value, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let unknown = || ConfigError::UnknownKey(key.to_string());

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    // Clears an optional number or flag; required fields are
                    // rejected when the result is decoded back into `Config`.
                    Value::Bool(_) | Value::Number(_) if value == "null" => Value::Null,
                    Value::Bool(_) => Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    // Unset optional: take JSON if it parses, otherwise a string.
                    Value::Null => {
                        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.into()))
                    }
                    Value::Object(_) | Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    Value::String(_) => Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing a default file on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                tracing::info!(path = %path.display(), "wrote default config");
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Checks that cannot be expressed in the serde types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ai.endpoint_url()?;
        if self.ai.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ai.timeout_secs".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.breathing.default_cycles == 0 {
            return Err(ConfigError::InvalidValue {
                key: "breathing.default_cycles".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit
    /// the field. On error `self` is unchanged.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and save to the data directory.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// JSON view of the config with secrets replaced by `"[REDACTED]"`.
    pub fn redacted(&self) -> Result<Value, ConfigError> {
        let mut json = serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            key: String::new(),
            message: e.to_string(),
        })?;
        for key in SECRET_KEYS {
            let Some((section, field)) = key.split_once('.') else {
                continue;
            };
            if let Some(slot) = json.get_mut(section).and_then(|s| s.get_mut(field)) {
                if slot.as_str().is_some_and(|v| !v.is_empty()) {
                    *slot = Value::String(REDACTED.to_string());
                }
            }
        }
        Ok(json)
    }

    pub fn stress_scoring(&self) -> StressScoring {
        StressScoring::from_reverse_flag(self.assessment.reverse_positive_stress_items)
    }
}
