//! Client configuration read from the environment.
//!
//! Recognized variables (a `.env` file is loaded by the binaries first):
//! - `OKINAWA_API_URL`: streaming chat endpoint; unset runs the offline assistant
//! - `OKINAWA_MAX_STEPS`: backend round-trips per user turn (1..=20, default 5)
//! - `OKINAWA_PRESETS`: `|`-separated preset prompts
//! - `OKINAWA_LOG_FILE`: write logs to this file instead of stderr

use crate::session::DEFAULT_MAX_STEPS;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

pub const MAX_STEPS_LIMIT: u32 = 20;

/// Built-in preset prompts shown as quick picks
pub const DEFAULT_PRESETS: &[&str] = &[
    "What's the weather in Naha today?",
    "Show me my trip notes",
    "Best beaches near Onna village?",
    "A rainy day plan for Okinawa",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    pub api_url: Option<Url>,
    pub max_steps: u32,
    pub presets: Vec<String>,
    pub log_file: Option<PathBuf>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            max_steps: DEFAULT_MAX_STEPS,
            presets: DEFAULT_PRESETS.iter().map(|p| p.to_string()).collect(),
            log_file: None,
        }
    }
}

impl ChatConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(raw) = get("OKINAWA_API_URL") {
            let url = Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
                name: "OKINAWA_API_URL",
                reason: e.to_string(),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid {
                    name: "OKINAWA_API_URL",
                    reason: format!("expected an http(s) URL, got {}", url.scheme()),
                });
            }
            config.api_url = Some(url);
        }

        if let Some(raw) = get("OKINAWA_MAX_STEPS") {
            let steps: u32 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "OKINAWA_MAX_STEPS",
                reason: format!("not a number: {}", raw),
            })?;
            if !(1..=MAX_STEPS_LIMIT).contains(&steps) {
                return Err(ConfigError::Invalid {
                    name: "OKINAWA_MAX_STEPS",
                    reason: format!("must be between 1 and {}", MAX_STEPS_LIMIT),
                });
            }
            config.max_steps = steps;
        }

        if let Some(raw) = get("OKINAWA_PRESETS") {
            let presets: Vec<String> = raw
                .split('|')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            if !presets.is_empty() {
                config.presets = presets;
            }
        }

        config.log_file = get("OKINAWA_LOG_FILE").map(PathBuf::from);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ChatConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.max_steps, 5);
        assert!(config.api_url.is_none());
        assert_eq!(config.presets.len(), DEFAULT_PRESETS.len());
    }

    #[test]
    fn test_overrides() {
        let config = ChatConfig::from_lookup(lookup(&[
            ("OKINAWA_API_URL", "https://okinawa.example/api/use-chat"),
            ("OKINAWA_MAX_STEPS", "3"),
            ("OKINAWA_PRESETS", "Weather? | | Notes?"),
            ("OKINAWA_LOG_FILE", "/tmp/okinawa.log"),
        ]))
        .unwrap();
        assert_eq!(config.api_url.unwrap().host_str(), Some("okinawa.example"));
        assert_eq!(config.max_steps, 3);
        assert_eq!(config.presets, vec!["Weather?", "Notes?"]);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/okinawa.log")));
    }

    #[test]
    fn test_invalid_values() {
        assert!(ChatConfig::from_lookup(lookup(&[("OKINAWA_MAX_STEPS", "0")])).is_err());
        assert!(ChatConfig::from_lookup(lookup(&[("OKINAWA_MAX_STEPS", "lots")])).is_err());
        assert!(ChatConfig::from_lookup(lookup(&[("OKINAWA_API_URL", "not a url")])).is_err());
        assert!(ChatConfig::from_lookup(lookup(&[("OKINAWA_API_URL", "file:///etc/passwd")])).is_err());
    }
}
