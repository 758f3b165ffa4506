//! Runtime configuration from environment variables (optionally loaded from `.env`).

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::completion::Sampling;

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai";
const DEFAULT_MODEL: &str = "llama3-8b-8192";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Completion endpoint settings. The credential stays on the server.
#[derive(Clone)]
pub struct CompletionConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    /// Minimum spacing between outgoing requests.
    pub min_interval: Duration,
    pub chat: Sampling,
    pub translate: Sampling,
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("min_interval", &self.min_interval)
            .field("chat", &self.chat)
            .field("translate", &self.translate)
            .finish()
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            timeout: Duration::from_secs(30),
            min_interval: Duration::from_millis(100),
            chat: Sampling {
                temperature: 0.7,
                max_tokens: 500,
            },
            translate: Sampling {
                temperature: 0.3,
                max_tokens: 500,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub completion: CompletionConfig,
    /// Command used for speech playback.
    pub speech_command: String,
    /// Speak the Sanskrit part of each chat reply automatically.
    pub autoplay: bool,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            completion: CompletionConfig::default(),
            speech_command: "espeak-ng".into(),
            autoplay: true,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        config.completion.api_key = get("SANSKRIT_API_KEY").or_else(|| get("GROQ_API_KEY"));
        if let Some(base) = get("SANSKRIT_API_BASE") {
            config.completion.base_url = base;
        }
        if let Some(model) = get("SANSKRIT_MODEL") {
            config.completion.model = model;
        }
        if let Some(v) = get("SANSKRIT_TIMEOUT_SECS") {
            let secs = parse("SANSKRIT_TIMEOUT_SECS", &v)?;
            config.completion.timeout = Duration::from_secs(secs);
        }
        if let Some(v) = get("SANSKRIT_HOST") {
            config.host = parse("SANSKRIT_HOST", &v)?;
        }
        if let Some(v) = get("SANSKRIT_PORT") {
            config.port = parse("SANSKRIT_PORT", &v)?;
        }
        if let Some(cmd) = get("SANSKRIT_SPEECH_CMD") {
            config.speech_command = cmd;
        }
        if let Some(v) = get("SANSKRIT_AUTOPLAY") {
            config.autoplay = parse_bool("SANSKRIT_AUTOPLAY", &v)?;
        }
        if let Some(v) = get("SANSKRIT_LOG_FORMAT") {
            config.log_format = match v.trim().to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "SANSKRIT_LOG_FORMAT",
                        value: v,
                    })
                }
            };
        }
        Ok(config)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:3000");
        assert!(config.completion.api_key.is_none());
        assert_eq!(config.completion.model, "llama3-8b-8192");
        assert_eq!(config.completion.chat.temperature, 0.7);
        assert_eq!(config.completion.translate.temperature, 0.3);
        assert!(config.autoplay);
    }

    #[test]
    fn groq_key_is_a_fallback() {
        let config = config_from(&[("GROQ_API_KEY", "g")]).unwrap();
        assert_eq!(config.completion.api_key.as_deref(), Some("g"));
        let config = config_from(&[("GROQ_API_KEY", "g"), ("SANSKRIT_API_KEY", "s")]).unwrap();
        assert_eq!(config.completion.api_key.as_deref(), Some("s"));
    }

    #[test]
    fn overrides_and_errors() {
        let config = config_from(&[
            ("SANSKRIT_PORT", "8080"),
            ("SANSKRIT_AUTOPLAY", "off"),
            ("SANSKRIT_LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(!config.autoplay);
        assert_eq!(config.log_format, LogFormat::Json);

        assert!(config_from(&[("SANSKRIT_PORT", "eighty")]).is_err());
        assert!(config_from(&[("SANSKRIT_AUTOPLAY", "maybe")]).is_err());
    }

    #[test]
    fn debug_redacts_credential() {
        let config = config_from(&[("SANSKRIT_API_KEY", "secret-key")]).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret-key"));
    }
}
