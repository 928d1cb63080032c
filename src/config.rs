use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

const DEFAULT_GTTS_HOST: &str = "https://translate.google.com";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Runtime settings, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub espeak_bin: String,
    pub gtts_host: Url,
    pub online_timeout: Duration,
    pub static_dir: PathBuf,
    pub temp_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");
        let port: u16 = var("PORT", "8000").parse().map_err(|e| ConfigError::Invalid {
            name: "PORT",
            reason: format!("{}", e),
        })?;
        let addr: SocketAddr =
            format!("{}:{}", host, port)
                .parse()
                .map_err(|e| ConfigError::Invalid {
                    name: "HOST",
                    reason: format!("{}", e),
                })?;

        let gtts_host = Url::parse(&var("GTTS_HOST", DEFAULT_GTTS_HOST)).map_err(|e| {
            ConfigError::Invalid {
                name: "GTTS_HOST",
                reason: e.to_string(),
            }
        })?;
        if gtts_host.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                name: "GTTS_HOST",
                reason: "must be a base URL".to_string(),
            });
        }

        let timeout_secs: u64 =
            var("ONLINE_TIMEOUT_SECS", "30")
                .parse()
                .map_err(|e| ConfigError::Invalid {
                    name: "ONLINE_TIMEOUT_SECS",
                    reason: format!("{}", e),
                })?;

        Ok(Self {
            addr,
            espeak_bin: var("ESPEAK_BIN", "espeak-ng"),
            gtts_host,
            online_timeout: Duration::from_secs(timeout_secs),
            static_dir: var("STATIC_DIR", "static").into(),
            temp_dir: lookup("TTS_TEMP_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| env.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.addr, "0.0.0.0:8000".parse().unwrap());
        assert_eq!(config.espeak_bin, "espeak-ng");
        assert_eq!(config.gtts_host.as_str(), "https://translate.google.com/");
        assert_eq!(config.online_timeout, Duration::from_secs(30));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert!(config.temp_dir.is_none());
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("ESPEAK_BIN", "/usr/local/bin/espeak"),
            ("TTS_TEMP_DIR", "/var/tmp"),
        ])
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.espeak_bin, "/usr/local/bin/espeak");
        assert_eq!(config.temp_dir, Some(PathBuf::from("/var/tmp")));
    }

    #[test]
    fn rejects_bad_port() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().starts_with("PORT is invalid"));
    }

    #[test]
    fn rejects_non_base_host() {
        assert!(config_from(&[("GTTS_HOST", "mailto:tts@example.com")]).is_err());
    }
}
