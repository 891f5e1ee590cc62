//! Layered configuration: defaults, then `~/.legwork/config.json` (or an
//! explicit file), then `LEGWORK_*` environment variables. CLI flags are
//! applied last by the binary.

use crate::places::{cache::DEFAULT_TTL_SECS, providers::GEONAMES_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid value '{value}' for {key}")]
    InvalidEnv { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub geonames_url: String,
    pub geonames_user: String,
    pub max_rows: usize,
    /// Static map API key; empty disables `map_url`.
    pub maps_key: String,
    pub cache: bool,
    pub cache_ttl_secs: i64,
    pub log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            geonames_url: GEONAMES_BASE_URL.to_string(),
            geonames_user: "demo".to_string(),
            max_rows: 10,
            maps_key: String::new(),
            cache: true,
            cache_ttl_secs: DEFAULT_TTL_SECS,
            log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".legwork")
            .join("config.json")
    }

    /// Full load from the process environment. An explicit `path` must
    /// exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let p = Self::default_path();
                if p.exists() {
                    Self::from_file(&p)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(std::env::vars())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `LEGWORK_*` overrides. Unrelated variables are ignored.
    pub fn apply_env<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                "LEGWORK_HOST" => self.host = value,
                "LEGWORK_PORT" => {
                    self.port = value
                        .parse()
                        .map_err(|_| ConfigError::InvalidEnv {
                            key: key.clone(),
                            value: value.clone(),
                        })?;
                }
                "LEGWORK_GEONAMES_USER" => self.geonames_user = value,
                "LEGWORK_GEONAMES_URL" => self.geonames_url = value,
                "LEGWORK_MAPS_KEY" => self.maps_key = value,
                "LEGWORK_LOG" => self.log = value,
                _ => {}
            }
        }
        Ok(())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
