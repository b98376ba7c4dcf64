//! Startup configuration: the price provider's API key, read from an
//! INI-style file in the user's home directory and threaded into the client
//! constructors. Built once; never mutated afterwards.

use std::path::{Path, PathBuf};

use thiserror::Error;

const CONFIG_FILE: &str = ".opensecurities";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(PathBuf),
    #[error("could not read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config is missing `api_key` under the [quandl] section")]
    MissingKey,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub quandl_api_key: String,
}

impl Config {
    /// Loads `~/.opensecurities`.
    pub fn load() -> Result<Self, ConfigError> {
        let Some(home) = dirs::home_dir() else {
            return Err(ConfigError::NotFound(PathBuf::from("~")));
        };
        Self::load_from(&home.join(CONFIG_FILE))
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    fn parse(text: &str) -> Result<Self, ConfigError> {
        let value: toml::Value = toml::from_str(text)?;
        let api_key = value
            .get("quandl")
            .and_then(|section| section.get("api_key"))
            .and_then(toml::Value::as_str)
            .ok_or(ConfigError::MissingKey)?;
        Ok(Self {
            quandl_api_key: api_key.to_string(),
        })
    }
}
