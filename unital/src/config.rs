//! Client configuration loaded from defaults, an optional TOML file, and the environment.
//!
//! Priority (highest to lowest):
//! 1. `UNITAL_*` environment variables
//! 2. Explicit config path, or `./unital.toml` when present
//! 3. Built-in defaults
//!
//! ```rust
//! use unital::ClientConfig;
//!
//! let config = ClientConfig::default();
//! assert_eq!(config.api_base_url, "http://localhost:8000/api");
//! assert_eq!(config.credential_key, "token");
//! assert!(config.validate().is_ok());
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use ugateway::{CREDENTIAL_STORAGE_KEY, CredentialError};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const ENV_PREFIX: &str = "UNITAL_";
pub const PROJECT_CONFIG_FILE: &str = "unital.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    Load,
    Invalid,
    Credentials,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub message: String,
}

impl ConfigError {
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn load(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Load, message)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Invalid, message)
    }

    pub fn credentials(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Credentials, message)
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ConfigError {}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        ConfigError::load(value.to_string())
    }
}

impl From<CredentialError> for ConfigError {
    fn from(value: CredentialError) -> Self {
        ConfigError::credentials(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base address every endpoint path is joined to.
    pub api_base_url: String,
    /// Storage key the bearer credential lives under.
    pub credential_key: String,
    /// JSON file standing in for browser local storage. `None` keeps the credential in memory.
    pub token_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            credential_key: CREDENTIAL_STORAGE_KEY.to_string(),
            token_file: None,
        }
    }
}

impl ClientConfig {
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(config_path).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(ClientConfig::default()));

        match config_path {
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                let project = PathBuf::from(PROJECT_CONFIG_FILE);
                if project.exists() {
                    figment = figment.merge(Toml::file(project));
                }
            }
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api_base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::invalid(format!(
                "api_base_url must be an http(s) address, got '{}'",
                self.api_base_url
            )));
        }

        if self.credential_key.trim().is_empty() {
            return Err(ConfigError::invalid("credential_key must not be empty"));
        }

        Ok(())
    }

    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    pub fn with_token_file(mut self, token_file: impl Into<PathBuf>) -> Self {
        self.token_file = Some(token_file.into());
        self
    }
}
