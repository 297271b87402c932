use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced while applying the host-supplied card configuration.
/// Any of these aborts card initialization.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("missing required config field '{0}'")]
    MissingField(&'static str),

    #[error("api_url '{0}' is not an http(s) URL")]
    InvalidApiUrl(String),

    #[error("configuration error requested via show_error")]
    ShowError,

    #[error("failed to initialize API client: {0}")]
    ClientInit(String),
}

fn default_name() -> String {
    "Shopping List Card".to_string()
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CardConfig {
    /// Entity id the host's state store tracks for this list.
    pub entity: String,
    /// GraphQL endpoint of the list service.
    pub api_url: String,
    #[serde(default = "default_name")]
    pub name: String,
    /// Host test hook: a config with this flag set must fail validation.
    #[serde(default)]
    pub show_error: bool,
}

impl CardConfig {
    pub fn new(entity: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            api_url: api_url.into(),
            name: default_name(),
            show_error: false,
        }
    }

    /// Parse and validate the JSON config object handed over by the host.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let config: CardConfig =
            serde_json::from_value(value).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.show_error {
            return Err(ConfigError::ShowError);
        }
        if self.entity.trim().is_empty() {
            return Err(ConfigError::MissingField("entity"));
        }
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::MissingField("api_url"));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ConfigError::InvalidApiUrl(self.api_url.clone()));
        }
        Ok(())
    }
}
