use std::fs;
use std::path::Path;
use std::time::Duration;

use duet_core::{ConfigError, RunConfigBuilder};
use duet_ollama_model::{OllamaConfig, OllamaConfigBuilder};
use serde::Deserialize;

/// Everything a configuration file may hold.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Settings of the conversation itself.
    #[serde(flatten)]
    pub run: RunConfigBuilder,
    /// Settings of the Ollama transport.
    #[serde(default)]
    pub ollama: OllamaSettings,
}

/// The `ollama` section of a configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    /// Base URL of the server.
    pub host: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Forwarded verbatim as the request's `keep_alive`.
    pub keep_alive: Option<String>,
}

impl OllamaSettings {
    /// Builds the transport configuration.
    pub fn to_config(&self) -> OllamaConfig {
        let mut builder = OllamaConfigBuilder::new();
        if let Some(host) = &self.host {
            builder = builder.with_host(host);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.with_timeout(Duration::from_secs(secs));
        }
        if let Some(keep_alive) = &self.keep_alive {
            builder = builder.with_keep_alive(keep_alive);
        }
        builder.build()
    }
}

impl Settings {
    /// Reads settings from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        debug!("loaded config from {}", path.display());
        Self::from_yaml(&text)
    }

    /// Parses settings from a YAML document. An empty document yields the
    /// defaults.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|err| ConfigError::Parse(Box::new(err)))
    }
}
