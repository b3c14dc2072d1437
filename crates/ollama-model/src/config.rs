use std::time::Duration;

const DEFAULT_HOST: &str = "http://localhost:11434";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Builder for [`OllamaConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OllamaConfigBuilder {
    host: Option<String>,
    timeout: Option<Duration>,
    keep_alive: Option<String>,
}

impl OllamaConfigBuilder {
    /// Creates a builder with every option left at its default.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL of the Ollama server.
    #[inline]
    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the per-request timeout.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets how long the server keeps the model loaded, e.g. `"5m"`.
    #[inline]
    pub fn with_keep_alive<S: Into<String>>(mut self, keep_alive: S) -> Self {
        self.keep_alive = Some(keep_alive.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> OllamaConfig {
        let host = self.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
        OllamaConfig {
            host: host.trim_end_matches('/').to_string(),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            keep_alive: self.keep_alive,
        }
    }
}

/// Configuration for the Ollama provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OllamaConfig {
    pub(crate) host: String,
    pub(crate) timeout: Duration,
    pub(crate) keep_alive: Option<String>,
}

impl OllamaConfig {
    /// Returns the base URL of the server, without a trailing slash.
    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    pub(crate) fn chat_url(&self) -> String {
        format!("{}/api/chat", self.host)
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        OllamaConfigBuilder::new().build()
    }
}
