//! A model provider for a local Ollama server, plus an offline stand-in.

#[macro_use]
extern crate tracing;

mod config;
mod dry_run;
mod proto;
mod response;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use duet_model::{ErrorKind, ModelProvider, ModelProviderError, ModelRequest};
use reqwest::Client;

pub use config::{OllamaConfig, OllamaConfigBuilder};
pub use dry_run::{DryRunProvider, dry_run_reply};
use proto::DecodeError;
pub use response::OllamaResponse;

/// Error type for [`OllamaProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    fn from_reqwest(err: reqwest::Error, host: &str) -> Self {
        if err.is_connect() {
            Self::new(
                format!("Failed to connect to Ollama at {host}, is Ollama running? ({err})"),
                ErrorKind::ConnectionRefused,
            )
        } else if err.is_timeout() {
            Self::new(
                format!("Request to Ollama at {host} timed out"),
                ErrorKind::Timeout,
            )
        } else {
            Self::new(format!("{err}"), ErrorKind::Other)
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Ollama chat model provider.
#[derive(Clone, Debug)]
pub struct OllamaProvider {
    client: Client,
    config: Arc<OllamaConfig>,
}

impl OllamaProvider {
    /// Creates a new `OllamaProvider` with the given configuration.
    #[inline]
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl ModelProvider for OllamaProvider {
    type Error = Error;
    type Response = OllamaResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let ollama_req = proto::create_request(req, &self.config);
        let resp_fut = self
            .client
            .post(self.config.chat_url())
            .timeout(self.config.timeout)
            .json(&ollama_req)
            .send();
        let config = Arc::clone(&self.config);

        async move {
            let resp = resp_fut
                .await
                .map_err(|err| Error::from_reqwest(err, &config.host))?;
            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|err| Error::from_reqwest(err, &config.host))?;
            trace!("got response ({status}): {body}");

            if !status.is_success() {
                return Err(Error::new(
                    format!("Ollama returned an error: {} - {body}", status.as_u16()),
                    ErrorKind::HttpStatus(status.as_u16()),
                ));
            }

            let reply = proto::parse_reply(&body).map_err(|err| {
                let reason = match err {
                    DecodeError::Json(err) => format!("{err}"),
                    DecodeError::Empty => "empty body".to_owned(),
                };
                Error::new(
                    format!("Failed to decode JSON response from Ollama ({reason}): {body}"),
                    ErrorKind::MalformedResponse,
                )
            })?;
            Ok(OllamaResponse::from_reply(reply))
        }
    }
}
