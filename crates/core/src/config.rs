//! Run configuration.

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::injection::InjectionRule;
use crate::turn::Side;

const DEFAULT_SYSTEM_PROMPT_A: &str = "You are Speaker A.";
const DEFAULT_SYSTEM_PROMPT_B: &str = "You are Speaker B.";
const DEFAULT_INITIAL_PROMPT: &str = "Hello!";
const DEFAULT_TURNS: u32 = 6;
const DEFAULT_TRANSCRIPT_FOLDER: &str = "transcripts";

/// Errors raised while loading or validating the configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Read {
        /// Path of the file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The configuration document is not valid.
    Parse(Box<dyn StdError + Send + Sync>),
    /// No model identifier was given for a side.
    EmptyModel(Side),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "cannot read config {}: {source}", path.display())
            }
            ConfigError::Parse(source) => {
                write!(f, "invalid config: {source}")
            }
            ConfigError::EmptyModel(side) => {
                write!(f, "no model given for speaker {side}")
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse(source) => Some(source.as_ref()),
            ConfigError::EmptyModel(_) => None,
        }
    }
}

/// Builder for [`RunConfig`].
///
/// The builder is also the shape of the configuration document, every
/// field is optional there and falls back to a default on
/// [`build`](Self::build).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunConfigBuilder {
    model_a: Option<String>,
    model_b: Option<String>,
    system_prompt_a: Option<String>,
    system_prompt_b: Option<String>,
    initial_prompt: Option<String>,
    turns: Option<u32>,
    history_max_chars: Option<usize>,
    transcript_folder: Option<PathBuf>,
    experiment_name: Option<String>,
    context_injections: Vec<InjectionRule>,
}

impl RunConfigBuilder {
    /// Creates a builder with both model identifiers.
    #[inline]
    pub fn with_models<A: Into<String>, B: Into<String>>(
        model_a: A,
        model_b: B,
    ) -> Self {
        Self {
            model_a: Some(model_a.into()),
            model_b: Some(model_b.into()),
            ..Default::default()
        }
    }

    /// Sets the model for speaker A.
    #[inline]
    pub fn with_model_a<S: Into<String>>(mut self, model: S) -> Self {
        self.model_a = Some(model.into());
        self
    }

    /// Sets the model for speaker B.
    #[inline]
    pub fn with_model_b<S: Into<String>>(mut self, model: S) -> Self {
        self.model_b = Some(model.into());
        self
    }

    /// Sets the system prompt of one speaker.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(
        mut self,
        side: Side,
        prompt: S,
    ) -> Self {
        match side {
            Side::A => self.system_prompt_a = Some(prompt.into()),
            Side::B => self.system_prompt_b = Some(prompt.into()),
        }
        self
    }

    /// Sets the prompt that opens the conversation.
    #[inline]
    pub fn with_initial_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.initial_prompt = Some(prompt.into());
        self
    }

    /// Sets the number of rounds.
    #[inline]
    pub fn with_turns(mut self, turns: u32) -> Self {
        self.turns = Some(turns);
        self
    }

    /// Keeps only the trailing `limit` characters of a reply in the
    /// counterpart's history. `0` means unlimited.
    #[inline]
    pub fn with_history_max_chars(mut self, limit: usize) -> Self {
        self.history_max_chars = Some(limit);
        self
    }

    /// Sets the folder transcripts are written to.
    #[inline]
    pub fn with_transcript_folder<P: Into<PathBuf>>(mut self, folder: P) -> Self {
        self.transcript_folder = Some(folder.into());
        self
    }

    /// Sets the experiment name used in transcript file names.
    #[inline]
    pub fn with_experiment_name<S: Into<String>>(mut self, name: S) -> Self {
        self.experiment_name = Some(name.into());
        self
    }

    /// Appends a context injection rule.
    #[inline]
    pub fn with_injection(mut self, rule: InjectionRule) -> Self {
        self.context_injections.push(rule);
        self
    }

    /// Validates the values and builds the configuration.
    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let model_a = non_empty(self.model_a).ok_or(ConfigError::EmptyModel(Side::A))?;
        let model_b = non_empty(self.model_b).ok_or(ConfigError::EmptyModel(Side::B))?;

        let config = RunConfig {
            model_a,
            model_b,
            system_prompt_a: self
                .system_prompt_a
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT_A.to_owned()),
            system_prompt_b: self
                .system_prompt_b
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT_B.to_owned()),
            initial_prompt: self
                .initial_prompt
                .unwrap_or_else(|| DEFAULT_INITIAL_PROMPT.to_owned()),
            turns: self.turns.unwrap_or(DEFAULT_TURNS),
            history_max_chars: self.history_max_chars.unwrap_or(0),
            transcript_folder: self
                .transcript_folder
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TRANSCRIPT_FOLDER)),
            experiment_name: non_empty(self.experiment_name),
            context_injections: self.context_injections,
        };

        let last_turn = config.total_replies();
        for rule in &config.context_injections {
            if rule.after_turn == 0 {
                warn!("context injection at turn 0 will never fire, the first reply is turn 1");
            } else if u64::from(rule.after_turn) > last_turn {
                warn!(
                    "context injection at turn {} will never fire, the run ends at turn {last_turn}",
                    rule.after_turn
                );
            }
        }

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Static settings of one run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    model_a: String,
    model_b: String,
    system_prompt_a: String,
    system_prompt_b: String,
    initial_prompt: String,
    turns: u32,
    history_max_chars: usize,
    transcript_folder: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    experiment_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    context_injections: Vec<InjectionRule>,
}

impl RunConfig {
    /// Returns the model speaking for `side`.
    #[inline]
    pub fn model(&self, side: Side) -> &str {
        match side {
            Side::A => &self.model_a,
            Side::B => &self.model_b,
        }
    }

    /// Returns the system prompt of `side`.
    #[inline]
    pub fn system_prompt(&self, side: Side) -> &str {
        match side {
            Side::A => &self.system_prompt_a,
            Side::B => &self.system_prompt_b,
        }
    }

    /// Returns the prompt that opens the conversation.
    #[inline]
    pub fn initial_prompt(&self) -> &str {
        &self.initial_prompt
    }

    /// Returns the number of rounds.
    #[inline]
    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Returns the truncation limit for counterpart views, `0` if none.
    #[inline]
    pub fn history_max_chars(&self) -> usize {
        self.history_max_chars
    }

    /// Returns the folder transcripts are written to.
    #[inline]
    pub fn transcript_folder(&self) -> &Path {
        &self.transcript_folder
    }

    /// Returns the experiment name, if any.
    #[inline]
    pub fn experiment_name(&self) -> Option<&str> {
        self.experiment_name.as_deref()
    }

    /// Returns the injection rules in configuration order.
    #[inline]
    pub fn context_injections(&self) -> &[InjectionRule] {
        &self.context_injections
    }

    /// Returns how many model replies a complete run produces: the seed
    /// reply plus two per remaining round.
    #[inline]
    pub fn total_replies(&self) -> u64 {
        1 + 2 * u64::from(self.turns.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use duet_model::Role;

    use super::*;
    use crate::injection::InjectionTarget;

    #[test]
    fn test_defaults() {
        let config = RunConfigBuilder::with_models("a", "b").build().unwrap();
        assert_eq!(config.system_prompt(Side::A), DEFAULT_SYSTEM_PROMPT_A);
        assert_eq!(config.system_prompt(Side::B), DEFAULT_SYSTEM_PROMPT_B);
        assert_eq!(config.initial_prompt(), "Hello!");
        assert_eq!(config.turns(), 6);
        assert_eq!(config.history_max_chars(), 0);
        assert_eq!(config.transcript_folder(), Path::new("transcripts"));
        assert_eq!(config.experiment_name(), None);
    }

    #[test]
    fn test_models_are_required() {
        let err = RunConfigBuilder::default()
            .with_model_b("b")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyModel(Side::A)));

        let err = RunConfigBuilder::with_models("a", "  ").build().unwrap_err();
        assert!(matches!(err, ConfigError::EmptyModel(Side::B)));
    }

    #[test]
    fn test_injection_at_turn_zero_is_kept() {
        let config = RunConfigBuilder::with_models("a", "b")
            .with_injection(InjectionRule {
                after_turn: 1,
                target: InjectionTarget::A,
                role: Role::User,
                content: "ok".to_owned(),
            })
            .with_injection(InjectionRule {
                after_turn: 0,
                target: InjectionTarget::B,
                role: Role::User,
                content: "too early".to_owned(),
            })
            .build()
            .unwrap();
        assert_eq!(config.context_injections().len(), 2);
        assert_eq!(config.context_injections()[1].after_turn, 0);
    }

    #[test]
    fn test_total_replies() {
        let replies = |turns| {
            RunConfigBuilder::with_models("a", "b")
                .with_turns(turns)
                .build()
                .unwrap()
                .total_replies()
        };
        assert_eq!(replies(0), 1);
        assert_eq!(replies(1), 1);
        assert_eq!(replies(2), 3);
        assert_eq!(replies(6), 11);
        assert_eq!(replies(u32::MAX), 2 * u64::from(u32::MAX) - 1);
    }

    #[test]
    fn test_blank_experiment_name_is_dropped() {
        let config = RunConfigBuilder::with_models("a", "b")
            .with_experiment_name(" ")
            .build()
            .unwrap();
        assert_eq!(config.experiment_name(), None);
    }

    #[test]
    fn test_deserialize_builder() {
        let builder: RunConfigBuilder = serde_json::from_str(
            r#"{
                "model_a": "llama3.2",
                "model_b": "mistral",
                "turns": 2,
                "history_max_chars": 5,
                "context_injections": [
                    {"after_turn": 2, "target": "a", "role": "system", "content": "Be brief."}
                ]
            }"#,
        )
        .unwrap();
        let config = builder.build().unwrap();
        assert_eq!(config.model(Side::A), "llama3.2");
        assert_eq!(config.model(Side::B), "mistral");
        assert_eq!(config.turns(), 2);
        assert_eq!(config.history_max_chars(), 5);
        assert_eq!(config.context_injections().len(), 1);
    }
}
