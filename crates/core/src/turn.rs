//! Turn records and the identities attached to them.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Local};
use duet_model::Role;

/// One of the two speakers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The speaker that answers the initial prompt.
    A,
    /// The speaker that answers A.
    B,
}

impl Side {
    /// Returns the counterpart of this side.
    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

/// Who produced a turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Speaker {
    /// The initial prompt.
    User,
    /// A reply from the named model.
    Model(String),
    /// A configured message inserted into one speaker's history.
    Injection {
        /// The role the message was inserted with.
        role: Role,
        /// The side whose history received the message.
        target: Side,
        /// The model speaking for `target`.
        model: String,
    },
}

impl Display for Speaker {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => f.write_str("User"),
            Speaker::Model(model) => f.write_str(model),
            Speaker::Injection {
                role,
                target,
                model,
            } => write!(f, "Injection [{role} → {model} ({target})]"),
        }
    }
}

/// A single entry of the conversation transcript.
///
/// Records are created once, in emission order, and never modified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnRecord {
    speaker: Speaker,
    text: String,
    timestamp: DateTime<Local>,
}

impl TurnRecord {
    /// Creates a record stamped with the current local time.
    #[inline]
    pub fn new<S: Into<String>>(speaker: Speaker, text: S) -> Self {
        Self::with_timestamp(speaker, text, Local::now())
    }

    /// Creates a record with an explicit timestamp.
    #[inline]
    pub fn with_timestamp<S: Into<String>>(
        speaker: Speaker,
        text: S,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            speaker,
            text: text.into(),
            timestamp,
        }
    }

    /// Returns who produced this turn.
    #[inline]
    pub fn speaker(&self) -> &Speaker {
        &self.speaker
    }

    /// Returns the label shown in transcripts.
    #[inline]
    pub fn label(&self) -> String {
        self.speaker.to_string()
    }

    /// Returns the recorded text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns when the turn was recorded.
    #[inline]
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Returns `true` if the turn is a model reply.
    #[inline]
    pub fn is_reply(&self) -> bool {
        matches!(self.speaker, Speaker::Model(_))
    }
}
