mod builder;
mod state;
#[cfg(test)]
mod tests;

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

use duet_model::{ErrorKind, ModelProviderError};

use crate::config::RunConfig;
use crate::conversation::Conversation;
use crate::model_client::ModelClient;
use crate::turn::{Side, TurnRecord};
pub use builder::DuetBuilder;
use state::Stage;

type OnTurnFn = Box<dyn Fn(&TurnRecord) + Send + Sync>;

/// A two-speaker conversation, driven to completion by [`run`](Self::run).
///
/// The value owns both histories, the reply counter and the records
/// emitted so far. Nothing outlives one run.
pub struct Duet {
    model_client: ModelClient,
    config: RunConfig,
    history_a: Conversation,
    history_b: Conversation,
    completed_turns: u64,
    rounds_left: u32,
    stage: Stage,
    records: Vec<TurnRecord>,

    on_turn: Option<OnTurnFn>,
}

impl Duet {
    /// Runs the conversation and returns every record in emission order.
    ///
    /// The first transport failure aborts the run. The records produced
    /// before it are handed back inside the error.
    pub async fn run(mut self) -> Result<Vec<TurnRecord>, RunError> {
        info!(
            "starting a run of {} rounds between {} and {}",
            self.config.turns(),
            self.config.model(Side::A),
            self.config.model(Side::B),
        );
        match self.drive().await {
            Ok(()) => {
                info!(
                    "run finished after {} replies",
                    self.completed_turns
                );
                Ok(self.records)
            }
            Err(source) => {
                error!(
                    "run aborted after {} replies: {source}",
                    self.completed_turns
                );
                Err(RunError {
                    source,
                    partial: self.records,
                })
            }
        }
    }
}

/// A run aborted by a transport failure.
#[derive(Debug)]
pub struct RunError {
    source: Box<dyn ModelProviderError>,
    partial: Vec<TurnRecord>,
}

impl RunError {
    /// Returns the kind of the transport failure.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    /// Returns the records emitted before the failure.
    #[inline]
    pub fn partial_turns(&self) -> &[TurnRecord] {
        &self.partial
    }

    /// Consumes the error, returning the records emitted before the
    /// failure.
    #[inline]
    pub fn into_partial_turns(self) -> Vec<TurnRecord> {
        self.partial
    }
}

impl Display for RunError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "transport failure ({}): {}", self.kind(), self.source)
    }
}

impl StdError for RunError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}
