use duet_model::{ModelMessage, ModelProvider};

use super::Duet;
use super::state::Stage;
use crate::config::RunConfig;
use crate::conversation::Conversation;
use crate::model_client::ModelClient;
use crate::turn::{Side, TurnRecord};

/// [`Duet`] builder.
pub struct DuetBuilder {
    pub(crate) model_client: ModelClient,
    pub(crate) config: RunConfig,
    pub(crate) on_turn: Option<super::OnTurnFn>,
}

impl DuetBuilder {
    /// Creates a new builder with the specified model provider, which
    /// serves both speakers.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
        config: RunConfig,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            config,
            on_turn: None,
        }
    }

    /// Attaches a callback to be invoked whenever a record is emitted.
    #[inline]
    pub fn on_turn(
        mut self,
        on_turn: impl Fn(&TurnRecord) + Send + Sync + 'static,
    ) -> Self {
        self.on_turn = Some(Box::new(on_turn));
        self
    }

    /// Builds the conversation.
    #[inline]
    pub fn build(self) -> Duet {
        let DuetBuilder {
            model_client,
            config,
            on_turn,
        } = self;

        let mut history_a = Conversation::default();
        history_a.push(ModelMessage::System(
            config.system_prompt(Side::A).to_owned(),
        ));
        history_a.push(ModelMessage::User(config.initial_prompt().to_owned()));
        let mut history_b = Conversation::default();
        history_b.push(ModelMessage::System(
            config.system_prompt(Side::B).to_owned(),
        ));

        Duet {
            model_client,
            rounds_left: config.turns().saturating_sub(1),
            config,
            history_a,
            history_b,
            completed_turns: 0,
            stage: Stage::Seeding,
            records: vec![],
            on_turn,
        }
    }
}
