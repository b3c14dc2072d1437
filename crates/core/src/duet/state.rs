use duet_model::{ModelMessage, ModelProviderError};

use super::Duet;
use crate::conversation::{self, Conversation};
use crate::injection;
use crate::turn::{Side, Speaker, TurnRecord};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Seeding,
    AwaitingB,
    AwaitingA,
    Done,
}

impl Duet {
    /// Emits the initial prompt and steps until the run is done.
    pub(super) async fn drive(
        &mut self,
    ) -> Result<(), Box<dyn ModelProviderError>> {
        let initial_prompt = self.config.initial_prompt().to_owned();
        self.emit(TurnRecord::new(Speaker::User, initial_prompt));

        while self.stage != Stage::Done {
            self.step().await?;
        }
        Ok(())
    }

    async fn step(&mut self) -> Result<(), Box<dyn ModelProviderError>> {
        self.stage = match self.stage {
            Stage::Seeding => {
                self.half_turn(Side::A).await?;
                self.next_round()
            }
            Stage::AwaitingB => {
                self.half_turn(Side::B).await?;
                Stage::AwaitingA
            }
            Stage::AwaitingA => {
                self.half_turn(Side::A).await?;
                self.rounds_left -= 1;
                self.next_round()
            }
            Stage::Done => Stage::Done,
        };
        Ok(())
    }

    #[inline]
    fn next_round(&self) -> Stage {
        if self.rounds_left == 0 {
            Stage::Done
        } else {
            Stage::AwaitingB
        }
    }

    /// Lets `side` produce one reply and shares it with the counterpart.
    async fn half_turn(
        &mut self,
        side: Side,
    ) -> Result<(), Box<dyn ModelProviderError>> {
        let model = self.config.model(side).to_owned();
        debug!("waiting for {side} ({model})");

        let request = self.history(side).to_request(&model);
        let resp = self.model_client.send_request(request).await?;
        let reply = resp.transcript;
        debug!(
            "{side} ({model}) replied with {} chars, finish reason {:?}",
            reply.chars().count(),
            resp.finish_reason
        );

        // The speaker keeps the full reply, the counterpart gets the view.
        self.history_mut(side)
            .push(ModelMessage::Assistant(reply.clone()));
        let view = conversation::view(&reply, self.config.history_max_chars());
        self.emit(TurnRecord::new(Speaker::Model(model), reply));
        self.completed_turns += 1;
        self.history_mut(side.other()).push(ModelMessage::User(view));

        self.apply_injections();
        Ok(())
    }

    fn apply_injections(&mut self) {
        let counter = self.completed_turns;
        let due: Vec<_> =
            injection::due(self.config.context_injections(), counter)
                .cloned()
                .collect();

        for rule in due {
            for &target in rule.target.sides() {
                info!(
                    "injecting a {} message into {target}'s history at turn {counter}",
                    rule.role
                );
                self.history_mut(target)
                    .push(ModelMessage::new(rule.role, rule.content.clone()));
                let speaker = Speaker::Injection {
                    role: rule.role,
                    target,
                    model: self.config.model(target).to_owned(),
                };
                self.emit(TurnRecord::new(speaker, rule.content.clone()));
            }
        }
    }

    fn emit(&mut self, record: TurnRecord) {
        if let Some(on_turn) = &self.on_turn {
            on_turn(&record);
        }
        self.records.push(record);
    }

    #[inline]
    pub(super) fn history(&self, side: Side) -> &Conversation {
        match side {
            Side::A => &self.history_a,
            Side::B => &self.history_b,
        }
    }

    #[inline]
    fn history_mut(&mut self, side: Side) -> &mut Conversation {
        match side {
            Side::A => &mut self.history_a,
            Side::B => &mut self.history_b,
        }
    }
}
