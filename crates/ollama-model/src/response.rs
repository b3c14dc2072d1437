use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use duet_model::{ModelResponse, ModelResponseEvent};

use crate::proto::Reply;

/// A fully received reply, replayed as response events.
///
/// Streaming is disabled on the wire, so by the time this value exists
/// the whole body has been read and every event is ready.
#[derive(Debug)]
pub struct OllamaResponse {
    events: VecDeque<ModelResponseEvent>,
}

impl OllamaResponse {
    #[inline]
    pub(crate) fn from_reply(reply: Reply) -> Self {
        let mut events: VecDeque<_> = reply
            .deltas
            .into_iter()
            .map(ModelResponseEvent::MessageDelta)
            .collect();
        events.push_back(ModelResponseEvent::Completed(reply.finish_reason));
        Self { events }
    }
}

impl ModelResponse for OllamaResponse {
    type Error = crate::Error;

    fn poll_next_event(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        Poll::Ready(Ok(self.get_mut().events.pop_front()))
    }
}
