use std::future::ready;

use duet_model::{
    ModelFinishReason, ModelMessage, ModelProvider, ModelRequest,
};

use crate::proto::Reply;
use crate::response::OllamaResponse;

/// A provider that never touches the network.
///
/// Every request is answered immediately with a placeholder derived from
/// the last message, which makes the whole runner usable offline.
#[derive(Clone, Copy, Debug, Default)]
pub struct DryRunProvider;

/// Builds the placeholder reply for `model` given the conversation so far.
pub fn dry_run_reply(model: &str, messages: &[ModelMessage]) -> String {
    let last = messages
        .last()
        .map(ModelMessage::content)
        .unwrap_or("(no input)");
    format!("[dry-run] Mock reply from {model} to: {last}")
}

impl ModelProvider for DryRunProvider {
    type Error = crate::Error;
    type Response = OllamaResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let reply = Reply {
            deltas: vec![dry_run_reply(&req.model, &req.messages)],
            finish_reason: ModelFinishReason::Stop,
        };
        ready(Ok(OllamaResponse::from_reply(reply)))
    }
}
