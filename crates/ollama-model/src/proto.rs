use duet_model::{ModelFinishReason, ModelMessage, ModelRequest, Role};
use serde::Serialize;
use serde_json::Value;

use crate::OllamaConfig;

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Message {
    role: Role,
    content: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    keep_alive: Option<String>,
}

// ------------------------------
// Types received from the server
// ------------------------------

// Fields of an unexpected type count as missing.
fn reply_text(chunk: &Value) -> Option<&str> {
    chunk
        .pointer("/message/content")
        .and_then(Value::as_str)
        .or_else(|| chunk.get("response").and_then(Value::as_str))
}

/// The reply text decoded from a response body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub deltas: Vec<String>,
    pub finish_reason: ModelFinishReason,
}

#[derive(Debug)]
pub enum DecodeError {
    Json(serde_json::Error),
    Empty,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(req: &ModelRequest, config: &OllamaConfig) -> ChatRequest {
    ChatRequest {
        model: req.model.clone(),
        messages: req.messages.iter().map(create_message).collect(),
        stream: false,
        keep_alive: config.keep_alive.clone(),
    }
}

#[inline]
fn create_message(msg: &ModelMessage) -> Message {
    Message {
        role: msg.role(),
        content: msg.content().to_owned(),
    }
}

/// Decodes a response body.
///
/// The body may hold several whitespace-adjacent JSON objects even though
/// streaming was disabled. The text of each one is taken from
/// `message.content`, then from `response`. If no object carries either
/// field, the raw body becomes the reply so that the caller still sees
/// what the server said.
pub fn parse_reply(body: &str) -> Result<Reply, DecodeError> {
    let mut deltas = vec![];
    let mut recognized = false;
    let mut finish_reason = ModelFinishReason::Stop;
    let mut count = 0;

    let stream = serde_json::Deserializer::from_str(body)
        .into_iter::<Value>();
    for chunk in stream {
        let chunk = chunk.map_err(DecodeError::Json)?;
        count += 1;

        if let Some(text) = reply_text(&chunk) {
            recognized = true;
            deltas.push(text.to_owned());
        }
        if let Some(reason) = chunk.get("done_reason").and_then(Value::as_str) {
            finish_reason = if reason == "length" {
                ModelFinishReason::Length
            } else {
                ModelFinishReason::Stop
            };
        }
    }

    if count == 0 {
        return Err(DecodeError::Empty);
    }
    if !recognized {
        warn!("unrecognized response shape, surfacing the raw body");
        deltas = vec![body.to_owned()];
    }

    Ok(Reply {
        deltas,
        finish_reason,
    })
}
