//! Conversation-related types.

use duet_model::{ModelMessage, ModelRequest};

/// The chat history one speaker sees, in chronological order.
///
/// Histories are append-only. Each speaker has its own, and the two are
/// never merged.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Conversation {
    pub(crate) messages: Vec<ModelMessage>,
}

impl Conversation {
    /// Returns the messages of this history.
    #[inline]
    pub fn messages(&self) -> &[ModelMessage] {
        &self.messages
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if the history holds no message.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[inline]
    pub(crate) fn push(&mut self, msg: ModelMessage) {
        self.messages.push(msg);
    }

    #[inline]
    pub(crate) fn to_request(&self, model: &str) -> ModelRequest {
        ModelRequest {
            model: model.to_owned(),
            messages: self.messages.clone(),
        }
    }
}

/// Returns the copy of `reply` that the counterpart gets to see.
///
/// With a `limit` of `0` the reply is kept whole, otherwise only its
/// trailing `limit` characters are kept.
pub fn view(reply: &str, limit: usize) -> String {
    if limit == 0 {
        return reply.to_owned();
    }
    match reply.char_indices().nth_back(limit - 1) {
        Some((idx, _)) => reply[idx..].to_owned(),
        None => reply.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_view_keeps_the_tail() {
        assert_eq!(view("Hello, world!", 6), "world!");
        assert_eq!(view("Hello", 5), "Hello");
        assert_eq!(view("Hi", 5), "Hi");
        assert_eq!(view("", 3), "");
        assert_eq!(view("unlimited", 0), "unlimited");
    }

    #[test]
    fn test_view_counts_characters() {
        assert_eq!(view("über straße", 6), "straße");
        assert_eq!(view("日本語です", 2), "です");
    }

    proptest! {
        #[test]
        fn view_is_the_trailing_characters(reply in "\\PC{0,64}", limit in 0usize..80) {
            let result = view(&reply, limit);
            let chars: Vec<char> = reply.chars().collect();
            if limit == 0 {
                prop_assert_eq!(&result, &reply);
            } else {
                let keep = limit.min(chars.len());
                let expected: String = chars[chars.len() - keep..].iter().collect();
                prop_assert_eq!(&result, &expected);
            }
            prop_assert!(reply.ends_with(&result));
        }
    }
}
