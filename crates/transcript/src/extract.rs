use serde_json::Value;

/// Recovers the reply text from a possibly raw response body.
///
/// A body made of whitespace-adjacent JSON objects is decoded object by
/// object and the `message.content` of each is concatenated in order.
/// Anything else, including plain text and JSON without any
/// `message.content`, is returned unchanged.
pub fn extract_content(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return raw.to_owned();
    }

    let mut content = String::new();
    let mut found = false;
    for value in serde_json::Deserializer::from_str(trimmed).into_iter::<Value>() {
        let Ok(Value::Object(object)) = value else {
            return raw.to_owned();
        };
        if let Some(text) = object
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
        {
            content.push_str(text);
            found = true;
        }
    }

    if found {
        content
    } else {
        raw.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_unchanged() {
        let text = "  Hello there, how are you?\n";
        assert_eq!(extract_content(text), text);
        assert_eq!(extract_content(""), "");
    }

    #[test]
    fn test_idempotent_on_clean_text() {
        let once = extract_content("Just words.");
        assert_eq!(extract_content(&once), once);
    }

    #[test]
    fn test_concatenated_objects() {
        assert_eq!(
            extract_content(
                r#"{"message":{"content":"Hello, "}}{"message":{"content":"world!"}}"#
            ),
            "Hello, world!"
        );
        assert_eq!(
            extract_content(
                "{\"message\":{\"content\":\"a\"}}\n\n {\"message\":{\"content\":\"b\"},\"done\":true}"
            ),
            "ab"
        );
    }

    #[test]
    fn test_non_object_json_is_unchanged() {
        assert_eq!(extract_content("42"), "42");
        assert_eq!(extract_content("[1, 2]"), "[1, 2]");
        assert_eq!(extract_content(r#""quoted""#), r#""quoted""#);
    }

    #[test]
    fn test_json_without_content_is_unchanged() {
        let raw = r#"{"model":"x","done":true}"#;
        assert_eq!(extract_content(raw), raw);
    }

    #[test]
    fn test_trailing_garbage_is_unchanged() {
        let raw = r#"{"message":{"content":"a"}} and then some prose"#;
        assert_eq!(extract_content(raw), raw);
    }
}
