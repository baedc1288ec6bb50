//! Normalization of AI chat responses
//!
//! The chat capability returns an untyped JSON document whose shape is not
//! guaranteed. [`ReplyShape::decode`] tries the known shapes in priority
//! order and falls back to a raw dump, so a reply string can always be
//! produced.

use serde_json::Value;

/// Text shown when the response is absent or not an object
pub const NO_RESPONSE_TEXT: &str = "No response received.";

/// Text shown when decoding produced nothing printable
pub const UNRECOGNIZED_RESPONSE_TEXT: &str = "Empty or unrecognized response.";

/// Decoded form of a chat response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyShape {
    /// Response was null or not a JSON object
    Missing,
    /// `message.content` was a non-empty string
    Text(String),
    /// `message.content` was an array; first string element
    FirstTextPart(String),
    /// Nothing recognizable; pretty-printed content or whole response
    Raw(String),
}

impl ReplyShape {
    /// Decode a chat response into the first matching shape
    ///
    /// # Examples
    ///
    /// ```
    /// use puter_demo::client::reply::ReplyShape;
    /// use serde_json::json;
    ///
    /// let shape = ReplyShape::decode(&json!({"message": {"content": "Hi there"}}));
    /// assert_eq!(shape, ReplyShape::Text("Hi there".to_string()));
    /// ```
    pub fn decode(response: &Value) -> Self {
        let Some(object) = response.as_object() else {
            return Self::Missing;
        };

        let content = object.get("message").and_then(|m| m.get("content"));

        match content {
            Some(Value::String(text)) if !text.is_empty() => {
                return Self::Text(text.clone());
            }
            Some(Value::Array(parts)) => {
                let first = parts
                    .iter()
                    .filter_map(Value::as_str)
                    .find(|part| !part.is_empty());
                if let Some(part) = first {
                    return Self::FirstTextPart(part.to_string());
                }
            }
            _ => {}
        }

        let dump_target = match content {
            Some(value) if !value.is_null() => value,
            _ => response,
        };
        Self::Raw(serde_json::to_string_pretty(dump_target).unwrap_or_default())
    }

    /// Text to display for this shape; never empty
    pub fn into_text(self) -> String {
        let text = match self {
            Self::Missing => return NO_RESPONSE_TEXT.to_string(),
            Self::Text(text) | Self::FirstTextPart(text) | Self::Raw(text) => text,
        };
        if text.is_empty() {
            UNRECOGNIZED_RESPONSE_TEXT.to_string()
        } else {
            text
        }
    }
}

/// Extract the reply text from a chat response
///
/// Never fails and never returns an empty string.
pub fn extract_reply_text(response: &Value) -> String {
    ReplyShape::decode(response).into_text()
}
