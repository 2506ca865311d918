//! Decoding of structured payloads embedded in free-form response text.
//!
//! Language-model collaborators are asked for JSON but often wrap it in
//! prose or code fences. The whole text is tried first; failing that, the
//! span from the first `{` to the last `}`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

static OBJECT_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Decodes `T` from response text.
pub(crate) fn decode_response<T: DeserializeOwned>(text: &str) -> Result<T> {
    match serde_json::from_str(text.trim()) {
        Ok(value) => Ok(value),
        Err(whole) => {
            let Some(span) = OBJECT_SPAN.find(text) else {
                tracing::warn!(error = %whole, "response text holds no JSON object");
                return Err(Error::NoJsonObject);
            };
            serde_json::from_str(span.as_str()).map_err(|err| {
                tracing::warn!(error = %err, "embedded JSON object failed to decode");
                Error::Json(err)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_plain_json() {
        let v: Value = decode_response(r#"{"a": 1}"#).unwrap();
        assert_eq!(v, json!({"a": 1}));
    }

    #[test]
    fn test_embedded_json() {
        let text = "Here is the filter:\n```json\n{\"a\": {\"b\": 2}}\n```\nHope it helps.";
        let v: Value = decode_response(text).unwrap();
        assert_eq!(v, json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_no_object() {
        let result: Result<Value> = decode_response("sorry, I cannot help");
        assert!(matches!(result, Err(Error::NoJsonObject)));
    }

    #[test]
    fn test_broken_embedded_object() {
        let result: Result<Value> = decode_response("result: {a: 1}");
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
