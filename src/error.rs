//! Crate error type.
//!
//! Only decoding of serialized input (rule lists, export bundles, AI
//! responses) can fail. Problems found *in* the data are reported as
//! [`ValidationError`](crate::validation::ValidationError) values, never
//! through this type.

use thiserror::Error;

/// Errors raised while decoding serialized input.
#[derive(Debug, Error)]
pub enum Error {
    /// The payload is not valid JSON, or does not match the expected shape.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Free-form response text contains no `{...}` object to decode.
    #[error("no JSON object found in response text")]
    NoJsonObject,

    /// Entity type name outside `clients`, `workers`, `tasks`.
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),
}

/// Result alias for fallible decoding operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_converts() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("invalid JSON payload"));
    }

    #[test]
    fn test_unknown_entity_type_message() {
        let err = Error::UnknownEntityType("machines".into());
        assert_eq!(err.to_string(), "unknown entity type: machines");
    }
}
