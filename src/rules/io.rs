//! Rule list import and export.

use crate::error::Result;
use crate::models::Rule;
use crate::response::decode_response;

/// Serializes a rule list as pretty-printed JSON, in list order.
pub fn export_rules(rules: &[Rule]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rules)?)
}

/// Decodes a rule list exported by [`export_rules`].
///
/// Fails as a whole on the first malformed rule.
pub fn import_rules(json: &str) -> Result<Vec<Rule>> {
    serde_json::from_str(json).map_err(|err| {
        tracing::warn!(error = %err, "rule import failed");
        err.into()
    })
}

impl Rule {
    /// Decodes a rule from free-form response text.
    ///
    /// The whole text is tried as JSON first; otherwise the first `{...}`
    /// span is decoded.
    pub fn from_response(text: &str) -> Result<Rule> {
        decode_response(text)
    }
}
