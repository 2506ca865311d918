//! Whole-session export.
//!
//! [`ExportBundle`] gathers the cleaned collections, the rule list, and the
//! priority settings into one JSON document. [`flatten_records`] prepares
//! rows for spreadsheet-style output, where list and object cells are
//! written as JSON text.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::models::{Client, Entity, PrioritySettings, Rule, Task, Worker};

/// Everything a session produced, ready to be written out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub workers: Vec<Worker>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Rules in authoring order.
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_settings: Option<PrioritySettings>,
}

impl ExportBundle {
    /// Creates a bundle from the three collections.
    pub fn new(clients: Vec<Client>, workers: Vec<Worker>, tasks: Vec<Task>) -> Self {
        Self {
            clients,
            workers,
            tasks,
            ..Self::default()
        }
    }

    /// Attaches the rule list.
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    /// Attaches priority settings.
    pub fn with_priority_settings(mut self, settings: PrioritySettings) -> Self {
        self.priority_settings = Some(settings);
        self
    }

    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decodes a document written by [`ExportBundle::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| {
            tracing::warn!(error = %err, "export bundle failed to decode");
            err.into()
        })
    }
}

/// Raw rows with list and object cells rendered as JSON text.
pub fn flatten_records<E: Entity>(records: &[E]) -> Vec<Map<String, Value>> {
    records
        .iter()
        .map(|record| {
            record
                .to_record()
                .into_iter()
                .map(|(column, value)| match value {
                    Value::Array(_) | Value::Object(_) => {
                        (column, Value::String(value.to_string()))
                    }
                    scalar => (column, scalar),
                })
                .collect()
        })
        .collect()
}
