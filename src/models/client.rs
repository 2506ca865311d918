//! Client model.
//!
//! A client requests a set of tasks and carries a priority level, a group
//! tag, and free-form JSON attributes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::cell::lenient_text;
use super::{AttributesJson, Entity, EntityType, FieldValue, Numeric, Sequence};

/// A client row.
///
/// Every declared column is optional so that incomplete rows still decode;
/// absent columns are reported by validation, not by the decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Unique client identifier.
    #[serde(
        rename = "ClientID",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_id: Option<String>,
    /// Display name.
    #[serde(
        rename = "ClientName",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_name: Option<String>,
    /// Priority level, 1 (lowest) to 5 (highest).
    #[serde(rename = "PriorityLevel", default, skip_serializing_if = "Option::is_none")]
    pub priority_level: Option<Numeric>,
    /// Task IDs this client requests, in order.
    #[serde(rename = "RequestedTaskIDs", default, skip_serializing_if = "Option::is_none")]
    pub requested_task_ids: Option<Sequence<String>>,
    /// Client group tag.
    #[serde(
        rename = "GroupTag",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub group_tag: Option<String>,
    /// JSON-encoded attribute object.
    #[serde(rename = "AttributesJSON", default, skip_serializing_if = "Option::is_none")]
    pub attributes_json: Option<AttributesJson>,
    /// Columns outside the declared schema.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Client {
    /// Creates a client with only its identifier set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            client_id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    /// Sets the priority level.
    pub fn with_priority(mut self, level: impl Into<Numeric>) -> Self {
        self.priority_level = Some(level.into());
        self
    }

    /// Sets the requested task IDs.
    pub fn with_requested_tasks<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = ids.into_iter().map(Into::into).collect::<Vec<_>>();
        self.requested_task_ids = Some(Sequence::Items(ids));
        self
    }

    /// Sets the group tag.
    pub fn with_group(mut self, tag: impl Into<String>) -> Self {
        self.group_tag = Some(tag.into());
        self
    }

    /// Sets the attributes column.
    pub fn with_attributes(mut self, attributes: impl Into<AttributesJson>) -> Self {
        self.attributes_json = Some(attributes.into());
        self
    }

    /// Adds an extra column.
    pub fn with_extra(mut self, column: impl Into<String>, value: Value) -> Self {
        self.extra.insert(column.into(), value);
        self
    }
}

impl Entity for Client {
    const TYPE: EntityType = EntityType::Clients;
    const ID_COLUMN: &'static str = "ClientID";
    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "ClientID",
        "ClientName",
        "PriorityLevel",
        "RequestedTaskIDs",
        "GroupTag",
        "AttributesJSON",
    ];

    fn id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        let field = match name {
            "ClientID" => self.client_id.as_deref().map(FieldValue::Text),
            "ClientName" => self.client_name.as_deref().map(FieldValue::Text),
            "PriorityLevel" => self.priority_level.as_ref().map(FieldValue::Number),
            "RequestedTaskIDs" => self.requested_task_ids.as_ref().map(FieldValue::Labels),
            "GroupTag" => self.group_tag.as_deref().map(FieldValue::Text),
            "AttributesJSON" => self.attributes_json.as_ref().map(FieldValue::Attributes),
            other => self.extra.get(other).map(FieldValue::Other),
        };
        field.unwrap_or(FieldValue::Missing)
    }
}
