//! Worker model.
//!
//! A worker offers a set of skills, the phase slots it is available in,
//! and a per-phase load cap.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::cell::lenient_text;
use super::{Entity, EntityType, FieldValue, Numeric, Sequence};

/// A worker row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique worker identifier.
    #[serde(
        rename = "WorkerID",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub worker_id: Option<String>,
    /// Skills this worker has.
    #[serde(rename = "Skills", default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Sequence<String>>,
    /// Phase numbers the worker is available in.
    #[serde(rename = "AvailableSlots", default, skip_serializing_if = "Option::is_none")]
    pub available_slots: Option<Sequence<Numeric>>,
    /// Maximum tasks per phase (non-negative).
    #[serde(rename = "MaxLoadPerPhase", default, skip_serializing_if = "Option::is_none")]
    pub max_load_per_phase: Option<Numeric>,
    /// Worker group name.
    #[serde(
        rename = "WorkerGroup",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub worker_group: Option<String>,
    /// Qualification level (non-negative).
    #[serde(rename = "QualificationLevel", default, skip_serializing_if = "Option::is_none")]
    pub qualification_level: Option<Numeric>,
    /// Columns outside the declared schema.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Worker {
    /// Creates a worker with only its identifier set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            worker_id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Sets the skills.
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let skills = skills.into_iter().map(Into::into).collect::<Vec<_>>();
        self.skills = Some(Sequence::Items(skills));
        self
    }

    /// Sets the available phase slots.
    pub fn with_slots(mut self, slots: impl IntoIterator<Item = i64>) -> Self {
        let slots = slots.into_iter().map(Numeric::from).collect::<Vec<_>>();
        self.available_slots = Some(Sequence::Items(slots));
        self
    }

    /// Sets the per-phase load cap.
    pub fn with_max_load(mut self, max: impl Into<Numeric>) -> Self {
        self.max_load_per_phase = Some(max.into());
        self
    }

    /// Sets the worker group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.worker_group = Some(group.into());
        self
    }

    /// Sets the qualification level.
    pub fn with_qualification(mut self, level: impl Into<Numeric>) -> Self {
        self.qualification_level = Some(level.into());
        self
    }

    /// Adds an extra column.
    pub fn with_extra(mut self, column: impl Into<String>, value: Value) -> Self {
        self.extra.insert(column.into(), value);
        self
    }

    /// Whether this worker has a given skill.
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.as_ref().is_some_and(|s| s.contains(skill))
    }
}

impl Entity for Worker {
    const TYPE: EntityType = EntityType::Workers;
    const ID_COLUMN: &'static str = "WorkerID";
    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "WorkerID",
        "Skills",
        "AvailableSlots",
        "MaxLoadPerPhase",
        "WorkerGroup",
        "QualificationLevel",
    ];

    fn id(&self) -> Option<&str> {
        self.worker_id.as_deref()
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        let field = match name {
            "WorkerID" => self.worker_id.as_deref().map(FieldValue::Text),
            "Skills" => self.skills.as_ref().map(FieldValue::Labels),
            "AvailableSlots" => self.available_slots.as_ref().map(FieldValue::Numbers),
            "MaxLoadPerPhase" => self.max_load_per_phase.as_ref().map(FieldValue::Number),
            "WorkerGroup" => self.worker_group.as_deref().map(FieldValue::Text),
            "QualificationLevel" => self.qualification_level.as_ref().map(FieldValue::Number),
            other => self.extra.get(other).map(FieldValue::Other),
        };
        field.unwrap_or(FieldValue::Missing)
    }
}
