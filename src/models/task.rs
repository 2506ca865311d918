//! Task model.
//!
//! A task has a duration, the skills it needs, the phases it prefers to
//! run in, and a cap on parallel executions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::cell::lenient_text;
use super::{Entity, EntityType, FieldValue, Numeric, Sequence};

/// A task row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    #[serde(
        rename = "TaskID",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub task_id: Option<String>,
    /// Duration in phases (positive).
    #[serde(rename = "Duration", default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Numeric>,
    /// Skills a worker needs to run this task.
    #[serde(rename = "RequiredSkills", default, skip_serializing_if = "Option::is_none")]
    pub required_skills: Option<Sequence<String>>,
    /// Phase numbers this task prefers.
    #[serde(rename = "PreferredPhases", default, skip_serializing_if = "Option::is_none")]
    pub preferred_phases: Option<Sequence<Numeric>>,
    /// Maximum parallel executions (non-negative).
    #[serde(rename = "MaxConcurrent", default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<Numeric>,
    /// Columns outside the declared schema.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Creates a task with only its identifier set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            task_id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Sets the duration.
    pub fn with_duration(mut self, duration: impl Into<Numeric>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    /// Sets the required skills.
    pub fn with_required_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let skills = skills.into_iter().map(Into::into).collect::<Vec<_>>();
        self.required_skills = Some(Sequence::Items(skills));
        self
    }

    /// Sets the preferred phases.
    pub fn with_phases(mut self, phases: impl IntoIterator<Item = i64>) -> Self {
        let phases = phases.into_iter().map(Numeric::from).collect::<Vec<_>>();
        self.preferred_phases = Some(Sequence::Items(phases));
        self
    }

    /// Sets the concurrency cap.
    pub fn with_max_concurrent(mut self, max: impl Into<Numeric>) -> Self {
        self.max_concurrent = Some(max.into());
        self
    }

    /// Adds an extra column.
    pub fn with_extra(mut self, column: impl Into<String>, value: Value) -> Self {
        self.extra.insert(column.into(), value);
        self
    }

    /// Required skills, or an empty slice if absent or malformed.
    pub fn required_skill_list(&self) -> &[String] {
        self.required_skills
            .as_ref()
            .and_then(|s| s.items())
            .unwrap_or(&[])
    }
}

impl Entity for Task {
    const TYPE: EntityType = EntityType::Tasks;
    const ID_COLUMN: &'static str = "TaskID";
    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "TaskID",
        "Duration",
        "RequiredSkills",
        "PreferredPhases",
        "MaxConcurrent",
    ];

    fn id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        let field = match name {
            "TaskID" => self.task_id.as_deref().map(FieldValue::Text),
            "Duration" => self.duration.as_ref().map(FieldValue::Number),
            "RequiredSkills" => self.required_skills.as_ref().map(FieldValue::Labels),
            "PreferredPhases" => self.preferred_phases.as_ref().map(FieldValue::Numbers),
            "MaxConcurrent" => self.max_concurrent.as_ref().map(FieldValue::Number),
            other => self.extra.get(other).map(FieldValue::Other),
        };
        field.unwrap_or(FieldValue::Missing)
    }
}
