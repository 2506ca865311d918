//! Scheduling rule model.
//!
//! Rules are authored by the user (or translated from plain language) and
//! reference entities only through shared identifiers: task IDs and group
//! names embedded in their parameters.
//!
//! On the wire a rule keeps the flat authoring shape:
//!
//! ```json
//! { "id": "rule-1", "type": "coRun", "description": "...",
//!   "parameters": { "taskIds": ["T1", "T2"] }, "priority": 3 }
//! ```

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user-authored scheduling rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule identifier.
    #[serde(default)]
    pub id: String,
    /// Rule variant and its parameters.
    #[serde(flatten)]
    pub kind: RuleKind,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Importance, 1 (lowest) to 10 (highest).
    #[serde(default = "default_priority")]
    pub priority: i64,
}

fn default_priority() -> i64 {
    1
}

/// Rule variants, one parameter shape each.
///
/// Parameters fall back to empty defaults when missing (the whole
/// `parameters` key or single fields) so that incomplete rules still decode
/// and can be reported by [`validate_rule`](crate::rules::validate_rule).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "parameters", rename_all = "camelCase")]
pub enum RuleKind {
    /// Listed tasks must run together.
    CoRun(CoRunParams),
    /// Members of a group must share a minimum number of slots.
    SlotRestriction(SlotRestrictionParams),
    /// Caps slots per phase for a worker group.
    LoadLimit(LoadLimitParams),
    /// Restricts a task to a set of phases.
    PhaseWindow(PhaseWindowParams),
    /// Matches a pattern against an entity field.
    PatternMatch(PatternMatchParams),
    /// Overrides scheduling priority.
    PriorityOverride(PriorityOverrideParams),
}

impl<'de> Deserialize<'de> for RuleKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        enum Tag {
            CoRun,
            SlotRestriction,
            LoadLimit,
            PhaseWindow,
            PatternMatch,
            PriorityOverride,
        }

        #[derive(Deserialize)]
        struct Tagged {
            #[serde(rename = "type")]
            tag: Tag,
            #[serde(default)]
            parameters: Option<Value>,
        }

        fn params<T: DeserializeOwned, E: de::Error>(raw: Option<Value>) -> Result<T, E> {
            match raw {
                None | Some(Value::Null) => serde_json::from_value(Value::Object(Map::new())),
                Some(value) => serde_json::from_value(value),
            }
            .map_err(E::custom)
        }

        let Tagged { tag, parameters } = Tagged::deserialize(deserializer)?;
        Ok(match tag {
            Tag::CoRun => Self::CoRun(params(parameters)?),
            Tag::SlotRestriction => Self::SlotRestriction(params(parameters)?),
            Tag::LoadLimit => Self::LoadLimit(params(parameters)?),
            Tag::PhaseWindow => Self::PhaseWindow(params(parameters)?),
            Tag::PatternMatch => Self::PatternMatch(params(parameters)?),
            Tag::PriorityOverride => Self::PriorityOverride(params(parameters)?),
        })
    }
}

/// Parameters of a co-run rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoRunParams {
    /// Tasks that run together (at least two).
    pub task_ids: Vec<String>,
}

/// Parameters of a slot-restriction rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlotRestrictionParams {
    /// Client or worker group.
    pub group: String,
    /// Minimum number of common slots (at least 1).
    pub min_common_slots: i64,
}

/// Parameters of a load-limit rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadLimitParams {
    /// Worker group the limit applies to.
    pub worker_group: String,
    /// Maximum slots per phase (at least 1).
    pub max_slots_per_phase: i64,
}

/// Parameters of a phase-window rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhaseWindowParams {
    /// Task the window applies to.
    pub task_id: String,
    /// Phases the task may run in (at least one).
    pub allowed_phases: Vec<i64>,
}

/// Parameters of a pattern-match rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatternMatchParams {
    /// Pattern text.
    pub pattern: String,
    /// Field the pattern is matched against.
    pub target_field: String,
}

/// Parameters of a priority-override rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PriorityOverrideParams {
    /// Overriding priority, 1 to 10.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

impl Rule {
    /// Creates a rule of the given kind, described by its kind summary.
    pub fn new(id: impl Into<String>, kind: RuleKind) -> Self {
        let description = kind.summary();
        Self {
            id: id.into(),
            kind,
            description,
            priority: default_priority(),
        }
    }

    /// Creates a co-run rule.
    pub fn co_run<I, S>(id: impl Into<String>, task_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let task_ids = task_ids.into_iter().map(Into::into).collect();
        Self::new(id, RuleKind::CoRun(CoRunParams { task_ids }))
    }

    /// Creates a slot-restriction rule.
    pub fn slot_restriction(
        id: impl Into<String>,
        group: impl Into<String>,
        min_common: i64,
    ) -> Self {
        Self::new(
            id,
            RuleKind::SlotRestriction(SlotRestrictionParams {
                group: group.into(),
                min_common_slots: min_common,
            }),
        )
    }

    /// Creates a load-limit rule.
    pub fn load_limit(
        id: impl Into<String>,
        worker_group: impl Into<String>,
        max_slots: i64,
    ) -> Self {
        Self::new(
            id,
            RuleKind::LoadLimit(LoadLimitParams {
                worker_group: worker_group.into(),
                max_slots_per_phase: max_slots,
            }),
        )
    }

    /// Creates a phase-window rule.
    pub fn phase_window(
        id: impl Into<String>,
        task_id: impl Into<String>,
        phases: impl IntoIterator<Item = i64>,
    ) -> Self {
        Self::new(
            id,
            RuleKind::PhaseWindow(PhaseWindowParams {
                task_id: task_id.into(),
                allowed_phases: phases.into_iter().collect(),
            }),
        )
    }

    /// Creates a pattern-match rule.
    pub fn pattern_match(
        id: impl Into<String>,
        pattern: impl Into<String>,
        target_field: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            RuleKind::PatternMatch(PatternMatchParams {
                pattern: pattern.into(),
                target_field: target_field.into(),
            }),
        )
    }

    /// Creates a priority-override rule.
    pub fn priority_override(id: impl Into<String>, priority: i64) -> Self {
        Self::new(
            id,
            RuleKind::PriorityOverride(PriorityOverrideParams {
                priority: Some(priority),
            }),
        )
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the rule priority.
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    /// Wire name of the rule variant (`"coRun"`, ...).
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

impl RuleKind {
    /// Wire name of the variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::CoRun(_) => "coRun",
            Self::SlotRestriction(_) => "slotRestriction",
            Self::LoadLimit(_) => "loadLimit",
            Self::PhaseWindow(_) => "phaseWindow",
            Self::PatternMatch(_) => "patternMatch",
            Self::PriorityOverride(_) => "priorityOverride",
        }
    }

    /// One-line human summary of the parameters.
    pub fn summary(&self) -> String {
        match self {
            Self::CoRun(p) => format!("Run tasks {} together", p.task_ids.join(", ")),
            Self::SlotRestriction(p) => format!(
                "Group {} needs at least {} common slots",
                p.group, p.min_common_slots
            ),
            Self::LoadLimit(p) => format!(
                "Worker group {} takes at most {} slots per phase",
                p.worker_group, p.max_slots_per_phase
            ),
            Self::PhaseWindow(p) => {
                let phases: Vec<String> = p.allowed_phases.iter().map(|n| n.to_string()).collect();
                format!("Task {} runs only in phases {}", p.task_id, phases.join(", "))
            }
            Self::PatternMatch(p) => format!("Match '{}' against {}", p.pattern, p.target_field),
            Self::PriorityOverride(p) => match p.priority {
                Some(n) => format!("Override priority to {n}"),
                None => "Override priority".to_string(),
            },
        }
    }
}
