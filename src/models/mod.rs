//! Scheduling dataset models.
//!
//! Three tabular collections describe an allocation problem, plus the
//! rules and priority settings a user layers on top of them.
//!
//! # Collections
//!
//! | Entity | Identifier | Required columns |
//! |--------|-----------|------------------|
//! | Client | ClientID | ClientName, PriorityLevel, RequestedTaskIDs, GroupTag, AttributesJSON |
//! | Worker | WorkerID | Skills, AvailableSlots, MaxLoadPerPhase, WorkerGroup, QualificationLevel |
//! | Task | TaskID | Duration, RequiredSkills, PreferredPhases, MaxConcurrent |
//!
//! Records are typed per collection; columns outside the schema are kept
//! in each record's `extra` map.

mod cell;
mod client;
mod entity;
mod priority;
mod rule;
mod task;
mod worker;

pub use cell::{AttributesJson, Numeric, Sequence};
pub use client::Client;
pub use entity::{Entity, EntityType, FieldValue};
pub use priority::{
    Preset, PriorityCriterion, PrioritySettings, PriorityWeights, MAX_WEIGHT, MIN_WEIGHT,
};
pub use rule::{
    CoRunParams, LoadLimitParams, PatternMatchParams, PhaseWindowParams, PriorityOverrideParams,
    Rule, RuleKind, SlotRestrictionParams,
};
pub use task::Task;
pub use worker::Worker;
