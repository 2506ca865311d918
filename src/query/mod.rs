//! Structured filtering and text search over entity collections.
//!
//! A [`SearchFilter`] names one collection and a set of per-column
//! criteria; a record is returned when it satisfies every criterion.
//! Filters usually come from a natural-language translator outside this
//! crate, so they are treated as untrusted: an unknown collection name is
//! reported in the outcome, never raised.
//!
//! # Usage
//!
//! ```
//! use u_schedule_audit::models::Task;
//! use u_schedule_audit::query::{apply_filter, Criterion, SearchFilter};
//!
//! let tasks = vec![
//!     Task::new("T1").with_duration(5).with_required_skills(["python"]),
//!     Task::new("T2").with_duration(5).with_required_skills(["java"]),
//!     Task::new("T3").with_duration(2).with_required_skills(["python"]),
//! ];
//! let filter = SearchFilter::new("tasks")
//!     .with_criterion("Duration", Criterion::compare(">", 3))
//!     .with_criterion("RequiredSkills", Criterion::Exact("python".into()));
//!
//! let outcome = apply_filter(&filter, &[], &[], &tasks);
//! assert_eq!(outcome.results.len(), 1);
//! assert_eq!(outcome.results[0].id(), Some("T1"));
//! ```

mod criterion;
mod text;

pub use criterion::{Comparison, Criterion, Operator};
pub use text::{search_all, simple_text_search, TextSearchHit};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::{Client, Entity, EntityType, Task, Worker};
use crate::response::decode_response;

/// Error text for a filter naming an unknown collection.
pub const INVALID_ENTITY_TYPE: &str = "Invalid entity type";
/// Error text for a response that could not be decoded into a filter.
pub const UNPROCESSABLE_QUERY: &str = "Failed to process search query";

/// A structured filter over one collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    /// Collection name; validated when the filter is applied.
    pub entity_type: String,
    /// Column name to criterion, AND-combined.
    #[serde(default)]
    pub criteria: BTreeMap<String, Criterion>,
}

impl SearchFilter {
    /// Creates a filter with no criteria, matching every record.
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            criteria: BTreeMap::new(),
        }
    }

    /// Adds a criterion on a column.
    pub fn with_criterion(mut self, column: impl Into<String>, criterion: Criterion) -> Self {
        self.criteria.insert(column.into(), criterion);
        self
    }

    /// Decodes a filter from free-form response text.
    pub fn from_response(text: &str) -> Result<Self> {
        decode_response(text)
    }

    /// Whether a record satisfies every criterion.
    pub fn matches<E: Entity>(&self, record: &E) -> bool {
        self.criteria
            .iter()
            .all(|(column, criterion)| criterion.matches(record.field(column)))
    }

    fn select<'a, E: Entity>(&self, records: &'a [E]) -> Vec<&'a E> {
        records.iter().filter(|r| self.matches(*r)).collect()
    }
}

/// A borrowed record of any collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntityRef<'a> {
    /// A client row.
    Client(&'a Client),
    /// A worker row.
    Worker(&'a Worker),
    /// A task row.
    Task(&'a Task),
}

impl<'a> EntityRef<'a> {
    /// Collection of the record.
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Client(_) => EntityType::Clients,
            Self::Worker(_) => EntityType::Workers,
            Self::Task(_) => EntityType::Tasks,
        }
    }

    /// Record identifier, if present.
    pub fn id(&self) -> Option<&'a str> {
        match *self {
            Self::Client(c) => c.id(),
            Self::Worker(w) => w.id(),
            Self::Task(t) => t.id(),
        }
    }

    /// The record as its raw row.
    pub fn to_record(&self) -> Map<String, Value> {
        match self {
            Self::Client(c) => c.to_record(),
            Self::Worker(w) => w.to_record(),
            Self::Task(t) => t.to_record(),
        }
    }
}

impl<'a> From<&'a Client> for EntityRef<'a> {
    fn from(client: &'a Client) -> Self {
        Self::Client(client)
    }
}

impl<'a> From<&'a Worker> for EntityRef<'a> {
    fn from(worker: &'a Worker) -> Self {
        Self::Worker(worker)
    }
}

impl<'a> From<&'a Task> for EntityRef<'a> {
    fn from(task: &'a Task) -> Self {
        Self::Task(task)
    }
}

/// Result of applying a filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOutcome<'a> {
    /// The filtered collection, `None` when the filter was rejected.
    pub entity_type: Option<EntityType>,
    /// Matching records in input order.
    pub results: Vec<EntityRef<'a>>,
    /// Why the filter was rejected.
    pub error: Option<String>,
}

impl FilterOutcome<'_> {
    fn rejected(error: &str) -> Self {
        Self {
            entity_type: None,
            results: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    /// Whether the filter was applied.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Applies a filter to the collection it names.
///
/// An unknown collection name yields an empty outcome carrying
/// [`INVALID_ENTITY_TYPE`].
pub fn apply_filter<'a>(
    filter: &SearchFilter,
    clients: &'a [Client],
    workers: &'a [Worker],
    tasks: &'a [Task],
) -> FilterOutcome<'a> {
    let Ok(entity_type) = filter.entity_type.parse::<EntityType>() else {
        tracing::debug!(entity_type = %filter.entity_type, "filter names an unknown collection");
        return FilterOutcome::rejected(INVALID_ENTITY_TYPE);
    };

    let results: Vec<EntityRef<'a>> = match entity_type {
        EntityType::Clients => filter.select(clients).into_iter().map(EntityRef::from).collect(),
        EntityType::Workers => filter.select(workers).into_iter().map(EntityRef::from).collect(),
        EntityType::Tasks => filter.select(tasks).into_iter().map(EntityRef::from).collect(),
    };

    tracing::debug!(
        entity_type = %entity_type,
        criteria = filter.criteria.len(),
        results = results.len(),
        "filter applied"
    );
    FilterOutcome {
        entity_type: Some(entity_type),
        results,
        error: None,
    }
}

/// Decodes a filter from response text and applies it.
///
/// Undecodable text yields an empty outcome carrying
/// [`UNPROCESSABLE_QUERY`].
pub fn apply_response<'a>(
    text: &str,
    clients: &'a [Client],
    workers: &'a [Worker],
    tasks: &'a [Task],
) -> FilterOutcome<'a> {
    match SearchFilter::from_response(text) {
        Ok(filter) => apply_filter(&filter, clients, workers, tasks),
        Err(err) => {
            tracing::warn!(error = %err, "search response could not be decoded");
            FilterOutcome::rejected(UNPROCESSABLE_QUERY)
        }
    }
}
