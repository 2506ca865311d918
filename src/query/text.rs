//! Keyword search that needs no structured filter.

use serde::Serialize;
use serde_json::{Number, Value};

use super::EntityRef;
use crate::models::{Client, Entity, EntityType, Task, Worker};

/// Records whose columns contain `query`, case-insensitively.
///
/// Text columns are matched directly, numbers and booleans by their text
/// form, lists when any element matches, and objects by their JSON text.
/// An empty query returns every record.
pub fn simple_text_search<'a, E: Entity>(query: &str, records: &'a [E]) -> Vec<&'a E> {
    if query.is_empty() {
        return records.iter().collect();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| record.to_record().values().any(|v| value_contains(v, &needle)))
        .collect()
}

fn value_contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => number_text(n).contains(needle),
        Value::Bool(b) => b.to_string().contains(needle),
        Value::Array(items) => items.iter().any(|item| match item {
            Value::String(s) => s.to_lowercase().contains(needle),
            Value::Number(n) => number_text(n).contains(needle),
            other => other.to_string().to_lowercase().contains(needle),
        }),
        Value::Object(_) => value.to_string().to_lowercase().contains(needle),
    }
}

/// Shortest text of a number: integral floats drop the `.0`.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < 1e15 => (v as i64).to_string(),
        _ => n.to_string(),
    }
}

/// The collection picked by [`search_all`] and its matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSearchHit<'a> {
    /// Collection with the most matches.
    pub entity_type: EntityType,
    /// Its matching records, in input order.
    pub results: Vec<EntityRef<'a>>,
}

/// Searches all three collections and keeps the one with the most matches.
///
/// Ties go to clients, then workers, then tasks. `None` when nothing
/// matches anywhere.
pub fn search_all<'a>(
    query: &str,
    clients: &'a [Client],
    workers: &'a [Worker],
    tasks: &'a [Task],
) -> Option<TextSearchHit<'a>> {
    let candidates = [
        hit(EntityType::Clients, simple_text_search(query, clients)),
        hit(EntityType::Workers, simple_text_search(query, workers)),
        hit(EntityType::Tasks, simple_text_search(query, tasks)),
    ];

    let mut best: Option<TextSearchHit<'a>> = None;
    for candidate in candidates {
        let better = match &best {
            Some(current) => candidate.results.len() > current.results.len(),
            None => !candidate.results.is_empty(),
        };
        if better {
            best = Some(candidate);
        }
    }

    tracing::debug!(
        query,
        entity_type = best.as_ref().map(|h| h.entity_type.as_str()),
        results = best.as_ref().map_or(0, |h| h.results.len()),
        "text search finished"
    );
    best
}

fn hit<'a, E>(entity_type: EntityType, records: Vec<&'a E>) -> TextSearchHit<'a>
where
    &'a E: Into<EntityRef<'a>>,
{
    TextSearchHit {
        entity_type,
        results: records.into_iter().map(Into::into).collect(),
    }
}
