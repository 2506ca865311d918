//! Per-collection structural checks.
//!
//! Column presence is checked once against the first row. Duplicate IDs,
//! numeric ranges, list shapes, and JSON syntax are checked on every row.
//! A column absent from a row is not value-checked; its absence is the
//! missing-column check's concern.

use std::collections::HashSet;

use super::{ValidationError, ValidationErrorKind};
use crate::models::{AttributesJson, Client, Entity, EntityType, Numeric, Sequence, Task, Worker};

/// Row-level checks of an entity type.
pub trait RowChecks: Entity {
    /// Appends the value errors of one row.
    fn check_row(&self, row: &mut RowContext<'_>);
}

/// Validates one collection.
///
/// Returns the missing-column error (if any) first, then row errors in
/// row order.
pub fn validate_entities<E: RowChecks>(records: &[E]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let missing = match records.first() {
        Some(first) => first.missing_columns(),
        None => E::REQUIRED_COLUMNS.to_vec(),
    };
    if !missing.is_empty() {
        let columns = missing.join(", ");
        errors.push(
            ValidationError::collection(
                E::TYPE,
                columns.clone(),
                ValidationErrorKind::MissingColumn,
                format!("Missing required columns: {columns}"),
            )
            .with_suggestion(format!("Add the missing columns to your {} data", E::TYPE)),
        );
    }

    let mut seen_ids: HashSet<&str> = HashSet::new();
    for (index, record) in records.iter().enumerate() {
        let mut row = RowContext {
            entity_type: E::TYPE,
            index,
            errors: &mut errors,
        };

        if let Some(id) = record.id().filter(|id| !id.is_empty()) {
            if !seen_ids.insert(id) {
                row.push(
                    E::ID_COLUMN,
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate {}: {id}", E::ID_COLUMN),
                    format!("Ensure each {} has a unique ID", singular(E::TYPE)),
                );
            }
        }

        record.check_row(&mut row);
    }

    tracing::debug!(
        entity = %E::TYPE,
        rows = records.len(),
        errors = errors.len(),
        "structural validation finished"
    );
    errors
}

/// Error sink for the row being checked.
pub struct RowContext<'a> {
    entity_type: EntityType,
    index: usize,
    errors: &'a mut Vec<ValidationError>,
}

impl RowContext<'_> {
    fn push(
        &mut self,
        field: &str,
        kind: ValidationErrorKind,
        message: String,
        suggestion: String,
    ) {
        self.errors.push(
            ValidationError::new(self.entity_type, self.index, field, kind, message)
                .with_suggestion(suggestion),
        );
    }

    /// Requires `min <= value <= max`. Absent cells pass.
    fn range(&mut self, field: &str, cell: Option<&Numeric>, min: f64, max: f64) {
        let Some(cell) = cell else {
            return;
        };
        if !cell.value().is_some_and(|v| v >= min && v <= max) {
            self.push(
                field,
                ValidationErrorKind::OutOfRange,
                format!("{field} must be between {min} and {max}, got: {cell}"),
                format!("Set {field} to a value between {min} and {max}"),
            );
        }
    }

    /// Requires `value >= 0`. Absent cells pass.
    fn non_negative(&mut self, field: &str, cell: Option<&Numeric>) {
        let Some(cell) = cell else {
            return;
        };
        if !cell.value().is_some_and(|v| v >= 0.0) {
            self.push(
                field,
                ValidationErrorKind::OutOfRange,
                format!("{field} must be a non-negative number, got: {cell}"),
                format!("Set {field} to a non-negative number"),
            );
        }
    }

    /// Requires `value > 0`. Absent cells pass.
    fn positive(&mut self, field: &str, cell: Option<&Numeric>) {
        let Some(cell) = cell else {
            return;
        };
        if !cell.value().is_some_and(|v| v > 0.0) {
            self.push(
                field,
                ValidationErrorKind::OutOfRange,
                format!("{field} must be a positive number, got: {cell}"),
                format!("Set {field} to a positive number"),
            );
        }
    }

    /// Requires a proper list of labels.
    fn label_list(&mut self, field: &str, cell: Option<&Sequence<String>>) {
        let Some(cell) = cell.filter(|c| !c.is_blank()) else {
            return;
        };
        if let Sequence::Malformed(raw) = cell {
            match raw.as_array() {
                Some(items) => {
                    let bad: Vec<String> = items
                        .iter()
                        .filter(|v| !v.is_string())
                        .map(|v| v.to_string())
                        .collect();
                    self.push(
                        field,
                        ValidationErrorKind::MalformedList,
                        format!("{field} contains non-text values: {}", bad.join(", ")),
                        format!("Ensure all {field} entries are text values"),
                    );
                }
                None => self.not_a_list(field),
            }
        }
    }

    /// Requires a proper list whose elements are all numbers.
    fn number_list(&mut self, field: &str, noun: &str, cell: Option<&Sequence<Numeric>>) {
        let Some(cell) = cell.filter(|c| !c.is_blank()) else {
            return;
        };
        match cell {
            Sequence::Malformed(_) => self.not_a_list(field),
            Sequence::Items(items) => {
                let bad: Vec<String> = items
                    .iter()
                    .filter(|n| !n.is_number())
                    .map(|n| n.to_string())
                    .collect();
                if !bad.is_empty() {
                    self.push(
                        field,
                        ValidationErrorKind::MalformedList,
                        format!("{field} contains non-numeric values: {}", bad.join(", ")),
                        format!("Ensure all {noun} are numeric values"),
                    );
                }
            }
        }
    }

    fn not_a_list(&mut self, field: &str) {
        self.push(
            field,
            ValidationErrorKind::MalformedList,
            format!("{field} is not a valid array"),
            format!("Format {field} as a comma-separated list or JSON array"),
        );
    }

    /// Requires JSON text to parse. Decoded objects pass as-is.
    fn json(&mut self, field: &str, cell: Option<&AttributesJson>) {
        let Some(cell) = cell.filter(|c| !c.is_blank()) else {
            return;
        };
        if let Err(err) = cell.check_syntax() {
            self.push(
                field,
                ValidationErrorKind::BrokenJson,
                format!("{field} contains invalid JSON ({err})"),
                format!("Fix the JSON format in {field}"),
            );
        }
    }
}

impl RowChecks for Client {
    fn check_row(&self, row: &mut RowContext<'_>) {
        row.range("PriorityLevel", self.priority_level.as_ref(), 1.0, 5.0);
        row.label_list("RequestedTaskIDs", self.requested_task_ids.as_ref());
        row.json("AttributesJSON", self.attributes_json.as_ref());
    }
}

impl RowChecks for Worker {
    fn check_row(&self, row: &mut RowContext<'_>) {
        row.number_list("AvailableSlots", "slots", self.available_slots.as_ref());
        row.label_list("Skills", self.skills.as_ref());
        row.non_negative("MaxLoadPerPhase", self.max_load_per_phase.as_ref());
        row.non_negative("QualificationLevel", self.qualification_level.as_ref());
    }
}

impl RowChecks for Task {
    fn check_row(&self, row: &mut RowContext<'_>) {
        row.positive("Duration", self.duration.as_ref());
        row.label_list("RequiredSkills", self.required_skills.as_ref());
        row.number_list("PreferredPhases", "phases", self.preferred_phases.as_ref());
        row.non_negative("MaxConcurrent", self.max_concurrent.as_ref());
    }
}

fn singular(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Clients => "client",
        EntityType::Workers => "worker",
        EntityType::Tasks => "task",
    }
}
