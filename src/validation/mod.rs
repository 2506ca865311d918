//! Input validation for scheduling datasets.
//!
//! Checks the structural integrity of each collection, then the references
//! between collections. Detects:
//! - Missing required columns
//! - Duplicate IDs
//! - Out-of-range numeric values
//! - Malformed list columns
//! - Broken JSON in `AttributesJSON`
//! - Requested tasks that do not exist
//! - Required skills no worker has
//!
//! Every check runs on every row; a bad row never hides problems in the
//! rows after it. Validation is a pure function of its input and returns
//! the full error list on each call.
//!
//! # Example
//!
//! ```
//! use u_schedule_audit::models::{Client, Task, Worker};
//! use u_schedule_audit::validation::{validate_all, ValidationErrorKind};
//!
//! let clients = vec![Client::new("C1").with_requested_tasks(["T9"])];
//! let errors = validate_all(&clients, &[] as &[Worker], &[] as &[Task]);
//! assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::UnknownReference));
//! ```

mod references;
mod report;
mod structural;

pub use references::validate_references;
pub use report::ValidationReport;
pub use structural::{validate_entities, RowChecks};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::models::{Client, EntityType, Task, Worker};

/// Row index of errors that apply to a whole collection.
pub const COLLECTION_ROW: i64 = -1;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Collection the error belongs to.
    pub entity_type: EntityType,
    /// Position of the row in its input, or [`COLLECTION_ROW`].
    pub row_index: i64,
    /// Column name (comma-joined for missing-column errors).
    pub field: String,
    /// Error category.
    #[serde(rename = "errorType")]
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Suggested fix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationErrorKind {
    /// Required columns are absent from the collection.
    MissingColumn,
    /// Two rows share the same ID.
    DuplicateId,
    /// A list column is not a proper list, or holds wrongly-typed elements.
    MalformedList,
    /// A numeric column is outside its allowed range.
    OutOfRange,
    /// `AttributesJSON` is not valid JSON.
    BrokenJson,
    /// A row references an ID that does not exist.
    UnknownReference,
    /// A dependency chain loops back on itself.
    CircularDependency,
    /// Two rules cannot both hold.
    ConflictingRules,
    /// A required skill is held by no worker.
    SkillCoverage,
}

impl ValidationErrorKind {
    /// All kinds, in reporting order.
    pub const ALL: [ValidationErrorKind; 9] = [
        Self::MissingColumn,
        Self::DuplicateId,
        Self::MalformedList,
        Self::OutOfRange,
        Self::BrokenJson,
        Self::UnknownReference,
        Self::CircularDependency,
        Self::ConflictingRules,
        Self::SkillCoverage,
    ];

    /// Wire tag of the kind (`"missingColumn"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingColumn => "missingColumn",
            Self::DuplicateId => "duplicateId",
            Self::MalformedList => "malformedList",
            Self::OutOfRange => "outOfRange",
            Self::BrokenJson => "brokenJson",
            Self::UnknownReference => "unknownReference",
            Self::CircularDependency => "circularDependency",
            Self::ConflictingRules => "conflictingRules",
            Self::SkillCoverage => "skillCoverage",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ValidationError {
    /// Creates an error for a single row.
    pub fn new(
        entity_type: EntityType,
        row_index: usize,
        field: impl Into<String>,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            entity_type,
            row_index: i64::try_from(row_index).unwrap_or(i64::MAX),
            field: field.into(),
            kind,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Creates an error that applies to a whole collection.
    pub fn collection(
        entity_type: EntityType,
        field: impl Into<String>,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            entity_type,
            row_index: COLLECTION_ROW,
            field: field.into(),
            kind,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Attaches a suggested fix.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Whether the error applies to the whole collection.
    pub fn is_collection_wide(&self) -> bool {
        self.row_index == COLLECTION_ROW
    }
}

/// Dataset-level dependency check run after the reference checks.
///
/// This is where prerequisite chains between task rows would be verified
/// once tasks carry explicit dependency columns. It is separate from the
/// co-run cycle detection in [`crate::rules`], which looks at rules rather
/// than data.
pub trait DependencyCheck: Send + Sync + fmt::Debug {
    /// Check name, for logging.
    fn name(&self) -> &'static str;

    /// Returns dependency errors found in the dataset.
    fn check(&self, clients: &[Client], workers: &[Worker], tasks: &[Task]) -> Vec<ValidationError>;
}

/// Dependency check that finds nothing. Task rows have no dependency
/// columns yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDependencyCheck;

impl DependencyCheck for NoDependencyCheck {
    fn name(&self) -> &'static str {
        "none"
    }

    fn check(&self, _: &[Client], _: &[Worker], _: &[Task]) -> Vec<ValidationError> {
        Vec::new()
    }
}

/// Configurable validation pipeline.
///
/// # Example
/// ```
/// use u_schedule_audit::validation::Validator;
///
/// let validator = Validator::new().with_cross_entity(false);
/// let errors = validator.validate(&[], &[], &[]);
/// assert_eq!(errors.len(), 3); // one missing-column error per empty collection
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    cross_entity: bool,
    dependency_check: Arc<dyn DependencyCheck>,
}

impl Validator {
    /// Structural and cross-entity checks, no dependency check.
    pub fn new() -> Self {
        Self {
            cross_entity: true,
            dependency_check: Arc::new(NoDependencyCheck),
        }
    }

    /// Enables or disables the cross-entity reference checks.
    pub fn with_cross_entity(mut self, enabled: bool) -> Self {
        self.cross_entity = enabled;
        self
    }

    /// Installs a dataset-level dependency check.
    pub fn with_dependency_check<D: DependencyCheck + 'static>(mut self, check: D) -> Self {
        self.dependency_check = Arc::new(check);
        self
    }

    /// Validates a dataset.
    ///
    /// Errors are ordered clients, workers, tasks, then cross-entity, then
    /// dependency errors; within each group by row.
    pub fn validate(
        &self,
        clients: &[Client],
        workers: &[Worker],
        tasks: &[Task],
    ) -> Vec<ValidationError> {
        let mut errors = validate_entities(clients);
        errors.extend(validate_entities(workers));
        errors.extend(validate_entities(tasks));

        if self.cross_entity {
            errors.extend(validate_references(clients, workers, tasks));
            errors.extend(self.dependency_check.check(clients, workers, tasks));
        }

        tracing::debug!(
            clients = clients.len(),
            workers = workers.len(),
            tasks = tasks.len(),
            errors = errors.len(),
            dependency_check = self.dependency_check.name(),
            "dataset validated"
        );
        errors
    }

    /// Validates a dataset and wraps the errors in a report.
    pub fn report(
        &self,
        clients: &[Client],
        workers: &[Worker],
        tasks: &[Task],
    ) -> ValidationReport {
        ValidationReport::new(self.validate(clients, workers, tasks))
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates a dataset with the default pipeline.
///
/// Structural errors for clients, workers, and tasks, followed by
/// cross-entity errors.
pub fn validate_all(
    clients: &[Client],
    workers: &[Worker],
    tasks: &[Task],
) -> Vec<ValidationError> {
    Validator::new().validate(clients, workers, tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Entity;
    use crate::query::{apply_filter, simple_text_search, Criterion, SearchFilter};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use serde::de::DeserializeOwned;
    use serde_json::{json, Map, Value};

    const LABELS: [&str; 4] = ["python", "java", "sql", "T1"];

    fn sample_clients() -> Vec<Client> {
        vec![
            Client::new("C1")
                .with_name("Acme")
                .with_priority(3)
                .with_requested_tasks(["T1", "T2"])
                .with_group("GroupA")
                .with_attributes(r#"{"location":"north"}"#),
            Client::new("C2")
                .with_name("Globex")
                .with_priority(5)
                .with_requested_tasks(["T2"])
                .with_group("GroupB")
                .with_attributes("{}"),
        ]
    }

    fn sample_workers() -> Vec<Worker> {
        vec![
            Worker::new("W1")
                .with_skills(["python", "sql"])
                .with_slots([1, 2, 3])
                .with_max_load(2)
                .with_group("GroupA")
                .with_qualification(3),
            Worker::new("W2")
                .with_skills(["java"])
                .with_slots([2, 4])
                .with_max_load(1)
                .with_group("GroupB")
                .with_qualification(1),
        ]
    }

    fn sample_tasks() -> Vec<Task> {
        vec![
            Task::new("T1")
                .with_duration(2)
                .with_required_skills(["python"])
                .with_phases([1, 2])
                .with_max_concurrent(1),
            Task::new("T2")
                .with_duration(1)
                .with_required_skills(["java", "sql"])
                .with_phases([2, 3, 4])
                .with_max_concurrent(2),
        ]
    }

    #[derive(Debug)]
    struct EveryTaskDepends;

    impl DependencyCheck for EveryTaskDepends {
        fn name(&self) -> &'static str {
            "every-task"
        }

        fn check(&self, _: &[Client], _: &[Worker], tasks: &[Task]) -> Vec<ValidationError> {
            tasks
                .iter()
                .enumerate()
                .map(|(row, _)| {
                    ValidationError::new(
                        EntityType::Tasks,
                        row,
                        "TaskID",
                        ValidationErrorKind::CircularDependency,
                        "loop",
                    )
                })
                .collect()
        }
    }

    #[test]
    fn test_valid_dataset() {
        let errors = validate_all(&sample_clients(), &sample_workers(), &sample_tasks());
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn test_empty_dataset_reports_missing_columns() {
        let errors = validate_all(&[], &[], &[]);
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::MissingColumn && e.is_collection_wide()));
        assert_eq!(errors[0].entity_type, EntityType::Clients);
        assert_eq!(errors[1].entity_type, EntityType::Workers);
        assert_eq!(errors[2].entity_type, EntityType::Tasks);
    }

    #[test]
    fn test_error_order_structural_then_cross() {
        let mut clients = sample_clients();
        clients[0] = clients[0].clone().with_priority(9);
        clients[1] = clients[1].clone().with_requested_tasks(["T9"]);

        let errors = validate_all(&clients, &sample_workers(), &sample_tasks());
        let kinds: Vec<_> = errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ValidationErrorKind::OutOfRange, ValidationErrorKind::UnknownReference]
        );
    }

    #[test]
    fn test_cross_entity_can_be_disabled() {
        let clients = vec![sample_clients()[0].clone().with_requested_tasks(["T9"])];
        let validator = Validator::new().with_cross_entity(false);
        assert!(validator
            .validate(&clients, &sample_workers(), &sample_tasks())
            .is_empty());
    }

    #[test]
    fn test_dependency_check_extension_point() {
        let validator = Validator::new().with_dependency_check(EveryTaskDepends);
        let errors = validator.validate(&sample_clients(), &sample_workers(), &sample_tasks());
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::CircularDependency));
    }

    #[test]
    fn test_default_dependency_check_is_silent() {
        let check = NoDependencyCheck;
        assert!(check
            .check(&sample_clients(), &sample_workers(), &sample_tasks())
            .is_empty());
    }

    #[test]
    fn test_error_wire_shape() {
        let err = ValidationError::collection(
            EntityType::Tasks,
            "Duration",
            ValidationErrorKind::MissingColumn,
            "Missing required columns: Duration",
        )
        .with_suggestion("Add it");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["entityType"], "tasks");
        assert_eq!(json["rowIndex"], -1);
        assert_eq!(json["errorType"], "missingColumn");
        assert_eq!(json["suggestion"], "Add it");
    }

    #[test]
    fn test_validation_is_deterministic() {
        let mut clients = sample_clients();
        clients.push(Client::new("C1").with_priority(0));
        let a = validate_all(&clients, &sample_workers(), &sample_tasks());
        let b = validate_all(&clients, &sample_workers(), &sample_tasks());
        assert_eq!(a, b);
    }

    fn random_cell(rng: &mut StdRng) -> Value {
        let label = |rng: &mut StdRng| LABELS[rng.random_range(0..LABELS.len())];
        match rng.random_range(0..12) {
            0 => Value::Null,
            1 => json!(rng.random_bool(0.5)),
            2 => json!(rng.random_range(-2..8)),
            3 => json!(rng.random_range(-1.0..6.0)),
            4 => json!(""),
            5 => json!(rng.random_range(0..6).to_string()),
            6 => json!(format!("{},{}", label(rng), label(rng))),
            7 => json!([label(rng), label(rng)]),
            8 => json!([rng.random_range(1..5), label(rng)]),
            9 => json!([rng.random_range(1..5), rng.random_range(1..5)]),
            10 => json!({"location": label(rng), "tier": rng.random_range(1..3)}),
            _ => {
                let text = ["{\"tier\": 1}", "{broken"][rng.random_range(0..2)];
                json!(text)
            }
        }
    }

    fn random_records<E: DeserializeOwned>(
        rng: &mut StdRng,
        columns: &[&str],
        prefix: &str,
    ) -> Vec<E> {
        let len = rng.random_range(0..6);
        (0..len)
            .map(|_| {
                let mut row = Map::new();
                for (n, column) in columns.iter().enumerate() {
                    if rng.random_bool(0.2) {
                        continue;
                    }
                    let cell = if n == 0 && rng.random_bool(0.7) {
                        json!(format!("{prefix}{}", rng.random_range(1..4)))
                    } else {
                        random_cell(rng)
                    };
                    row.insert(column.to_string(), cell);
                }
                if rng.random_bool(0.3) {
                    row.insert("Notes".to_string(), random_cell(rng));
                }
                serde_json::from_value(Value::Object(row)).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_random_datasets_are_total_and_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..60 {
            let clients: Vec<Client> = random_records(&mut rng, Client::REQUIRED_COLUMNS, "C");
            let workers: Vec<Worker> = random_records(&mut rng, Worker::REQUIRED_COLUMNS, "W");
            let tasks: Vec<Task> = random_records(&mut rng, Task::REQUIRED_COLUMNS, "T");

            let errors = validate_all(&clients, &workers, &tasks);
            assert_eq!(errors, validate_all(&clients, &workers, &tasks));
            for err in &errors {
                let rows = match err.entity_type {
                    EntityType::Clients => clients.len(),
                    EntityType::Workers => workers.len(),
                    EntityType::Tasks => tasks.len(),
                };
                assert!(err.row_index == COLLECTION_ROW || (err.row_index as usize) < rows);
            }

            let operators = [">", "count>", "includes", "~"];
            let criterion: Criterion = match rng.random_range(0..3) {
                0 => Criterion::compare(operators[rng.random_range(0..4)], 1),
                1 => Criterion::Any(vec![json!("python"), json!(2)]),
                _ => serde_json::from_value(random_cell(&mut rng)).unwrap(),
            };
            let largest = clients.len().max(workers.len()).max(tasks.len());
            for (entity_type, columns) in [
                ("clients", Client::REQUIRED_COLUMNS),
                ("workers", Worker::REQUIRED_COLUMNS),
                ("tasks", Task::REQUIRED_COLUMNS),
            ] {
                for column in columns {
                    let filter = SearchFilter::new(entity_type)
                        .with_criterion(*column, criterion.clone());
                    let outcome = apply_filter(&filter, &clients, &workers, &tasks);
                    assert!(outcome.is_ok());
                    assert!(outcome.results.len() <= largest);
                }
            }

            assert!(simple_text_search("python", &workers).len() <= workers.len());
            assert_eq!(simple_text_search("", &tasks).len(), tasks.len());
        }
    }
}
