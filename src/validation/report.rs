//! Validation report: counts and filtered views over an error list.

use serde::Serialize;

use super::{ValidationError, ValidationErrorKind};
use crate::models::EntityType;

/// The result of one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Wraps an error list.
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// Whether no errors were found.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether the report holds no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// All errors, in validation order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consumes the report, returning the errors.
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Number of errors of a kind.
    pub fn count_kind(&self, kind: ValidationErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }

    /// Number of errors in a collection.
    pub fn count_entity(&self, entity_type: EntityType) -> usize {
        self.errors
            .iter()
            .filter(|e| e.entity_type == entity_type)
            .count()
    }

    /// Non-zero counts per kind, in taxonomy order.
    pub fn kind_counts(&self) -> Vec<(ValidationErrorKind, usize)> {
        ValidationErrorKind::ALL
            .iter()
            .map(|&kind| (kind, self.count_kind(kind)))
            .filter(|&(_, n)| n > 0)
            .collect()
    }

    /// Errors of one collection.
    pub fn for_entity(&self, entity_type: EntityType) -> Vec<&ValidationError> {
        self.errors
            .iter()
            .filter(|e| e.entity_type == entity_type)
            .collect()
    }

    /// Errors whose message, field, or kind tag contains `query`,
    /// case-insensitively. A blank query matches every error.
    pub fn search(&self, query: &str) -> Vec<&ValidationError> {
        let query = query.trim().to_lowercase();
        self.errors
            .iter()
            .filter(|e| {
                query.is_empty()
                    || e.message.to_lowercase().contains(&query)
                    || e.field.to_lowercase().contains(&query)
                    || e.kind.as_str().to_lowercase().contains(&query)
            })
            .collect()
    }
}

impl From<Vec<ValidationError>> for ValidationReport {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::new(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ValidationReport {
        ValidationReport::new(vec![
            ValidationError::new(
                EntityType::Clients,
                0,
                "PriorityLevel",
                ValidationErrorKind::OutOfRange,
                "PriorityLevel must be between 1 and 5, got: 9",
            ),
            ValidationError::new(
                EntityType::Clients,
                2,
                "ClientID",
                ValidationErrorKind::DuplicateId,
                "Duplicate ClientID: C1",
            ),
            ValidationError::new(
                EntityType::Tasks,
                1,
                "RequiredSkills",
                ValidationErrorKind::SkillCoverage,
                "No worker has the required skill: cobol",
            ),
        ])
    }

    #[test]
    fn test_counts() {
        let report = sample();
        assert_eq!(report.len(), 3);
        assert!(!report.is_clean());
        assert_eq!(report.count_entity(EntityType::Clients), 2);
        assert_eq!(report.count_entity(EntityType::Workers), 0);
        assert_eq!(report.count_kind(ValidationErrorKind::DuplicateId), 1);
        assert_eq!(
            report.kind_counts(),
            vec![
                (ValidationErrorKind::DuplicateId, 1),
                (ValidationErrorKind::OutOfRange, 1),
                (ValidationErrorKind::SkillCoverage, 1),
            ]
        );
    }

    #[test]
    fn test_search() {
        let report = sample();
        assert_eq!(report.search("COBOL").len(), 1);
        assert_eq!(report.search("priority").len(), 1);
        assert_eq!(report.search("duplicateid").len(), 1);
        assert_eq!(report.search("  ").len(), 3);
        assert!(report.search("missing").is_empty());
    }

    #[test]
    fn test_for_entity() {
        let report = sample();
        let tasks = report.for_entity(EntityType::Tasks);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].field, "RequiredSkills");
    }

    #[test]
    fn test_empty_report() {
        let report = ValidationReport::default();
        assert!(report.is_clean());
        assert!(report.kind_counts().is_empty());
    }
}
