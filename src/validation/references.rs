//! Cross-collection checks.
//!
//! Only well-formed list cells take part: a malformed list has already been
//! reported by the structural pass and is skipped here.

use std::collections::HashSet;

use super::{ValidationError, ValidationErrorKind};
use crate::models::{Client, EntityType, Task, Worker};

/// Checks references between collections.
///
/// 1. Every requested task ID resolves to a task.
/// 2. Every required skill is held by at least one worker.
pub fn validate_references(
    clients: &[Client],
    workers: &[Worker],
    tasks: &[Task],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let task_ids: HashSet<&str> = tasks.iter().filter_map(|t| t.task_id.as_deref()).collect();
    for (row, client) in clients.iter().enumerate() {
        let Some(requested) = client.requested_task_ids.as_ref().and_then(|s| s.items()) else {
            continue;
        };
        for task_id in requested {
            if !task_ids.contains(task_id.as_str()) {
                errors.push(
                    ValidationError::new(
                        EntityType::Clients,
                        row,
                        "RequestedTaskIDs",
                        ValidationErrorKind::UnknownReference,
                        format!("Unknown TaskID referenced: {task_id}"),
                    )
                    .with_suggestion("Ensure all referenced TaskIDs exist in the tasks data"),
                );
            }
        }
    }

    let skills: HashSet<&str> = workers
        .iter()
        .filter_map(|w| w.skills.as_ref().and_then(|s| s.items()))
        .flatten()
        .map(String::as_str)
        .collect();
    for (row, task) in tasks.iter().enumerate() {
        for skill in task.required_skill_list() {
            if !skills.contains(skill.as_str()) {
                errors.push(
                    ValidationError::new(
                        EntityType::Tasks,
                        row,
                        "RequiredSkills",
                        ValidationErrorKind::SkillCoverage,
                        format!("No worker has the required skill: {skill}"),
                    )
                    .with_suggestion("Add workers with this skill or update the required skills"),
                );
            }
        }
    }

    tracing::debug!(errors = errors.len(), "reference validation finished");
    errors
}
