//! Rule consistency analysis.
//!
//! Three independent checks over a rule list:
//! - per-rule parameter validation ([`validate_rule`])
//! - co-run cycle detection ([`detect_cycles`])
//! - pairwise conflict detection ([`detect_conflicts`])
//!
//! [`analyze_rules`] runs all three and can fold the graph findings into
//! the dataset's [`ValidationError`] list.
//!
//! # Usage
//!
//! ```
//! use u_schedule_audit::models::Rule;
//! use u_schedule_audit::rules::{detect_conflicts, validate_rule};
//!
//! let rules = vec![
//!     Rule::phase_window("a", "T1", [1, 2]),
//!     Rule::phase_window("b", "T1", [3, 4]),
//! ];
//! assert!(rules.iter().all(|r| validate_rule(r).is_valid));
//! assert_eq!(detect_conflicts(&rules).conflicts.len(), 1);
//! ```

mod conflicts;
mod graph;
mod io;

pub use conflicts::{detect_conflicts, ConflictKind, ConflictReport, RuleConflict};
pub use graph::{detect_cycles, CycleReport};
pub use io::{export_rules, import_rules};

use regex::Regex;
use serde::Serialize;

use crate::models::{EntityType, Rule, RuleKind};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Lowest allowed rule priority.
pub const MIN_RULE_PRIORITY: i64 = 1;
/// Highest allowed rule priority.
pub const MAX_RULE_PRIORITY: i64 = 10;

/// Outcome of validating one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCheck {
    /// Whether the rule has no errors.
    pub is_valid: bool,
    /// Authoring feedback, one message per problem.
    pub errors: Vec<String>,
}

/// Checks a rule's variant parameters, description, and priority.
///
/// Messages are plain strings meant for immediate authoring feedback.
pub fn validate_rule(rule: &Rule) -> RuleCheck {
    let mut errors = Vec::new();
    let priority_range = MIN_RULE_PRIORITY..=MAX_RULE_PRIORITY;

    match &rule.kind {
        RuleKind::CoRun(p) => {
            if p.task_ids.len() < 2 {
                errors.push("Co-run rule requires at least two task IDs".to_string());
            }
        }
        RuleKind::SlotRestriction(p) => {
            if p.group.trim().is_empty() {
                errors.push("Slot restriction rule requires a group".to_string());
            }
            if p.min_common_slots < 1 {
                errors.push(
                    "Slot restriction rule requires a positive number of minimum common slots"
                        .to_string(),
                );
            }
        }
        RuleKind::LoadLimit(p) => {
            if p.worker_group.trim().is_empty() {
                errors.push("Load limit rule requires a worker group".to_string());
            }
            if p.max_slots_per_phase < 1 {
                errors.push(
                    "Load limit rule requires a positive number of maximum slots per phase"
                        .to_string(),
                );
            }
        }
        RuleKind::PhaseWindow(p) => {
            if p.task_id.trim().is_empty() {
                errors.push("Phase window rule requires a task ID".to_string());
            }
            if p.allowed_phases.is_empty() {
                errors.push("Phase window rule requires at least one allowed phase".to_string());
            }
        }
        RuleKind::PatternMatch(p) => {
            if p.pattern.is_empty() {
                errors.push("Pattern match rule requires a pattern".to_string());
            } else if Regex::new(&p.pattern).is_err() {
                errors.push(format!(
                    "Pattern match rule has an invalid pattern \
                     (look-around and backreferences are not supported): {}",
                    p.pattern
                ));
            }
            if p.target_field.trim().is_empty() {
                errors.push("Pattern match rule requires a target field".to_string());
            }
        }
        RuleKind::PriorityOverride(p) => {
            if !p.priority.is_some_and(|n| priority_range.contains(&n)) {
                errors.push(
                    "Priority override rule requires a priority value between 1 and 10".to_string(),
                );
            }
        }
    }

    if rule.description.trim().is_empty() {
        errors.push("Rule description is required".to_string());
    }
    if !priority_range.contains(&rule.priority) {
        errors.push(format!(
            "Rule priority must be between 1 and 10, got: {}",
            rule.priority
        ));
    }

    RuleCheck {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// A rule that failed [`validate_rule`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidRule<'a> {
    /// The offending rule.
    pub rule: &'a Rule,
    /// Its error messages.
    pub errors: Vec<String>,
}

/// Combined result of all rule checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleAnalysis<'a> {
    /// Rules with parameter problems, in list order.
    pub invalid: Vec<InvalidRule<'a>>,
    /// Co-run cycles.
    pub cycles: CycleReport,
    /// Conflicting rule pairs.
    pub conflicts: ConflictReport<'a>,
}

impl RuleAnalysis<'_> {
    /// Whether every rule is valid and nothing loops or conflicts.
    pub fn is_consistent(&self) -> bool {
        self.invalid.is_empty() && !self.cycles.has_cycles && !self.conflicts.has_conflicts
    }

    /// Cycles and conflicts as collection-wide validation errors.
    ///
    /// Cycles become `circularDependency` errors on tasks. Conflicts become
    /// `conflictingRules` errors on tasks (phase windows) or workers (load
    /// limits). Parameter problems stay with [`RuleAnalysis::invalid`].
    pub fn to_validation_errors(&self) -> Vec<ValidationError> {
        let cycles = self.cycles.cycles.iter().map(|cycle| {
            ValidationError::collection(
                EntityType::Tasks,
                "TaskID",
                ValidationErrorKind::CircularDependency,
                format!("Circular co-run dependency: {}", cycle.join(" -> ")),
            )
            .with_suggestion("Review co-run rules that share tasks")
        });

        let conflicts = self.conflicts.conflicts.iter().map(|conflict| {
            let field = match conflict.kind {
                ConflictKind::PhaseWindow => "TaskID",
                ConflictKind::LoadLimit => "WorkerGroup",
            };
            ValidationError::collection(
                conflict.kind.entity_type(),
                field,
                ValidationErrorKind::ConflictingRules,
                format!(
                    "Rules {} and {} conflict: {}",
                    conflict.rule1.id, conflict.rule2.id, conflict.reason
                ),
            )
            .with_suggestion("Remove or merge one of the rules")
        });

        cycles.chain(conflicts).collect()
    }
}

/// Runs parameter validation, cycle detection, and conflict detection.
pub fn analyze_rules(rules: &[Rule]) -> RuleAnalysis<'_> {
    let invalid = rules
        .iter()
        .filter_map(|rule| {
            let check = validate_rule(rule);
            (!check.is_valid).then(|| InvalidRule {
                rule,
                errors: check.errors,
            })
        })
        .collect();

    RuleAnalysis {
        invalid,
        cycles: detect_cycles(rules),
        conflicts: detect_conflicts(rules),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CoRunParams, PriorityOverrideParams, SlotRestrictionParams};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_rule(rng: &mut StdRng, n: usize) -> Rule {
        let task = |rng: &mut StdRng| format!("T{}", rng.random_range(1..6));
        let id = format!("r{n}");
        match rng.random_range(0..6) {
            0 => {
                let count = rng.random_range(0..4);
                Rule::co_run(id, (0..count).map(|_| task(rng)).collect::<Vec<_>>())
            }
            1 => Rule::slot_restriction(id, "GroupA", rng.random_range(-1..3)),
            2 => Rule::load_limit(id, ["GroupA", "GroupB"][rng.random_range(0..2)], 2),
            3 => {
                let count = rng.random_range(0..3);
                let phases: Vec<i64> = (0..count).map(|_| rng.random_range(1..6)).collect();
                Rule::phase_window(id, task(rng), phases)
            }
            4 => Rule::pattern_match(id, "^T", "TaskID"),
            _ => Rule::priority_override(id, rng.random_range(0..12)),
        }
    }

    #[test]
    fn test_valid_rules() {
        let rules = vec![
            Rule::co_run("r1", ["T1", "T2"]),
            Rule::slot_restriction("r2", "GroupA", 2),
            Rule::load_limit("r3", "GroupB", 3),
            Rule::phase_window("r4", "T1", [1, 2]),
            Rule::pattern_match("r5", "^T[0-9]+$", "TaskID"),
            Rule::priority_override("r6", 10),
        ];
        for rule in &rules {
            let check = validate_rule(rule);
            assert!(check.is_valid, "{}: {:?}", rule.id, check.errors);
        }
    }

    #[test]
    fn test_co_run_needs_two_tasks() {
        let check = validate_rule(&Rule::co_run("r", ["T1"]));
        assert!(!check.is_valid);
        assert_eq!(check.errors, vec!["Co-run rule requires at least two task IDs"]);
    }

    #[test]
    fn test_missing_parameters() {
        let rule = Rule::new("r", RuleKind::SlotRestriction(SlotRestrictionParams::default()));
        let check = validate_rule(&rule);
        assert_eq!(
            check.errors,
            vec![
                "Slot restriction rule requires a group",
                "Slot restriction rule requires a positive number of minimum common slots",
            ]
        );

        let check = validate_rule(&Rule::load_limit("r", "", 0));
        assert_eq!(check.errors.len(), 2);

        let check = validate_rule(&Rule::phase_window("r", "", []));
        assert_eq!(
            check.errors,
            vec![
                "Phase window rule requires a task ID",
                "Phase window rule requires at least one allowed phase",
            ]
        );

        let check = validate_rule(&Rule::pattern_match("r", "", ""));
        assert_eq!(
            check.errors,
            vec![
                "Pattern match rule requires a pattern",
                "Pattern match rule requires a target field",
            ]
        );
    }

    #[test]
    fn test_invalid_pattern() {
        let check = validate_rule(&Rule::pattern_match("r", "T[", "TaskID"));
        assert_eq!(
            check.errors,
            vec![
                "Pattern match rule has an invalid pattern \
                 (look-around and backreferences are not supported): T["
            ]
        );

        let check = validate_rule(&Rule::pattern_match("r", "^T(?=\\d)", "TaskID"));
        assert!(!check.is_valid);
        assert!(validate_rule(&Rule::pattern_match("r", "^T\\d+$", "TaskID")).is_valid);
    }

    #[test]
    fn test_priority_override_bounds() {
        assert!(!validate_rule(&Rule::priority_override("r", 0)).is_valid);
        assert!(!validate_rule(&Rule::priority_override("r", 11)).is_valid);
        assert!(validate_rule(&Rule::priority_override("r", 1)).is_valid);

        let rule = Rule::new("r", RuleKind::PriorityOverride(PriorityOverrideParams::default()))
            .with_description("bump");
        assert_eq!(
            validate_rule(&rule).errors,
            vec!["Priority override rule requires a priority value between 1 and 10"]
        );
    }

    #[test]
    fn test_description_and_priority() {
        let rule = Rule::co_run("r", ["T1", "T2"])
            .with_description("  ")
            .with_priority(11);
        assert_eq!(
            validate_rule(&rule).errors,
            vec![
                "Rule description is required",
                "Rule priority must be between 1 and 10, got: 11",
            ]
        );
    }

    #[test]
    fn test_analysis_projection() {
        let rules = vec![
            Rule::co_run("c", ["T1", "T2"]),
            Rule::phase_window("p1", "T3", [1]),
            Rule::phase_window("p2", "T3", [2]),
            Rule::load_limit("l1", "GroupA", 1),
            Rule::load_limit("l2", "GroupA", 2),
            Rule::new("bad", RuleKind::CoRun(CoRunParams::default())),
        ];
        let analysis = analyze_rules(&rules);

        assert!(!analysis.is_consistent());
        assert_eq!(analysis.invalid.len(), 1);
        assert_eq!(analysis.invalid[0].rule.id, "bad");

        let errors = analysis.to_validation_errors();
        let kinds: Vec<_> = errors.iter().map(|e| (e.kind, e.entity_type)).collect();
        assert_eq!(
            kinds,
            vec![
                (ValidationErrorKind::CircularDependency, EntityType::Tasks),
                (ValidationErrorKind::CircularDependency, EntityType::Tasks),
                (ValidationErrorKind::ConflictingRules, EntityType::Tasks),
                (ValidationErrorKind::ConflictingRules, EntityType::Workers),
            ]
        );
        assert!(errors.iter().all(ValidationError::is_collection_wide));
        assert_eq!(errors[0].message, "Circular co-run dependency: T1 -> T2 -> T1");
        assert!(errors[2].message.starts_with("Rules p1 and p2 conflict"));
    }

    #[test]
    fn test_consistent_rules() {
        let rules = vec![
            Rule::phase_window("p1", "T1", [1, 2]),
            Rule::load_limit("l1", "GroupA", 1),
        ];
        let analysis = analyze_rules(&rules);
        assert!(analysis.is_consistent());
        assert!(analysis.to_validation_errors().is_empty());
    }

    #[test]
    fn test_random_rule_lists_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let len = rng.random_range(0..12);
            let rules: Vec<Rule> = (0..len).map(|n| random_rule(&mut rng, n)).collect();

            let first = analyze_rules(&rules);
            let second = analyze_rules(&rules);
            assert_eq!(first, second);

            for cycle in &first.cycles.cycles {
                assert!(cycle.len() >= 3);
                assert_eq!(cycle.first(), cycle.last());
            }
            for conflict in &first.conflicts.conflicts {
                let a = rules.iter().position(|r| std::ptr::eq(r, conflict.rule1));
                let b = rules.iter().position(|r| std::ptr::eq(r, conflict.rule2));
                assert!(a < b);
            }
        }
    }
}
