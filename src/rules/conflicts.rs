//! Pairwise rule conflicts.

use serde::Serialize;

use crate::models::{EntityType, Rule, RuleKind};

/// Why two rules conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictKind {
    /// Two phase windows for one task share no phase.
    PhaseWindow,
    /// Two load limits target one worker group.
    LoadLimit,
}

impl ConflictKind {
    /// Collection the conflict is reported against.
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::PhaseWindow => EntityType::Tasks,
            Self::LoadLimit => EntityType::Workers,
        }
    }
}

/// Two rules that cannot both hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleConflict<'a> {
    /// The earlier rule of the pair.
    pub rule1: &'a Rule,
    /// The later rule of the pair.
    pub rule2: &'a Rule,
    /// Human-readable reason.
    pub reason: String,
    /// Conflict category.
    #[serde(skip)]
    pub kind: ConflictKind,
}

/// Result of conflict detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport<'a> {
    /// Whether any conflict was found.
    pub has_conflicts: bool,
    /// Conflicting pairs, grouped by task or worker group in first-seen order.
    pub conflicts: Vec<RuleConflict<'a>>,
}

/// Finds pairs of rules that cannot both hold.
///
/// - Phase windows for the same task conflict when their allowed phases
///   have no phase in common.
/// - Load limits for the same worker group always conflict.
///
/// Phase-window conflicts come first, then load-limit conflicts. Within a
/// group, pairs follow the order of the rule list.
pub fn detect_conflicts(rules: &[Rule]) -> ConflictReport<'_> {
    let mut conflicts = Vec::new();

    let windows = group_rules(rules, |kind| match kind {
        RuleKind::PhaseWindow(p) => Some(p.task_id.as_str()),
        _ => None,
    });
    for (task_id, group) in &windows {
        for_each_pair(group, |a, b| {
            if !phases_overlap(a, b) {
                conflicts.push(RuleConflict {
                    rule1: a,
                    rule2: b,
                    reason: format!(
                        "Conflicting phase windows for task {task_id}: no common allowed phases"
                    ),
                    kind: ConflictKind::PhaseWindow,
                });
            }
        });
    }

    let limits = group_rules(rules, |kind| match kind {
        RuleKind::LoadLimit(p) => Some(p.worker_group.as_str()),
        _ => None,
    });
    for (worker_group, group) in &limits {
        for_each_pair(group, |a, b| {
            conflicts.push(RuleConflict {
                rule1: a,
                rule2: b,
                reason: format!("Multiple load limit rules for worker group {worker_group}"),
                kind: ConflictKind::LoadLimit,
            });
        });
    }

    tracing::debug!(
        rules = rules.len(),
        conflicts = conflicts.len(),
        "rule conflict detection finished"
    );
    ConflictReport {
        has_conflicts: !conflicts.is_empty(),
        conflicts,
    }
}

/// Groups rules by a key, keeping groups and members in first-seen order.
fn group_rules<'a, F>(rules: &'a [Rule], key: F) -> Vec<(&'a str, Vec<&'a Rule>)>
where
    F: Fn(&'a RuleKind) -> Option<&'a str>,
{
    let mut groups: Vec<(&'a str, Vec<&'a Rule>)> = Vec::new();
    for rule in rules {
        let Some(k) = key(&rule.kind) else {
            continue;
        };
        match groups.iter_mut().find(|(g, _)| *g == k) {
            Some((_, members)) => members.push(rule),
            None => groups.push((k, vec![rule])),
        }
    }
    groups
}

fn for_each_pair<'a>(group: &[&'a Rule], mut f: impl FnMut(&'a Rule, &'a Rule)) {
    for (i, &a) in group.iter().enumerate() {
        for &b in &group[i + 1..] {
            f(a, b);
        }
    }
}

fn phases_overlap(a: &Rule, b: &Rule) -> bool {
    match (&a.kind, &b.kind) {
        (RuleKind::PhaseWindow(pa), RuleKind::PhaseWindow(pb)) => pa
            .allowed_phases
            .iter()
            .any(|phase| pb.allowed_phases.contains(phase)),
        _ => true,
    }
}
