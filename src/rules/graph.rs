//! Co-run dependency graph and cycle detection.
//!
//! Every pair of tasks named in the same co-run rule becomes a pair of
//! opposite edges, since co-running is mutual. Any co-run group of two or
//! more tasks therefore already forms a cycle; these are reported as
//! found, not filtered.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.3 (Depth-First Search)

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::models::{Rule, RuleKind};

/// Result of co-run cycle detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    /// Whether any cycle was found.
    pub has_cycles: bool,
    /// Cycles as task-ID paths; the first ID is repeated at the end.
    pub cycles: Vec<Vec<String>>,
}

impl CycleReport {
    fn from_cycles(cycles: Vec<Vec<String>>) -> Self {
        Self {
            has_cycles: !cycles.is_empty(),
            cycles,
        }
    }
}

/// Adjacency lists over task IDs, in first-seen order.
#[derive(Debug, Default)]
struct CoRunGraph<'a> {
    nodes: Vec<&'a str>,
    edges: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> CoRunGraph<'a> {
    fn from_rules(rules: &'a [Rule]) -> Self {
        let mut graph = Self::default();
        for rule in rules {
            let RuleKind::CoRun(params) = &rule.kind else {
                continue;
            };
            for task_id in &params.task_ids {
                let task_id = task_id.as_str();
                for other in &params.task_ids {
                    if other != task_id {
                        graph.add_edge(task_id, other);
                    }
                }
                graph.add_node(task_id);
            }
        }
        graph
    }

    fn add_node(&mut self, node: &'a str) {
        if !self.edges.contains_key(node) {
            self.nodes.push(node);
            self.edges.insert(node, Vec::new());
        }
    }

    fn add_edge(&mut self, from: &'a str, to: &'a str) {
        self.add_node(from);
        let targets = self.edges.entry(from).or_default();
        if !targets.contains(&to) {
            targets.push(to);
        }
    }

    fn neighbors(&self, node: &str) -> &[&'a str] {
        self.edges.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Detects cycles among co-run rules.
///
/// # Algorithm
/// For each task ID in first-seen order, a fresh depth-first search tracks
/// the current path. Reaching a task already on the path closes a cycle:
/// the path slice from that task onward, plus the task again. The search
/// from that start stops there, so each start contributes at most one cycle.
///
/// Non-co-run rules are ignored. The output order is stable for a given
/// rule list.
pub fn detect_cycles(rules: &[Rule]) -> CycleReport {
    let graph = CoRunGraph::from_rules(rules);
    let mut cycles = Vec::new();

    for &start in &graph.nodes {
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        if let Some(cycle) = find_cycle(&graph, start, &mut visited, &mut path) {
            cycles.push(cycle.into_iter().map(str::to_string).collect());
        }
    }

    tracing::debug!(
        tasks = graph.nodes.len(),
        cycles = cycles.len(),
        "co-run cycle detection finished"
    );
    CycleReport::from_cycles(cycles)
}

fn find_cycle<'a>(
    graph: &CoRunGraph<'a>,
    node: &'a str,
    visited: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<&'a str>> {
    visited.insert(node);
    path.push(node);

    for &next in graph.neighbors(node) {
        if !visited.contains(next) {
            if let Some(cycle) = find_cycle(graph, next, visited, path) {
                return Some(cycle);
            }
        } else if let Some(start) = path.iter().position(|&n| n == next) {
            let mut cycle = path[start..].to_vec();
            cycle.push(next); // Back edge → cycle
            return Some(cycle);
        }
    }

    path.pop();
    None
}
