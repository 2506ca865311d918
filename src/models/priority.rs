//! Prioritization settings handed to the downstream allocator.
//!
//! Four criteria are weighted 1-10 and ranked. Presets fix both the
//! weights and the ranking; editing a single weight switches to `Custom`.

use serde::{Deserialize, Serialize};

/// Lowest allowed weight.
pub const MIN_WEIGHT: u8 = 1;
/// Highest allowed weight.
pub const MAX_WEIGHT: u8 = 10;

/// A prioritization criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriorityCriterion {
    /// Favor high-priority clients.
    ClientPriority,
    /// Keep workers busy.
    WorkerUtilization,
    /// Maximize completed tasks.
    TaskCompletion,
    /// Spread work evenly.
    FairnessScore,
}

/// Named weight profiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
    /// Fulfil as many client requests as possible.
    MaxFulfillment,
    /// Distribute work fairly.
    Fairness,
    /// Minimize per-worker load.
    MinWorkload,
    /// User-edited weights.
    #[default]
    Custom,
}

/// Weight per criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityWeights {
    pub client_priority: u8,
    pub worker_utilization: u8,
    pub task_completion: u8,
    pub fairness_score: u8,
}

impl PriorityWeights {
    /// Weight of a criterion.
    pub fn get(&self, criterion: PriorityCriterion) -> u8 {
        match criterion {
            PriorityCriterion::ClientPriority => self.client_priority,
            PriorityCriterion::WorkerUtilization => self.worker_utilization,
            PriorityCriterion::TaskCompletion => self.task_completion,
            PriorityCriterion::FairnessScore => self.fairness_score,
        }
    }

    fn slot(&mut self, criterion: PriorityCriterion) -> &mut u8 {
        match criterion {
            PriorityCriterion::ClientPriority => &mut self.client_priority,
            PriorityCriterion::WorkerUtilization => &mut self.worker_utilization,
            PriorityCriterion::TaskCompletion => &mut self.task_completion,
            PriorityCriterion::FairnessScore => &mut self.fairness_score,
        }
    }

    fn total(&self) -> u32 {
        [
            self.client_priority,
            self.worker_utilization,
            self.task_completion,
            self.fairness_score,
        ]
        .iter()
        .map(|&w| u32::from(w))
        .sum()
    }
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            client_priority: 5,
            worker_utilization: 3,
            task_completion: 4,
            fairness_score: 3,
        }
    }
}

/// Weights, ranking, and the preset they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritySettings {
    pub weights: PriorityWeights,
    /// Criteria from most to least important.
    pub rankings: Vec<PriorityCriterion>,
    pub selected_preset: Preset,
}

impl Default for PrioritySettings {
    fn default() -> Self {
        use PriorityCriterion::*;
        Self {
            weights: PriorityWeights::default(),
            rankings: vec![ClientPriority, TaskCompletion, WorkerUtilization, FairnessScore],
            selected_preset: Preset::Custom,
        }
    }
}

impl PrioritySettings {
    /// Settings for a preset. `Custom` yields the default weights.
    pub fn preset(preset: Preset) -> Self {
        use PriorityCriterion::*;
        let (weights, rankings) = match preset {
            Preset::MaxFulfillment => (
                [8, 4, 7, 2],
                vec![ClientPriority, TaskCompletion, WorkerUtilization, FairnessScore],
            ),
            Preset::Fairness => (
                [5, 5, 5, 8],
                vec![FairnessScore, ClientPriority, WorkerUtilization, TaskCompletion],
            ),
            Preset::MinWorkload => (
                [3, 8, 4, 6],
                vec![WorkerUtilization, FairnessScore, TaskCompletion, ClientPriority],
            ),
            Preset::Custom => return Self::default(),
        };
        let [client_priority, worker_utilization, task_completion, fairness_score] = weights;
        Self {
            weights: PriorityWeights {
                client_priority,
                worker_utilization,
                task_completion,
                fairness_score,
            },
            rankings,
            selected_preset: preset,
        }
    }

    /// Sets one weight (clamped to 1-10) and switches to `Custom`.
    pub fn with_weight(mut self, criterion: PriorityCriterion, weight: u8) -> Self {
        *self.weights.slot(criterion) = weight.clamp(MIN_WEIGHT, MAX_WEIGHT);
        self.selected_preset = Preset::Custom;
        self
    }

    /// Sets the ranking and switches to `Custom`.
    pub fn with_rankings(mut self, rankings: Vec<PriorityCriterion>) -> Self {
        self.rankings = rankings;
        self.selected_preset = Preset::Custom;
        self
    }

    /// Weight of a criterion as a share of the total (0.0..1.0).
    pub fn normalized_weight(&self, criterion: PriorityCriterion) -> f64 {
        let total = self.weights.total();
        if total == 0 {
            return 0.0;
        }
        f64::from(self.weights.get(criterion)) / f64::from(total)
    }
}
