//! Implicit Association Test: trial sequencing, the per-trial state machine,
//! block orchestration and the multi-block session runner.

mod block;
mod engine;
mod metrics;
mod runner;
mod sequencer;

pub use block::BlockController;
pub use engine::{EngineState, IatEngine, PresentedTrial, ResponseOutcome};
pub use metrics::BlockMetrics;
pub use runner::TaskRunner;
pub use sequencer::{display_choices, prepare, TrialSequencer};

use serde::{Deserialize, Serialize};

/// Screen half, and therefore response key, a category is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// One queued unit of work: an item and the category it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial<T> {
    pub category: String,
    pub item: T,
}

/// Category labels bound to the left and right response keys for a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayChoices {
    pub left: String,
    pub right: String,
}

impl DisplayChoices {
    pub fn label(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Side whose label matches `category`, if any.
    pub fn side_of(&self, category: &str) -> Option<Side> {
        if self.left == category {
            Some(Side::Left)
        } else if self.right == category {
            Some(Side::Right)
        } else {
            None
        }
    }
}

/// How a single attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    Correct,
    Incorrect { pressed: Side },
    TimedOut,
}

impl Resolution {
    pub fn is_correct(&self) -> bool {
        matches!(self, Resolution::Correct)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome<T> {
    pub trial: Trial<T>,
    pub elapsed_seconds: f64,
    pub choices: DisplayChoices,
    /// 1-based attempt number for this trial.
    pub attempt: u32,
    pub resolution: Resolution,
}

/// Everything recorded during one block: correct answers in `results`, one
/// entry per wrong key or timeout in `errors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockResult<T> {
    pub results: Vec<TrialOutcome<T>>,
    pub errors: Vec<TrialOutcome<T>>,
}

impl<T> Default for BlockResult<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<T> BlockResult<T> {
    pub fn timeouts(&self) -> usize {
        self.errors
            .iter()
            .filter(|outcome| outcome.resolution == Resolution::TimedOut)
            .count()
    }
}
