//! Session-level view over the store, for hosts that want a compact report.

use serde::Serialize;

use crate::core::format;
use crate::core::storage::{BlockRecord, SessionStore};
use crate::tasks::iat::{BlockMetrics, DisplayChoices};

#[derive(Debug, Clone, Serialize)]
pub struct BlockSummary {
    pub id: String,
    pub index: usize,
    pub completed_at: String,
    /// `None` for a block that recorded no outcomes.
    pub choices: Option<DisplayChoices>,
    pub metrics: BlockMetrics,
}

impl BlockSummary {
    pub fn from_record<T>(record: &BlockRecord<T>) -> Self {
        let choices = record
            .result
            .results
            .first()
            .or_else(|| record.result.errors.first())
            .map(|outcome| outcome.choices.clone());

        Self {
            id: record.id.clone(),
            index: record.index,
            completed_at: record.completed_at.clone(),
            choices,
            metrics: BlockMetrics::from_result(&record.result),
        }
    }

    /// One-line description, e.g. `Block 1 · flower / insect · 3 trials · 1 errors · median 0.6 s`.
    pub fn headline(&self) -> String {
        let mut parts = vec![format!("Block {}", self.index + 1)];
        if let Some(choices) = &self.choices {
            parts.push(format!("{} / {}", choices.left, choices.right));
        }
        parts.push(format!("{} trials", self.metrics.total_trials));
        parts.push(format!("{} errors", self.metrics.error_count));
        if self.metrics.timeout_count > 0 {
            parts.push(format!("{} timeouts", self.metrics.timeout_count));
        }
        if self.metrics.total_trials > 0 {
            parts.push(format!(
                "median {}",
                format::format_seconds(self.metrics.median_latency_s)
            ));
        }
        parts.join(" · ")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub blocks: Vec<BlockSummary>,
}

impl SessionSummary {
    pub fn from_store<T>(store: &SessionStore<T>) -> Self {
        Self {
            blocks: store.records().iter().map(BlockSummary::from_record).collect(),
        }
    }

    pub fn total_errors(&self) -> usize {
        self.blocks.iter().map(|b| b.metrics.error_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::iat::{BlockResult, Resolution, Trial, TrialOutcome};

    #[test]
    fn headline_lists_labels_and_counts() {
        let mut store: SessionStore<String> = SessionStore::new();
        store.append(
            0,
            BlockResult {
                results: vec![TrialOutcome {
                    trial: Trial {
                        category: "flower".into(),
                        item: "rose".into(),
                    },
                    elapsed_seconds: 0.6,
                    choices: DisplayChoices {
                        left: "flower".into(),
                        right: "insect".into(),
                    },
                    attempt: 1,
                    resolution: Resolution::Correct,
                }],
                errors: Vec::new(),
            },
        );
        store.append(1, BlockResult::default());

        let summary = SessionSummary::from_store(&store);
        assert_eq!(summary.blocks.len(), 2);
        assert_eq!(
            summary.blocks[0].headline(),
            "Block 1 · flower / insect · 1 trials · 0 errors · median 0.6 s"
        );
        assert_eq!(summary.blocks[1].headline(), "Block 2 · 0 trials · 0 errors");
        assert_eq!(summary.total_errors(), 0);
    }
}
