//! Descriptive summaries of a finished block. No IAT scoring happens here.

use serde::{Deserialize, Serialize};

use super::{BlockResult, Resolution};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BlockMetrics {
    pub total_trials: usize,
    pub error_count: usize,
    pub incorrect_count: usize,
    pub timeout_count: usize,
    /// Share of trials answered correctly on the first attempt.
    pub first_attempt_accuracy: f64,
    pub mean_latency_s: f64,
    pub median_latency_s: f64,
    pub max_attempts: u32,
}

impl BlockMetrics {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_result<T>(result: &BlockResult<T>) -> Self {
        let mut incorrect_count = 0usize;
        let mut timeout_count = 0usize;
        for outcome in &result.errors {
            match outcome.resolution {
                Resolution::Incorrect { .. } => incorrect_count += 1,
                Resolution::TimedOut => timeout_count += 1,
                Resolution::Correct => {}
            }
        }

        let total_trials = result.results.len();
        if total_trials == 0 {
            return Self {
                error_count: result.errors.len(),
                incorrect_count,
                timeout_count,
                ..Self::default()
            };
        }

        let first_attempt = result
            .results
            .iter()
            .filter(|outcome| outcome.attempt == 1)
            .count();
        let max_attempts = result
            .results
            .iter()
            .map(|outcome| outcome.attempt)
            .max()
            .unwrap_or(0);

        let mut latencies: Vec<f64> = result
            .results
            .iter()
            .map(|outcome| outcome.elapsed_seconds)
            .collect();
        latencies.sort_by(|a, b| a.total_cmp(b));

        Self {
            total_trials,
            error_count: result.errors.len(),
            incorrect_count,
            timeout_count,
            first_attempt_accuracy: first_attempt as f64 / total_trials as f64,
            mean_latency_s: latencies.iter().sum::<f64>() / total_trials as f64,
            median_latency_s: median(&latencies),
            max_attempts,
        }
    }
}

fn median(sorted: &[f64]) -> f64 {
    match sorted.len() {
        0 => 0.0,
        len if len % 2 == 1 => sorted[len / 2],
        len => (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0,
    }
}
