//! Per-block trial state machine.
//!
//! The engine is synchronous: the block controller drives it by calling
//! [`IatEngine::present_next`], [`IatEngine::arm`] and then exactly one of
//! [`IatEngine::register_key`] / [`IatEngine::register_timeout`] per armed
//! window. Every window gets a fresh attempt id, and a registration carrying an
//! id that is not the armed one is ignored. That check is what guarantees a
//! key press racing the timeout can never resolve an attempt twice.

use tracing::{debug, warn};

use crate::core::config::{IatConfig, KeyBindings};
use crate::core::error::EngineError;
use crate::io::definition::CategorySet;
use crate::io::presentation::BlockProgress;

use super::sequencer::{display_choices, prepare, TrialSequencer};
use super::{BlockResult, DisplayChoices, Resolution, Side, Trial, TrialOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Presenting { attempt_id: u64 },
    AwaitingInput { attempt_id: u64 },
    Feedback { attempt_id: u64 },
    Finished,
}

/// What the controller should put on screen for the next attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentedTrial<T> {
    pub attempt_id: u64,
    pub attempt: u32,
    pub trial: Trial<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Correct answer; the next present call draws a new trial.
    Advanced,
    /// Wrong key or timeout; the same trial is presented again after feedback.
    Retry(Resolution),
    /// Registration for an attempt that is not armed (stale or already resolved).
    Ignored,
}

#[derive(Debug)]
struct PendingTrial<T> {
    trial: Trial<T>,
    attempt: u32,
}

#[derive(Debug)]
pub struct IatEngine<T> {
    bindings: KeyBindings,
    choices: DisplayChoices,
    sequencer: TrialSequencer<T>,
    current: Option<PendingTrial<T>>,
    state: EngineState,
    next_attempt_id: u64,
    result: BlockResult<T>,
}

impl<T: Clone> IatEngine<T> {
    /// Fails with [`EngineError::CategoryArity`] unless exactly two sets are given.
    pub fn new(sets: &[CategorySet<T>], config: &IatConfig) -> Result<Self, EngineError> {
        let choices = display_choices(sets)?;
        let sequencer = TrialSequencer::new(prepare(sets), config.seed);
        Ok(Self {
            bindings: config.bindings,
            choices,
            sequencer,
            current: None,
            state: EngineState::Idle,
            next_attempt_id: 0,
            result: BlockResult::default(),
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn choices(&self) -> &DisplayChoices {
        &self.choices
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn remaining(&self) -> usize {
        self.sequencer.remaining()
    }

    pub fn result(&self) -> &BlockResult<T> {
        &self.result
    }

    pub fn progress(&self) -> BlockProgress {
        BlockProgress {
            completed: self.result.results.len(),
            total: self.sequencer.total(),
            attempt: self.current.as_ref().map(|p| p.attempt).unwrap_or(0),
        }
    }

    /// Enter Presenting with the trial pending retry, or a freshly drawn one.
    /// Returns `None` and finishes the block once nothing is left.
    pub fn present_next(&mut self) -> Result<Option<PresentedTrial<T>>, EngineError> {
        match self.state {
            EngineState::Idle | EngineState::Feedback { .. } => {}
            EngineState::Finished => return Err(EngineError::BlockFinished),
            EngineState::Presenting { .. } | EngineState::AwaitingInput { .. } => {
                return Err(EngineError::OutOfOrder("present_next"))
            }
        }

        let pending = match self.current.take() {
            Some(mut retry) => {
                retry.attempt += 1;
                retry
            }
            None => match self.sequencer.draw_next() {
                Some(trial) => PendingTrial { trial, attempt: 1 },
                None => {
                    debug!("trial queue exhausted");
                    self.state = EngineState::Finished;
                    return Ok(None);
                }
            },
        };

        self.next_attempt_id += 1;
        let attempt_id = self.next_attempt_id;
        let presented = PresentedTrial {
            attempt_id,
            attempt: pending.attempt,
            trial: pending.trial.clone(),
        };
        self.current = Some(pending);
        self.state = EngineState::Presenting { attempt_id };
        Ok(Some(presented))
    }

    /// Open the response window for the presented attempt.
    pub fn arm(&mut self, attempt_id: u64) -> Result<(), EngineError> {
        if self.state != (EngineState::Presenting { attempt_id }) {
            return Err(EngineError::OutOfOrder("arm"));
        }
        self.state = EngineState::AwaitingInput { attempt_id };
        Ok(())
    }

    /// First qualifying key press for `attempt_id`.
    pub fn register_key(
        &mut self,
        attempt_id: u64,
        side: Side,
        elapsed_seconds: f64,
    ) -> ResponseOutcome {
        if !self.is_armed(attempt_id) {
            warn!(attempt_id, ?side, "ignoring key for an attempt that is not armed");
            return ResponseOutcome::Ignored;
        }

        let expected = self.current.as_ref().map(|p| p.trial.category.as_str());
        let resolution = if expected == Some(self.choices.label(side)) {
            Resolution::Correct
        } else {
            Resolution::Incorrect { pressed: side }
        };
        self.resolve(attempt_id, resolution, elapsed_seconds)
    }

    /// Response window for `attempt_id` elapsed without a qualifying key.
    pub fn register_timeout(&mut self, attempt_id: u64, elapsed_seconds: f64) -> ResponseOutcome {
        if !self.is_armed(attempt_id) {
            debug!(attempt_id, "ignoring timeout for an attempt that is not armed");
            return ResponseOutcome::Ignored;
        }
        self.resolve(attempt_id, Resolution::TimedOut, elapsed_seconds)
    }

    /// Hand over the accumulated result once the block has finished.
    pub fn into_result(self) -> Result<BlockResult<T>, EngineError> {
        if self.state != EngineState::Finished {
            return Err(EngineError::OutOfOrder("into_result"));
        }
        Ok(self.result)
    }

    fn is_armed(&self, attempt_id: u64) -> bool {
        self.state == (EngineState::AwaitingInput { attempt_id })
    }

    fn resolve(
        &mut self,
        attempt_id: u64,
        resolution: Resolution,
        elapsed_seconds: f64,
    ) -> ResponseOutcome {
        let Some(pending) = self.current.as_ref() else {
            return ResponseOutcome::Ignored;
        };

        let outcome = TrialOutcome {
            trial: pending.trial.clone(),
            elapsed_seconds,
            choices: self.choices.clone(),
            attempt: pending.attempt,
            resolution,
        };

        if resolution.is_correct() {
            debug!(attempt_id, elapsed_seconds, "trial answered correctly");
            self.result.results.push(outcome);
            self.current = None;
            self.state = EngineState::Idle;
            ResponseOutcome::Advanced
        } else {
            debug!(attempt_id, ?resolution, "trial failed, will retry");
            self.result.errors.push(outcome);
            self.state = EngineState::Feedback { attempt_id };
            ResponseOutcome::Retry(resolution)
        }
    }
}
