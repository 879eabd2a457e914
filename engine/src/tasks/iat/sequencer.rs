//! Randomised trial queue for one block.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::error::EngineError;
use crate::io::definition::CategorySet;

use super::{DisplayChoices, Trial};

/// Flatten category sets into trials, set by set, items in order.
pub fn prepare<T: Clone>(sets: &[CategorySet<T>]) -> Vec<Trial<T>> {
    sets.iter()
        .flat_map(|set| {
            set.items.iter().map(|item| Trial {
                category: set.category.clone(),
                item: item.clone(),
            })
        })
        .collect()
}

/// Bind the first set to the left key and the second to the right key.
pub fn display_choices<T>(sets: &[CategorySet<T>]) -> Result<DisplayChoices, EngineError> {
    match sets {
        [left, right] => Ok(DisplayChoices {
            left: left.category.clone(),
            right: right.category.clone(),
        }),
        _ => Err(EngineError::CategoryArity(sets.len())),
    }
}

#[derive(Debug)]
pub struct TrialSequencer<T> {
    queue: Vec<Trial<T>>,
    total: usize,
    rng: StdRng,
}

impl<T> TrialSequencer<T> {
    pub fn new(queue: Vec<Trial<T>>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            total: queue.len(),
            queue,
            rng,
        }
    }

    /// Remove and return a uniformly chosen trial, or `None` once exhausted.
    ///
    /// `swap_remove` keeps each draw O(1); queue order carries no meaning.
    pub fn draw_next(&mut self) -> Option<Trial<T>> {
        if self.queue.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..self.queue.len());
        Some(self.queue.swap_remove(index))
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Queue length at construction.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }
}
