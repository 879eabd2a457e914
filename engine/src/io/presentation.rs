//! Presentation contract. The engine calls these at fixed points of the trial
//! lifecycle and never inspects how they render.

use async_trait::async_trait;
use serde::Serialize;

use crate::tasks::iat::{DisplayChoices, Trial};

/// Position within the running block, reported each time a stimulus is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockProgress {
    /// Trials answered correctly so far.
    pub completed: usize,
    pub total: usize,
    /// 1-based attempt number of the trial being presented.
    pub attempt: u32,
}

#[async_trait]
pub trait Presenter<T: Send + Sync>: Send + Sync {
    /// Show `trial`'s item together with the category labels for each side.
    fn render_stimulus(&self, choices: &DisplayChoices, trial: &Trial<T>);

    /// Switch the corrective feedback signal on or off.
    fn render_feedback(&self, active: bool);

    /// Show a message and resolve once the participant acknowledges it.
    async fn render_splash(&self, message: &str, button_text: &str);

    fn render_progress(&self, _progress: &BlockProgress) {}
}
