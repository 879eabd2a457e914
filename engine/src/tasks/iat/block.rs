//! Runs one block: optional splash, the trial loop, optional post message.

use std::fmt::Debug;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::core::config::IatConfig;
use crate::core::error::EngineError;
use crate::core::format;
use crate::core::timing::Clock;
use crate::io::definition::{BlockDefinition, SplashConfig};
use crate::io::input::{InputSource, KeyCode};
use crate::io::presentation::Presenter;

use super::engine::{IatEngine, ResponseOutcome};
use super::BlockResult;

enum WindowEvent {
    Key(Option<KeyCode>),
    Timeout,
}

pub struct BlockController<'a, P, I> {
    config: &'a IatConfig,
    presenter: &'a P,
    input: &'a mut I,
}

impl<'a, P, I> BlockController<'a, P, I>
where
    I: InputSource,
{
    pub fn new(config: &'a IatConfig, presenter: &'a P, input: &'a mut I) -> Self {
        Self {
            config,
            presenter,
            input,
        }
    }

    /// Run `definition` to completion.
    ///
    /// The definition is validated before anything is shown: a configuration
    /// error presents no splash and no trial.
    pub async fn run<T>(
        &mut self,
        definition: &BlockDefinition<T>,
    ) -> Result<BlockResult<T>, EngineError>
    where
        T: Clone + Debug + Send + Sync,
        P: Presenter<T>,
    {
        let mut engine = IatEngine::new(&definition.test, self.config)?;
        info!(
            left = %engine.choices().left,
            right = %engine.choices().right,
            trials = engine.remaining(),
            "block starting"
        );

        if let Some(splash) = &definition.splash {
            self.acknowledge::<T>(splash).await;
        }

        self.run_trials(&mut engine).await?;

        if let Some(post) = &definition.post {
            self.acknowledge::<T>(post).await;
        }

        let result = engine.into_result()?;
        info!(
            results = result.results.len(),
            errors = result.errors.len(),
            "block finished"
        );
        Ok(result)
    }

    async fn acknowledge<T>(&self, message: &SplashConfig)
    where
        T: Send + Sync,
        P: Presenter<T>,
    {
        let text = message.message.as_deref().unwrap_or_default();
        let button = message
            .button_text
            .as_deref()
            .unwrap_or(self.config.default_button_text.as_str());
        Presenter::<T>::render_splash(self.presenter, text, button).await;
    }

    async fn run_trials<T>(&mut self, engine: &mut IatEngine<T>) -> Result<(), EngineError>
    where
        T: Clone + Debug + Send + Sync,
        P: Presenter<T>,
    {
        let mut clock = Clock::new(self.config.clock_quantum);

        while let Some(presented) = engine.present_next()? {
            let attempt_id = presented.attempt_id;
            debug!(
                attempt_id,
                attempt = presented.attempt,
                category = %presented.trial.category,
                item = ?presented.trial.item,
                "presenting trial"
            );
            self.presenter.render_progress(&engine.progress());

            // Listen before the stimulus appears so the earliest possible
            // response is not lost.
            self.input.subscribe();
            self.presenter.render_stimulus(engine.choices(), &presented.trial);
            clock.start();
            engine.arm(attempt_id)?;
            let deadline = Instant::now() + self.config.response_window;

            let outcome = loop {
                let event = tokio::select! {
                    biased;
                    key = self.input.next_key() => WindowEvent::Key(key),
                    _ = tokio::time::sleep_until(deadline) => WindowEvent::Timeout,
                };

                match event {
                    WindowEvent::Key(None) => {
                        self.input.unsubscribe();
                        clock.stop();
                        return Err(EngineError::InputClosed);
                    }
                    WindowEvent::Key(Some(code)) => {
                        let Some(side) = engine.bindings().side_for(code) else {
                            debug!(?code, "ignoring unbound key");
                            continue;
                        };
                        let elapsed = clock.elapsed()?;
                        self.input.unsubscribe();
                        clock.stop();
                        break engine.register_key(attempt_id, side, elapsed);
                    }
                    WindowEvent::Timeout => {
                        let elapsed = clock.elapsed()?;
                        self.input.unsubscribe();
                        clock.stop();
                        break engine.register_timeout(attempt_id, elapsed);
                    }
                }
            };

            match outcome {
                ResponseOutcome::Advanced => {
                    if let Some(last) = engine.result().results.last() {
                        let latency = format::format_seconds(last.elapsed_seconds);
                        debug!(%latency, "response recorded");
                    }
                }
                ResponseOutcome::Retry(resolution) => {
                    debug!(?resolution, "showing corrective feedback");
                    self.presenter.render_feedback(true);
                    tokio::time::sleep(self.config.feedback_duration).await;
                    self.presenter.render_feedback(false);
                }
                ResponseOutcome::Ignored => {}
            }
        }

        Ok(())
    }
}
