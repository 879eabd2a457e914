//! Session runner: executes blocks strictly in order and keeps their results.

use std::fmt::Debug;

use tracing::{error, info};

use crate::core::config::IatConfig;
use crate::core::error::RunnerError;
use crate::core::storage::SessionStore;
use crate::io::definition::BlockSource;
use crate::io::input::InputSource;
use crate::io::presentation::Presenter;

use super::block::BlockController;

pub struct TaskRunner<T, P, I> {
    config: IatConfig,
    presenter: P,
    input: I,
    store: SessionStore<T>,
}

impl<T, P, I> TaskRunner<T, P, I>
where
    T: Clone + Debug + Send + Sync,
    P: Presenter<T>,
    I: InputSource,
{
    pub fn new(config: IatConfig, presenter: P, input: I) -> Self {
        Self {
            config,
            presenter,
            input,
            store: SessionStore::new(),
        }
    }

    /// Load and run every block in submission order, appending each result.
    ///
    /// Stops at the first block that fails to load or set up; the results of
    /// the blocks before it stay in [`TaskRunner::store`].
    pub async fn run_all<S>(&mut self, sources: &[S]) -> Result<&SessionStore<T>, RunnerError>
    where
        S: BlockSource<T>,
    {
        info!(blocks = sources.len(), "session starting");

        for (index, source) in sources.iter().enumerate() {
            let label = source.describe();
            let definition = source.load().await.map_err(|source| {
                error!(index, %label, error = %source, "block definition failed to load");
                RunnerError::Load { index, source }
            })?;

            info!(index, %label, "running block");
            let mut controller =
                BlockController::new(&self.config, &self.presenter, &mut self.input);
            let result = controller.run(&definition).await.map_err(|source| {
                error!(index, %label, error = %source, "block failed");
                RunnerError::Block { index, source }
            })?;

            let record = self.store.append(index, result);
            info!(
                index,
                id = %record.id,
                results = record.result.results.len(),
                errors = record.result.errors.len(),
                "block recorded"
            );
        }

        info!(blocks = self.store.len(), "session complete");
        Ok(&self.store)
    }

    /// Results so far; partial while a session is incomplete or after a failure.
    pub fn store(&self) -> &SessionStore<T> {
        &self.store
    }

    pub fn config(&self) -> &IatConfig {
        &self.config
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn into_store(self) -> SessionStore<T> {
        self.store
    }
}
