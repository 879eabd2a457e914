//! Error types for the engine, definition loading and the session runner.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A block must contrast exactly two category sets.
    #[error("block definition must supply exactly two category sets, got {0}")]
    CategoryArity(usize),

    /// A lifecycle step was invoked from a state that does not allow it.
    #[error("{0} called out of order")]
    OutOfOrder(&'static str),

    /// Elapsed time was read from a clock that was never started.
    #[error("clock read before it was started")]
    ClockNotStarted,

    /// The key input source closed while a response window was armed.
    #[error("input source closed while awaiting a response")]
    InputClosed,

    /// The block already yielded its result and accepts no more input.
    #[error("block already finished")]
    BlockFinished,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read block definition {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse block definition from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum RunnerError {
    /// The data for block `index` could not be loaded; later blocks were not run.
    #[error("block {index} could not be loaded: {source}")]
    Load {
        index: usize,
        #[source]
        source: LoadError,
    },

    /// Block `index` failed to set up or run; later blocks were not run.
    #[error("block {index} failed: {source}")]
    Block {
        index: usize,
        #[source]
        source: EngineError,
    },
}

impl RunnerError {
    pub fn index(&self) -> usize {
        match self {
            RunnerError::Load { index, .. } | RunnerError::Block { index, .. } => *index,
        }
    }
}
