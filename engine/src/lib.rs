//! Trial engine for the Implicit Association Test. Sequencing, timing and
//! result aggregation live here; rendering and key capture are supplied by the host.

pub mod core;
pub mod io;
pub mod results;
pub mod tasks;

pub use crate::core::config::{IatConfig, KeyBindings};
pub use crate::core::error::{EngineError, LoadError, RunnerError};
pub use crate::core::storage::{BlockRecord, SessionStore};
pub use crate::io::definition::{BlockDefinition, BlockSource, CategorySet, JsonFileSource, SplashConfig};
pub use crate::io::input::{ChannelInput, InputSource, KeyCode};
pub use crate::io::presentation::{BlockProgress, Presenter};
pub use crate::tasks::iat::{
    BlockController, BlockResult, DisplayChoices, Resolution, Side, TaskRunner, Trial,
    TrialOutcome,
};
