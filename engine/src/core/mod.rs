//! Shared building blocks: configuration, errors, timing and the session store.

pub mod config;
pub mod error;
pub mod format;
pub mod storage;
pub mod timing;
