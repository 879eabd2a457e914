//! Collaborator contracts at the engine boundary and the block-definition model.

pub mod definition;
pub mod input;
pub mod presentation;
