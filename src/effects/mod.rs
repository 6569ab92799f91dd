//! Effectful action execution using Stillwater 0.11.0.
//!
//! This module is the "imperative shell" around the pure compiled graph:
//! it re-validates an action against an entity's live combination, runs the
//! callbacks and hands the new combination back to the entity.
//!
//! # Key Concepts
//!
//! - **Entity**: persists one subject's combination and brackets each action
//!   with `start_action` / `end_action`
//! - **Callbacks**: effect factories returning `BoxedEffect`, run with the
//!   entity as environment
//! - **MemoryEntity**: in-memory entity for tests and demos

mod action;
mod engine;
mod entity;
mod error;
mod memory;

pub use action::Action;
pub use entity::{ActionCallback, ActionEvent, BoxError, Entity, OnActionCallback};
pub use error::ActionError;
pub use memory::{MemoryEntity, MemoryEntityError};
