//! Runtime errors of the action execution engine.

use crate::core::Combination;
use crate::effects::entity::BoxError;
use thiserror::Error;

/// Errors that can occur while executing an action.
///
/// Every one of these is routed through the entity's `end_action` before it
/// reaches the caller.
#[derive(Debug, Error)]
pub enum ActionError {
    /// `start_action` or `get_state` failed.
    #[error("entity failure: {0}")]
    Entity(#[source] BoxError),

    #[error("current state {state}: invalid state")]
    InvalidState { state: Combination },

    #[error("action '{action}', current state {state}: invalid action")]
    InvalidAction { action: String, state: Combination },

    #[error("action '{action}', current state {state}: not available ({gate})")]
    NotAvailable {
        action: String,
        state: Combination,
        gate: String,
    },

    /// The registry-wide or the action's own callback failed.
    #[error("action '{action}' execution failed: {source}")]
    ExecutionAction {
        action: String,
        #[source]
        source: BoxError,
    },

    #[error("set state {state} failed: {source}")]
    SetState {
        state: Combination,
        #[source]
        source: BoxError,
    },
}
