//! Declaration errors.

use thiserror::Error;

/// Errors that can occur while declaring states, actions and clusters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("invalid {kind} id '{id}', must match [a-z0-9_-]+ and not be 'empty' or 'any'")]
    InvalidIdentifier { kind: &'static str, id: String },

    #[error("state '{id}' already exists")]
    DuplicateState { id: String },

    #[error("action '{id}' already exists")]
    DuplicateAction { id: String },

    #[error("bit {bit} is out of range, must be less than 64")]
    BitOutOfRange { bit: u8 },

    #[error("bit {bit} is already used by state '{owner}'")]
    BitAlreadyUsed { bit: u8, owner: String },

    #[error("action '{action}' refers to state '{state}' which doesn't exist")]
    UnknownState { action: String, state: String },

    #[error("on-action callback is already set")]
    OnActionAlreadySet,

    #[error("multistate is compiled, no more declarations accepted")]
    Sealed,
}
