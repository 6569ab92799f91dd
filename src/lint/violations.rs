//! Lint violations.

use crate::core::Combination;
use thiserror::Error;

/// Structural problems found in a compiled multistate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LintViolation {
    #[error("action '{action}' never fires from any reachable state")]
    UnreachableAction { action: String },

    #[error("state '{state}' is not set in any reachable combination")]
    UnusedState { state: String },

    #[error("cluster '{cluster}' matches no reachable combination")]
    EmptyCluster { cluster: String },

    #[error("action '{action}' leaves combination {combination} unchanged")]
    NoOpTransition {
        action: String,
        combination: Combination,
    },
}
