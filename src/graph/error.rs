//! Compile and snapshot errors.

use crate::core::Combination;
use crate::lint::LintViolation;
use thiserror::Error;

/// Errors that can occur while compiling the transition graph.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("multistate is already compiled")]
    AlreadyCompiled,

    #[error("the state {combination} exists in at least 2 clusters: {first} and {second}")]
    AmbiguousCluster {
        combination: Combination,
        first: String,
        second: String,
    },

    /// Lint level is `deny` and the lint pass found problems.
    #[error("compile denied by {} lint violation(s)", .violations.len())]
    Lint { violations: Vec<LintViolation> },
}

/// Errors that can occur while exporting or loading a graph snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("multistate is not compiled")]
    NotCompiled,

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}
