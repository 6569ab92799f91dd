//! The compiled transition graph.
//!
//! - `compiler`: least-fixpoint closure over the declared actions
//! - `cluster`: partition of reachable combinations into named groups
//! - `snapshot`: serializable export and DOT rendering

mod cluster;
mod compiler;
mod error;
mod snapshot;

pub use cluster::Cluster;
pub use compiler::{CompiledGraph, Transitions};
pub use error::{CompileError, SnapshotError};
pub use snapshot::{
    ActionSummary, ClusterSummary, EdgeSnapshot, GraphSnapshot, NodeSnapshot, SNAPSHOT_VERSION,
};

pub(crate) use cluster::partition;
pub(crate) use compiler::{close, Rule};
