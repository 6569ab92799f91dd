//! Multistate: flag-combination state machines with a precompiled graph
//!
//! A multistate is a set of independent boolean flags, each bound to one bit
//! of a `u64`, plus guarded actions that set and clear flags. The registry
//! compiles the declarations once into the complete graph of combinations
//! reachable from the empty one, and then executes actions against entities
//! that persist their own combination.
//!
//! The pure core (guards, compilation, queries) has no side effects; the
//! effectful part is isolated in Stillwater effects run by the engine.
//!
//! # Core Concepts
//!
//! - **Flag**: a named bit, declared with `add_state`
//! - **Action**: a guard plus flags to set and flags to clear
//! - **Combination**: the `u64` of all flags set at once
//! - **Entity**: stores one subject's combination and brackets every action
//!
//! # Example
//!
//! ```rust
//! use multistate::{Expr, MemoryEntity, Multistate};
//!
//! # tokio_test();
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn tokio_test() {
//! let mut ms = Multistate::<MemoryEntity>::new("New");
//! let draft = ms.add_state(0, "draft", "Draft").unwrap();
//! let signed = ms.add_state(1, "signed", "Signed").unwrap();
//!
//! ms.add_action("write", "Write", Expr::empty(), &[draft.id()], &[], None, None)
//!     .unwrap();
//! ms.add_action("sign", "Sign", Expr::from(&draft), &[signed.id()], &[], None, None)
//!     .unwrap();
//! ms.compile().unwrap();
//!
//! let entity = MemoryEntity::new();
//! ms.do_action(&(), &entity, "write", &[]).await.unwrap();
//! let now = ms.do_action(&(), &entity, "sign", &[]).await.unwrap();
//!
//! assert_eq!(ms.state_name(now), "Draft.\nSigned.");
//! assert_eq!(ms.state_actions(&(), now), vec!["sign".to_string()]);
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod effects;
pub mod graph;
pub mod lint;
mod machine;
pub mod query;

// Re-export commonly used types
pub use builder::{ActionBuilder, ClusterDecl, DeclarationError, Schema, SchemaError, StateDecl};
pub use config::{LintLevel, MultistateConfig};
pub use core::{ActionHistory, ActionRecord, Combination, Expr, Flag, Gate, EMPTY};
pub use effects::{Action, ActionError, ActionEvent, BoxError, Entity, MemoryEntity};
pub use graph::{Cluster, CompileError, CompiledGraph, GraphSnapshot, SnapshotError};
pub use lint::LintViolation;
pub use machine::Multistate;
pub use query::QueryError;
