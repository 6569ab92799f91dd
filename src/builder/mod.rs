//! Declaring states, actions and clusters.
//!
//! Declarations go through the fallible `add_*` methods on
//! [`Multistate`](crate::Multistate), their panicking `must_*` twins, the
//! fluent [`ActionBuilder`], or a [`Schema`] describing the whole machine.

mod action;
mod error;
mod registry;
mod schema;

pub use action::ActionBuilder;
pub use error::DeclarationError;
pub use schema::{ClusterDecl, Schema, SchemaError, StateDecl};
