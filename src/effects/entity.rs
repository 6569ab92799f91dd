//! The entity capability consumed by the execution engine.

use crate::core::Combination;
use crate::effects::error::ActionError;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;

/// Boxed error produced by entity hooks and action callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The object that persists one subject's combination.
///
/// `do_action` brackets every call with `start_action` / `end_action`, so an
/// implementation can open a transaction or take a row lock in
/// `start_action` and commit or roll back in `end_action`. The engine never
/// stores or mutates entity state itself.
///
/// Entities are cheap handles (`Clone`): action callbacks receive the entity
/// as the environment of their effect.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Per-call context. `start_action` may replace it, e.g. with one that
    /// carries an open transaction.
    type Context: Clone + Send + Sync + 'static;

    fn start_action(
        &self,
        ctx: &Self::Context,
    ) -> impl Future<Output = Result<Self::Context, BoxError>> + Send;

    fn get_state(
        &self,
        ctx: &Self::Context,
    ) -> impl Future<Output = Result<Combination, BoxError>> + Send;

    fn set_state(
        &self,
        ctx: &Self::Context,
        state: Combination,
        opts: &[Value],
    ) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Called exactly once per `do_action`, with the failure if any step
    /// failed. Whatever this returns is what `do_action` returns, so the
    /// entity may translate or suppress the error.
    fn end_action(
        &self,
        ctx: Self::Context,
        error: Option<ActionError>,
    ) -> impl Future<Output = Result<(), ActionError>> + Send;
}

/// Effect factory run when a specific action executes.
///
/// Receives the action context and the caller's options; the returned effect
/// is run with the entity as its environment.
pub type ActionCallback<E> = Arc<
    dyn Fn(&<E as Entity>::Context, &[Value]) -> BoxedEffect<(), BoxError, E> + Send + Sync,
>;

/// Effect factory run before every action's own callback.
pub type OnActionCallback<E> = Arc<
    dyn Fn(&ActionEvent<'_, <E as Entity>::Context>) -> BoxedEffect<(), BoxError, E>
        + Send
        + Sync,
>;

/// What the registry-wide callback gets to see about an action in flight.
#[derive(Debug)]
pub struct ActionEvent<'a, C> {
    pub ctx: &'a C,
    pub previous: Combination,
    pub next: Combination,
    pub action: &'a str,
    pub opts: &'a [Value],
}
