//! Builder for declaring actions.

use crate::core::{Expr, Gate};
use crate::effects::{ActionCallback, BoxError, Entity};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;

/// Builder for declaring an action with a fluent API.
///
/// Register it with [`Multistate::register`](crate::Multistate::register).
/// Without `.from(..)` the action applies to the empty combination only;
/// without `.caption(..)` the id doubles as caption.
pub struct ActionBuilder<E: Entity> {
    pub(crate) id: String,
    pub(crate) caption: Option<String>,
    pub(crate) guard: Option<Expr>,
    pub(crate) set: Vec<String>,
    pub(crate) reset: Vec<String>,
    pub(crate) callback: Option<ActionCallback<E>>,
    pub(crate) gate: Option<Gate<E::Context>>,
}

impl<E: Entity> ActionBuilder<E> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            caption: None,
            guard: None,
            set: Vec::new(),
            reset: Vec::new(),
            callback: None,
            gate: None,
        }
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Guard the action must satisfy on the current combination.
    pub fn from(mut self, guard: Expr) -> Self {
        self.guard = Some(guard);
        self
    }

    /// States the action sets, by id or by [`Flag`](crate::Flag).
    pub fn set<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set
            .extend(states.into_iter().map(|s| s.as_ref().to_owned()));
        self
    }

    /// States the action clears, by id or by [`Flag`](crate::Flag).
    pub fn reset<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reset
            .extend(states.into_iter().map(|s| s.as_ref().to_owned()));
        self
    }

    /// Effect run when the action executes, before the new combination is
    /// stored.
    pub fn on_do<F>(mut self, callback: F) -> Self
    where
        F: Fn(&E::Context, &[Value]) -> BoxedEffect<(), BoxError, E> + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Gate that may veto the action at call time.
    pub fn available_when(mut self, gate: Gate<E::Context>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl<E: Entity> fmt::Debug for ActionBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionBuilder")
            .field("id", &self.id)
            .field("caption", &self.caption)
            .field("guard", &self.guard)
            .field("set", &self.set)
            .field("reset", &self.reset)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}
