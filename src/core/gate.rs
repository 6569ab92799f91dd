//! Availability gates that veto otherwise-applicable actions.
//!
//! Gates are pure predicates over the caller's context, typically a
//! permission check. They only filter or veto; they never mutate.

use std::fmt;
use std::sync::Arc;

/// Predicate over a call context deciding whether an action is permitted
/// right now, together with a human-readable label.
///
/// # Example
///
/// ```rust
/// use multistate::Gate;
///
/// struct Session {
///     admin: bool,
/// }
///
/// let admins_only = Gate::new("admins only", |s: &Session| s.admin);
///
/// assert!(admins_only.check(&Session { admin: true }));
/// assert!(!admins_only.check(&Session { admin: false }));
/// assert_eq!(admins_only.label(), "admins only");
/// ```
pub struct Gate<C> {
    label: String,
    predicate: Arc<dyn Fn(&C) -> bool + Send + Sync>,
}

impl<C> Gate<C> {
    /// Create a gate from a predicate.
    ///
    /// The predicate must be side-effect free and thread-safe.
    pub fn new<F>(label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Check if the gate lets the action through for `ctx`.
    pub fn check(&self, ctx: &C) -> bool {
        (self.predicate)(ctx)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<C> Clone for Gate<C> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<C> fmt::Debug for Gate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
