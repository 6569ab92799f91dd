//! Declared actions: a guard plus set/reset masks and optional hooks.

use crate::core::{Combination, Expr, Gate};
use crate::effects::entity::{ActionCallback, Entity};
use std::fmt;
use std::sync::Arc;

/// A named, guarded transformation of a combination.
///
/// Applying an action sets every bit of `set_mask` and then keeps only the
/// bits of `reset_mask`, so `reset_mask` is the complement of the flags the
/// action clears. Both masks are commutative folds, so the order in which
/// set/reset flags were listed is irrelevant.
pub struct Action<E: Entity> {
    pub(crate) id: String,
    pub(crate) caption: String,
    pub(crate) guard: Expr,
    pub(crate) set_mask: Combination,
    pub(crate) reset_mask: Combination,
    pub(crate) callback: Option<ActionCallback<E>>,
    pub(crate) gate: Option<Gate<E::Context>>,
}

impl<E: Entity> Action<E> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn guard(&self) -> &Expr {
        &self.guard
    }

    pub fn set_mask(&self) -> Combination {
        self.set_mask
    }

    /// Bits preserved by the action.
    pub fn reset_mask(&self) -> Combination {
        self.reset_mask
    }

    pub fn gate(&self) -> Option<&Gate<E::Context>> {
        self.gate.as_ref()
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Check if the guard holds on `combination` (pure).
    pub fn can_execute(&self, combination: Combination) -> bool {
        self.guard.eval(combination)
    }

    /// The combination this action leads to from `combination` (pure).
    pub fn apply(&self, combination: Combination) -> Combination {
        (combination | self.set_mask) & self.reset_mask
    }

    /// Check the availability gate, if any, for `ctx`.
    pub fn is_available(&self, ctx: &E::Context) -> bool {
        self.gate.as_ref().is_none_or(|g| g.check(ctx))
    }
}

impl<E: Entity> Clone for Action<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            caption: self.caption.clone(),
            guard: self.guard.clone(),
            set_mask: self.set_mask,
            reset_mask: self.reset_mask,
            callback: self.callback.as_ref().map(Arc::clone),
            gate: self.gate.clone(),
        }
    }
}

impl<E: Entity> fmt::Debug for Action<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("id", &self.id)
            .field("caption", &self.caption)
            .field("guard", &self.guard)
            .field("set_mask", &format_args!("{:#b}", self.set_mask))
            .field("reset_mask", &format_args!("{:#x}", self.reset_mask))
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::MemoryEntity;

    fn action(guard: Expr, set_mask: Combination, reset_mask: Combination) -> Action<MemoryEntity> {
        Action {
            id: "sign".to_string(),
            caption: "Sign".to_string(),
            guard,
            set_mask,
            reset_mask,
            callback: None,
            gate: None,
        }
    }

    #[test]
    fn can_execute_follows_guard() {
        let sign = action(Expr::and([Expr::bit(0), !Expr::bit(2)]), 0b100, !0);

        assert!(sign.can_execute(0b001));
        assert!(!sign.can_execute(0b101));
        assert!(!sign.can_execute(0));
    }

    #[test]
    fn apply_sets_then_resets() {
        // set c, reset a and b
        let sign = action(Expr::any(), 0b100, !0b011);

        assert_eq!(sign.apply(0b001), 0b100);
        assert_eq!(sign.apply(0b011), 0b100);
        assert_eq!(sign.apply(0b1000), 0b1100);
    }

    #[test]
    fn reset_wins_over_set_on_same_bit() {
        let toggle = action(Expr::any(), 0b1, !0b1);

        assert_eq!(toggle.apply(0), 0);
        assert_eq!(toggle.apply(0b11), 0b10);
    }

    #[test]
    fn apply_is_pure() {
        let sign = action(Expr::any(), 0b10000, !0b100);

        for combination in 0..32 {
            assert_eq!(sign.apply(combination), sign.apply(combination));
        }
    }

    #[test]
    fn ungated_action_is_always_available() {
        assert!(action(Expr::any(), 1, !0).is_available(&()));
    }

    #[test]
    fn gate_vetoes_availability() {
        let mut sign = action(Expr::any(), 1, !0);
        sign.gate = Some(Gate::new("closed", |_: &()| false));

        assert!(!sign.is_available(&()));
        assert_eq!(sign.gate().map(Gate::label), Some("closed"));
    }
}
