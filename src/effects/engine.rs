//! Executing actions against an entity.

use crate::core::{Combination, EMPTY};
use crate::effects::entity::{ActionEvent, Entity};
use crate::effects::error::ActionError;
use crate::machine::Multistate;
use serde_json::Value;
use stillwater::effect::Effect;
use tracing::{debug, warn};

/// Route a failure through `end_action`. If the entity swallows it, report
/// `fallback`, the combination seen before anything was committed.
async fn abort<E: Entity>(
    entity: &E,
    ctx: E::Context,
    action: &str,
    error: ActionError,
    fallback: Combination,
) -> Result<Combination, ActionError> {
    warn!(action, error = %error, "action failed");
    entity.end_action(ctx, Some(error)).await.map(|()| fallback)
}

impl<E: Entity> Multistate<E> {
    /// Execute `action` on `entity`.
    ///
    /// The call is bracketed by `start_action` and `end_action`; whatever
    /// `end_action` returns is the result. On success that is the new
    /// combination, which `set_state` has already handed to the entity.
    /// If `end_action` swallows a failure, the result is `Ok` with the
    /// combination from before the action (`get_state`'s value, or `EMPTY`
    /// when the failure came first); nothing was committed.
    ///
    /// Callbacks run in this order: the registry-wide one set with
    /// [`set_on_action`](Self::set_on_action), then the action's own. Nothing
    /// is retried.
    pub async fn do_action(
        &self,
        ctx: &E::Context,
        entity: &E,
        action: &str,
        opts: &[Value],
    ) -> Result<Combination, ActionError> {
        let ctx = match entity.start_action(ctx).await {
            Ok(ctx) => ctx,
            Err(source) => {
                return abort(entity, ctx.clone(), action, ActionError::Entity(source), EMPTY).await
            }
        };

        let previous = match entity.get_state(&ctx).await {
            Ok(previous) => previous,
            Err(source) => {
                return abort(entity, ctx, action, ActionError::Entity(source), EMPTY).await
            }
        };

        match self.execute(&ctx, entity, action, previous, opts).await {
            Ok(next) => {
                entity.end_action(ctx, None).await?;
                debug!(action, from = previous, to = next, "action committed");
                Ok(next)
            }
            Err(error) => abort(entity, ctx, action, error, previous).await,
        }
    }

    async fn execute(
        &self,
        ctx: &E::Context,
        entity: &E,
        action_id: &str,
        previous: Combination,
        opts: &[Value],
    ) -> Result<Combination, ActionError> {
        let transitions = self
            .graph
            .as_ref()
            .and_then(|graph| graph.transitions(previous))
            .ok_or(ActionError::InvalidState { state: previous })?;

        let invalid_action = || ActionError::InvalidAction {
            action: action_id.to_owned(),
            state: previous,
        };
        let next = transitions.get(action_id).copied().ok_or_else(invalid_action)?;
        let action = self.actions.get(action_id).ok_or_else(invalid_action)?;

        if let Some(gate) = action.gate() {
            if !gate.check(ctx) {
                return Err(ActionError::NotAvailable {
                    action: action_id.to_owned(),
                    state: previous,
                    gate: gate.label().to_owned(),
                });
            }
        }

        if let Some(on_action) = &self.on_action {
            let event = ActionEvent {
                ctx,
                previous,
                next,
                action: action_id,
                opts,
            };
            on_action(&event)
                .run(entity)
                .await
                .map_err(|source| ActionError::ExecutionAction {
                    action: action_id.to_owned(),
                    source,
                })?;
        }

        if let Some(callback) = &action.callback {
            callback(ctx, opts)
                .run(entity)
                .await
                .map_err(|source| ActionError::ExecutionAction {
                    action: action_id.to_owned(),
                    source,
                })?;
        }

        entity
            .set_state(ctx, next, opts)
            .await
            .map_err(|source| ActionError::SetState {
                state: next,
                source,
            })?;

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{Expr, Gate};
    use crate::effects::{ActionError, BoxError, MemoryEntity};
    use crate::machine::Multistate;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use stillwater::prelude::*;

    fn document(gate_open: Arc<AtomicBool>) -> Multistate<MemoryEntity> {
        let mut ms = Multistate::new("New");
        let draft = ms.must_add_state(0, "draft", "Draft");
        ms.must_add_state(1, "signed", "Signed");
        ms.must_add_action("write", "Write", Expr::empty(), &["draft"], &[], None, None);
        ms.must_add_action(
            "sign",
            "Sign",
            Expr::from(&draft),
            &["signed"],
            &["draft"],
            None,
            Some(Gate::new("may sign", move |_: &()| {
                gate_open.load(Ordering::SeqCst)
            })),
        );
        ms.must_compile();
        ms
    }

    #[tokio::test]
    async fn commits_new_combination() {
        let ms = document(Arc::new(AtomicBool::new(true)));
        let entity = MemoryEntity::new();

        assert_eq!(ms.do_action(&(), &entity, "write", &[]).await.unwrap(), 1);
        assert_eq!(ms.do_action(&(), &entity, "sign", &[]).await.unwrap(), 2);

        assert_eq!(entity.state(), 2);
        assert_eq!(entity.history().get_path(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn unknown_combination_is_invalid_state() {
        let ms = document(Arc::new(AtomicBool::new(true)));
        let entity = MemoryEntity::with_state(3);

        let err = ms.do_action(&(), &entity, "sign", &[]).await.unwrap_err();

        assert!(matches!(err, ActionError::InvalidState { state: 3 }));
    }

    #[tokio::test]
    async fn missing_edge_is_invalid_action() {
        let ms = document(Arc::new(AtomicBool::new(true)));
        let entity = MemoryEntity::new();

        let err = ms.do_action(&(), &entity, "sign", &[]).await.unwrap_err();

        assert!(matches!(
            err,
            ActionError::InvalidAction { ref action, state: 0 } if action == "sign"
        ));
        assert_eq!(entity.state(), 0);
    }

    #[tokio::test]
    async fn closed_gate_is_not_available() {
        let ms = document(Arc::new(AtomicBool::new(false)));
        let entity = MemoryEntity::with_state(1);

        let err = ms.do_action(&(), &entity, "sign", &[]).await.unwrap_err();

        assert!(matches!(
            err,
            ActionError::NotAvailable { ref gate, state: 1, .. } if gate == "may sign"
        ));
        assert_eq!(entity.state(), 1);
    }

    #[tokio::test]
    async fn uncompiled_registry_rejects_every_state() {
        let mut ms = Multistate::<MemoryEntity>::new("New");
        ms.must_add_state(0, "a", "A");
        ms.must_add_action("set_a", "Set A", Expr::empty(), &["a"], &[], None, None);

        let err = ms
            .do_action(&(), &MemoryEntity::new(), "set_a", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, ActionError::InvalidState { state: 0 }));
    }

    #[tokio::test]
    async fn callbacks_run_in_order_with_options() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut ms = Multistate::<MemoryEntity>::new("New");
        ms.must_add_state(0, "a", "A");

        let seen = Arc::clone(&calls);
        ms.set_on_action(move |event| {
            seen.lock()
                .unwrap()
                .push(format!("on_action {} {}->{}", event.action, event.previous, event.next));
            pure(()).boxed()
        })
        .unwrap();

        let seen = Arc::clone(&calls);
        ms.must_add_action(
            "set_a",
            "Set A",
            Expr::empty(),
            &["a"],
            &[],
            Some(Arc::new(move |_: &(), opts: &[serde_json::Value]| {
                seen.lock().unwrap().push(format!("callback {}", opts.len()));
                pure(()).boxed()
            })),
            None,
        );
        ms.must_compile();

        let entity = MemoryEntity::new();
        ms.do_action(&(), &entity, "set_a", &[json!({"reason": "test"})])
            .await
            .unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["on_action set_a 0->1".to_string(), "callback 1".to_string()]
        );
    }

    #[tokio::test]
    async fn callback_sees_entity_as_environment() {
        let mut ms = Multistate::<MemoryEntity>::new("New");
        ms.must_add_state(0, "a", "A");
        ms.must_add_action(
            "set_a",
            "Set A",
            Expr::empty(),
            &["a"],
            &[],
            Some(Arc::new(|_: &(), _: &[serde_json::Value]| {
                from_fn(|entity: &MemoryEntity| {
                    if entity.state() == 0 {
                        Ok(())
                    } else {
                        Err(BoxError::from("unexpected state"))
                    }
                })
                .boxed()
            })),
            None,
        );
        ms.must_compile();

        assert_eq!(
            ms.do_action(&(), &MemoryEntity::new(), "set_a", &[])
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn failing_callback_rolls_back() {
        let mut ms = Multistate::<MemoryEntity>::new("New");
        ms.must_add_state(0, "a", "A");
        ms.must_add_action(
            "set_a",
            "Set A",
            Expr::empty(),
            &["a"],
            &[],
            Some(Arc::new(|_: &(), _: &[serde_json::Value]| {
                fail(BoxError::from("boom")).boxed()
            })),
            None,
        );
        ms.must_compile();
        let entity = MemoryEntity::new();

        let err = ms.do_action(&(), &entity, "set_a", &[]).await.unwrap_err();

        match err {
            ActionError::ExecutionAction { action, source } => {
                assert_eq!(action, "set_a");
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("expected ExecutionAction, got {other:?}"),
        }
        assert_eq!(entity.state(), 0);
        assert!(entity.history().is_empty());
    }

    #[tokio::test]
    async fn failing_on_action_stops_before_action_callback() {
        let callback_ran = Arc::new(AtomicBool::new(false));
        let mut ms = Multistate::<MemoryEntity>::new("New");
        ms.must_add_state(0, "a", "A");
        ms.set_on_action(|_| fail(BoxError::from("audit down")).boxed())
            .unwrap();

        let ran = Arc::clone(&callback_ran);
        ms.must_add_action(
            "set_a",
            "Set A",
            Expr::empty(),
            &["a"],
            &[],
            Some(Arc::new(move |_: &(), _: &[serde_json::Value]| {
                ran.store(true, Ordering::SeqCst);
                pure(()).boxed()
            })),
            None,
        );
        ms.must_compile();
        let entity = MemoryEntity::new();

        let err = ms.do_action(&(), &entity, "set_a", &[]).await.unwrap_err();

        match err {
            ActionError::ExecutionAction { action, source } => {
                assert_eq!(action, "set_a");
                assert_eq!(source.to_string(), "audit down");
            }
            other => panic!("expected ExecutionAction, got {other:?}"),
        }
        assert!(!callback_ran.load(Ordering::SeqCst));
        assert_eq!(entity.state(), 0);
        assert!(entity.history().is_empty());
    }

    #[tokio::test]
    async fn set_state_failure_is_wrapped() {
        let ms = document(Arc::new(AtomicBool::new(true)));
        let entity = MemoryEntity::new();
        entity.fail_set_state(true);

        let err = ms.do_action(&(), &entity, "write", &[]).await.unwrap_err();

        assert!(matches!(err, ActionError::SetState { state: 1, .. }));
    }

    #[tokio::test]
    async fn entity_failures_are_routed_through_end_action() {
        let ms = document(Arc::new(AtomicBool::new(true)));

        let entity = MemoryEntity::new();
        entity.fail_start_action(true);
        let err = ms.do_action(&(), &entity, "write", &[]).await.unwrap_err();
        assert!(matches!(err, ActionError::Entity(_)));

        let entity = MemoryEntity::new();
        entity.fail_get_state(true);
        let err = ms.do_action(&(), &entity, "write", &[]).await.unwrap_err();
        assert!(matches!(err, ActionError::Entity(_)));
    }

    #[tokio::test]
    async fn suppressed_failure_returns_previous_combination() {
        let ms = document(Arc::new(AtomicBool::new(false)));
        let entity = MemoryEntity::with_state(1);
        entity.suppress_errors(true);

        assert_eq!(ms.do_action(&(), &entity, "sign", &[]).await.unwrap(), 1);
        assert_eq!(entity.state(), 1);

        entity.fail_start_action(true);
        assert_eq!(ms.do_action(&(), &entity, "sign", &[]).await.unwrap(), 0);
    }
}
