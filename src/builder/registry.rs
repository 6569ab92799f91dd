//! Declaration and compilation of a multistate.

use crate::builder::action::ActionBuilder;
use crate::builder::error::DeclarationError;
use crate::config::LintLevel;
use crate::core::{is_reserved, is_valid_identifier, Combination, Expr, Flag, Gate, EMPTY, MAX_BIT};
use crate::effects::{Action, ActionCallback, ActionEvent, BoxError, Entity};
use crate::graph::{close, partition, Cluster, CompileError, CompiledGraph, Rule};
use crate::lint::{enforce, into_violations};
use crate::machine::Multistate;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;
use tracing::{debug, warn};

fn check_identifier(kind: &'static str, id: &str) -> Result<(), DeclarationError> {
    if is_valid_identifier(id) && !is_reserved(id) {
        Ok(())
    } else {
        Err(DeclarationError::InvalidIdentifier {
            kind,
            id: id.to_owned(),
        })
    }
}

impl<E: Entity> Multistate<E> {
    fn ensure_open(&self) -> Result<(), DeclarationError> {
        if self.sealed {
            Err(DeclarationError::Sealed)
        } else {
            Ok(())
        }
    }

    fn mask_of(&self, action: &str, ids: &[&str]) -> Result<Combination, DeclarationError> {
        ids.iter().try_fold(EMPTY, |mask, id| {
            self.flags
                .get(*id)
                .map(|flag| mask | flag.mask())
                .ok_or_else(|| DeclarationError::UnknownState {
                    action: action.to_owned(),
                    state: (*id).to_owned(),
                })
        })
    }

    /// Declare a flag bound to `bit`.
    pub fn add_state(&mut self, bit: u8, id: &str, caption: &str) -> Result<Flag, DeclarationError> {
        self.ensure_open()?;
        check_identifier("state", id)?;

        if bit > MAX_BIT {
            return Err(DeclarationError::BitOutOfRange { bit });
        }
        if self.flags.contains_key(id) {
            return Err(DeclarationError::DuplicateState { id: id.to_owned() });
        }
        if let Some(owner) = self.bits.get(&bit) {
            return Err(DeclarationError::BitAlreadyUsed {
                bit,
                owner: owner.clone(),
            });
        }

        let flag = Flag::new(bit, id, caption);
        self.flags.insert(id.to_owned(), flag.clone());
        self.bits.insert(bit, id.to_owned());
        Ok(flag)
    }

    /// Like [`add_state`](Self::add_state), panicking on error.
    pub fn must_add_state(&mut self, bit: u8, id: &str, caption: &str) -> Flag {
        self.add_state(bit, id, caption)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Declare an action.
    ///
    /// `set` and `reset` name the flags the action sets and clears; every one
    /// of them must already be declared.
    #[allow(clippy::too_many_arguments)]
    pub fn add_action(
        &mut self,
        id: &str,
        caption: &str,
        guard: Expr,
        set: &[&str],
        reset: &[&str],
        callback: Option<ActionCallback<E>>,
        gate: Option<Gate<E::Context>>,
    ) -> Result<&Action<E>, DeclarationError> {
        self.ensure_open()?;
        check_identifier("action", id)?;

        if self.actions.contains_key(id) {
            return Err(DeclarationError::DuplicateAction { id: id.to_owned() });
        }

        let set_mask = self.mask_of(id, set)?;
        let reset_mask = !self.mask_of(id, reset)?;

        let action = Action {
            id: id.to_owned(),
            caption: caption.to_owned(),
            guard,
            set_mask,
            reset_mask,
            callback,
            gate,
        };
        Ok(self.actions.entry(id.to_owned()).or_insert(action))
    }

    /// Like [`add_action`](Self::add_action), panicking on error.
    #[allow(clippy::too_many_arguments)]
    pub fn must_add_action(
        &mut self,
        id: &str,
        caption: &str,
        guard: Expr,
        set: &[&str],
        reset: &[&str],
        callback: Option<ActionCallback<E>>,
        gate: Option<Gate<E::Context>>,
    ) -> &Action<E> {
        self.add_action(id, caption, guard, set, reset, callback, gate)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Declare an action from a builder.
    pub fn register(&mut self, builder: ActionBuilder<E>) -> Result<&Action<E>, DeclarationError> {
        let ActionBuilder {
            id,
            caption,
            guard,
            set,
            reset,
            callback,
            gate,
        } = builder;

        let set: Vec<&str> = set.iter().map(String::as_str).collect();
        let reset: Vec<&str> = reset.iter().map(String::as_str).collect();
        let caption = caption.as_deref().unwrap_or(&id);

        self.add_action(
            &id,
            caption,
            guard.unwrap_or_else(Expr::empty),
            &set,
            &reset,
            callback,
            gate,
        )
    }

    /// Declare a cluster and return its id.
    ///
    /// Names are not checked for uniqueness.
    pub fn add_cluster(&mut self, name: &str, guard: Expr) -> Result<usize, DeclarationError> {
        self.ensure_open()?;

        let id = self.clusters.len();
        self.clusters.push(Cluster {
            id,
            name: name.to_owned(),
            guard,
        });
        Ok(id)
    }

    /// Set the callback run before every action's own callback.
    pub fn set_on_action<F>(&mut self, callback: F) -> Result<(), DeclarationError>
    where
        F: Fn(&ActionEvent<'_, E::Context>) -> BoxedEffect<(), BoxError, E>
            + Send
            + Sync
            + 'static,
    {
        self.ensure_open()?;
        if self.on_action.is_some() {
            return Err(DeclarationError::OnActionAlreadySet);
        }

        self.on_action = Some(Arc::new(callback));
        Ok(())
    }

    /// Build the complete transition graph from the declarations.
    ///
    /// Seals the registry whatever the outcome; a second call fails with
    /// [`CompileError::AlreadyCompiled`].
    pub fn compile(&mut self) -> Result<(), CompileError> {
        if self.sealed {
            return Err(CompileError::AlreadyCompiled);
        }
        self.sealed = true;

        let rules: Vec<Rule<'_>> = self
            .actions
            .values()
            .map(|action| Rule {
                id: &action.id,
                guard: &action.guard,
                set_mask: action.set_mask,
                reset_mask: action.reset_mask,
            })
            .collect();
        let table = close(&rules);
        let clusters = partition(&self.clusters, table.keys().copied())?;
        let graph = CompiledGraph { table, clusters };

        debug!(
            combinations = graph.len(),
            edges = graph.edge_count(),
            clusters = self.clusters.len(),
            "compiled multistate"
        );

        match self.config.lint {
            LintLevel::Allow => {}
            LintLevel::Warn => {
                for violation in into_violations(enforce(self, &graph)) {
                    warn!(%violation, "lint violation");
                }
            }
            LintLevel::Deny => {
                let violations = into_violations(enforce(self, &graph));
                if !violations.is_empty() {
                    return Err(CompileError::Lint { violations });
                }
            }
        }

        self.graph = Some(graph);
        Ok(())
    }

    /// Like [`compile`](Self::compile), panicking on error.
    pub fn must_compile(&mut self) {
        self.compile().unwrap_or_else(|err| panic!("{err}"));
    }
}
