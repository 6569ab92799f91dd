//! Read-only questions about a compiled multistate.

use crate::core::{Combination, Flag, EMPTY};
use crate::effects::Entity;
use crate::graph::{Cluster, Transitions};
use crate::machine::Multistate;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("state '{id}' doesn't exist")]
    InvalidState { id: String },
}

impl<E: Entity> Multistate<E> {
    /// Actions leading out of `combination` whose gate is open for `ctx`.
    ///
    /// An unreachable combination has no actions.
    pub fn state_actions(&self, ctx: &E::Context, combination: Combination) -> Vec<String> {
        let Some(transitions) = self.transitions(combination) else {
            return Vec::new();
        };

        transitions
            .keys()
            .filter(|id| {
                self.actions
                    .get(id.as_str())
                    .is_some_and(|action| action.is_available(ctx))
            })
            .cloned()
            .collect()
    }

    /// Flags set in `combination`, ascending by bit.
    ///
    /// Bits with no declared flag are skipped.
    pub fn state_flags(&self, combination: Combination) -> Vec<Flag> {
        self.flags()
            .filter(|flag| flag.is_set(combination))
            .cloned()
            .collect()
    }

    /// Human-readable name of `combination`.
    ///
    /// ```rust
    /// use multistate::{MemoryEntity, Multistate};
    ///
    /// let mut ms = Multistate::<MemoryEntity>::new("New");
    /// ms.add_state(0, "draft", "Draft").unwrap();
    /// ms.add_state(1, "signed", "Signed").unwrap();
    ///
    /// assert_eq!(ms.state_name(0), "New");
    /// assert_eq!(ms.state_name(3), "Draft.\nSigned.");
    /// ```
    pub fn state_name(&self, combination: Combination) -> String {
        let captions: Vec<&str> = self
            .flags()
            .filter(|flag| flag.is_set(combination))
            .map(Flag::caption)
            .collect();

        if captions.is_empty() {
            self.config.empty_state_name().to_owned()
        } else {
            format!("{}.", captions.join(".\n"))
        }
    }

    pub fn action_caption(&self, id: &str) -> Option<&str> {
        self.action(id).map(|action| action.caption())
    }

    /// Combinations with at least one of `actions` leading out of them.
    pub fn states_by_actions(&self, actions: &[&str]) -> Vec<Combination> {
        let wanted: BTreeSet<&str> = actions.iter().copied().collect();

        self.graph
            .iter()
            .flat_map(|graph| graph.table().iter())
            .filter(|(_, transitions)| transitions.keys().any(|id| wanted.contains(id.as_str())))
            .map(|(&combination, _)| combination)
            .collect()
    }

    /// Combinations with any of `states` set. Unknown ids are ignored.
    pub fn multistates_by_state_ids(&self, states: &[&str]) -> Vec<Combination> {
        let mask = states
            .iter()
            .filter_map(|id| self.flags.get(*id))
            .fold(EMPTY, |mask, flag| mask | flag.mask());

        self.combinations().filter(|c| c & mask != 0).collect()
    }

    /// Combinations with every `required` flag set and no `forbidden` flag set.
    pub fn multistates_by_required_and_forbidden(
        &self,
        required: &[&str],
        forbidden: &[&str],
    ) -> Result<Vec<Combination>, QueryError> {
        let required = self.mask_of_known(required)?;
        let forbidden = self.mask_of_known(forbidden)?;

        Ok(self
            .combinations()
            .filter(|c| c & required == required && c & forbidden == 0)
            .collect())
    }

    fn mask_of_known(&self, ids: &[&str]) -> Result<Combination, QueryError> {
        ids.iter().try_fold(EMPTY, |mask, id| {
            self.flags
                .get(*id)
                .map(|flag| mask | flag.mask())
                .ok_or_else(|| QueryError::InvalidState {
                    id: (*id).to_owned(),
                })
        })
    }

    /// The cluster `combination` belongs to, if any.
    pub fn cluster_of(&self, combination: Combination) -> Option<&Cluster> {
        let id = self.graph.as_ref()?.cluster_of(combination)?;
        self.clusters.get(id)
    }

    /// Every reachable combination, ascending. Empty before compile.
    pub fn combinations(&self) -> impl Iterator<Item = Combination> + '_ {
        self.graph.iter().flat_map(|graph| graph.combinations())
    }

    /// Outgoing edges of `combination`.
    pub fn transitions(&self, combination: Combination) -> Option<&Transitions> {
        self.graph.as_ref()?.transitions(combination)
    }
}
