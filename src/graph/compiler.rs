//! Least-fixpoint closure of the declared actions over the combination space.

use crate::core::{Combination, Expr, EMPTY};
use std::collections::{BTreeMap, VecDeque};

/// Outgoing edges of one combination: action id → resulting combination.
pub type Transitions = BTreeMap<String, Combination>;

/// The part of an action the compiler needs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rule<'a> {
    pub id: &'a str,
    pub guard: &'a Expr,
    pub set_mask: Combination,
    pub reset_mask: Combination,
}

impl Rule<'_> {
    fn apply(&self, combination: Combination) -> Combination {
        (combination | self.set_mask) & self.reset_mask
    }
}

/// Compute every combination reachable from [`EMPTY`] and all of their
/// outgoing edges.
///
/// Each discovered combination is expanded exactly once: an edge's guard
/// and target depend only on its source combination, so this reaches the
/// same fixpoint as repeating full passes until nothing changes, and the
/// result does not depend on the order of `rules`.
pub(crate) fn close(rules: &[Rule<'_>]) -> BTreeMap<Combination, Transitions> {
    let mut table: BTreeMap<Combination, Transitions> = BTreeMap::new();
    table.insert(EMPTY, Transitions::new());
    let mut frontier = VecDeque::from([EMPTY]);

    while let Some(combination) = frontier.pop_front() {
        let mut transitions = Transitions::new();

        for rule in rules.iter().filter(|r| r.guard.eval(combination)) {
            let next = rule.apply(combination);
            transitions.insert(rule.id.to_owned(), next);

            if !table.contains_key(&next) {
                table.insert(next, Transitions::new());
                frontier.push_back(next);
            }
        }

        table.insert(combination, transitions);
    }

    table
}

/// The compiled transition table plus the cluster assignment of every
/// reachable combination.
///
/// Immutable once built; safe to share across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledGraph {
    pub(crate) table: BTreeMap<Combination, Transitions>,
    pub(crate) clusters: BTreeMap<Combination, usize>,
}

impl CompiledGraph {
    /// Check whether `combination` is reachable from [`EMPTY`].
    pub fn contains(&self, combination: Combination) -> bool {
        self.table.contains_key(&combination)
    }

    /// Outgoing edges of `combination`, `None` if it is unreachable.
    pub fn transitions(&self, combination: Combination) -> Option<&Transitions> {
        self.table.get(&combination)
    }

    /// Where `action` leads from `combination`, if that edge exists.
    pub fn target(&self, combination: Combination, action: &str) -> Option<Combination> {
        self.table.get(&combination)?.get(action).copied()
    }

    /// Reachable combinations, ascending.
    pub fn combinations(&self) -> impl Iterator<Item = Combination> + '_ {
        self.table.keys().copied()
    }

    /// All edges as `(from, action, to)`, ordered by source then action id.
    pub fn edges(&self) -> impl Iterator<Item = (Combination, &str, Combination)> + '_ {
        self.table.iter().flat_map(|(&from, transitions)| {
            transitions
                .iter()
                .map(move |(action, &to)| (from, action.as_str(), to))
        })
    }

    pub fn table(&self) -> &BTreeMap<Combination, Transitions> {
        &self.table
    }

    /// Index of the cluster `combination` belongs to.
    pub fn cluster_of(&self, combination: Combination) -> Option<usize> {
        self.clusters.get(&combination).copied()
    }

    /// Number of reachable combinations.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.table.values().map(BTreeMap::len).sum()
    }
}
