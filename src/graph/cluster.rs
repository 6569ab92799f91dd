//! Named groups of reachable combinations.

use crate::core::{Combination, Expr};
use crate::graph::error::CompileError;
use std::collections::BTreeMap;

/// A named partition of reachable combinations, selected by a guard.
///
/// Ids are assigned in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub(crate) id: usize,
    pub(crate) name: String,
    pub(crate) guard: Expr,
}

impl Cluster {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn guard(&self) -> &Expr {
        &self.guard
    }
}

/// Assign every combination to the one cluster whose guard matches it.
///
/// Combinations no cluster matches are left out. A combination matched by
/// two clusters is an error naming both.
pub(crate) fn partition(
    clusters: &[Cluster],
    combinations: impl Iterator<Item = Combination> + Clone,
) -> Result<BTreeMap<Combination, usize>, CompileError> {
    let mut assignment: BTreeMap<Combination, usize> = BTreeMap::new();

    for cluster in clusters {
        for combination in combinations.clone().filter(|&c| cluster.guard.eval(c)) {
            if let Some(&first) = assignment.get(&combination) {
                return Err(CompileError::AmbiguousCluster {
                    combination,
                    first: clusters[first].name.clone(),
                    second: cluster.name.clone(),
                });
            }
            assignment.insert(combination, cluster.id);
        }
    }

    Ok(assignment)
}
