//! Lint rules over a compiled graph, using Validation.

use crate::core::Combination;
use crate::effects::Entity;
use crate::graph::CompiledGraph;
use crate::lint::violations::LintViolation;
use crate::machine::Multistate;
use std::collections::BTreeSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<LintViolation>>;

fn check(violation: Option<LintViolation>) -> Check {
    match violation {
        Some(violation) => Validation::fail(violation),
        None => Validation::success(()),
    }
}

/// Run every rule, accumulating ALL violations.
pub(crate) fn enforce<E: Entity>(ms: &Multistate<E>, graph: &CompiledGraph) -> Check {
    let mut checks: Vec<Check> = Vec::new();

    let fired: BTreeSet<&str> = graph.edges().map(|(_, action, _)| action).collect();
    for action in ms.actions() {
        checks.push(check((!fired.contains(action.id())).then(|| {
            LintViolation::UnreachableAction {
                action: action.id().to_owned(),
            }
        })));
    }

    let ever_set = graph.combinations().fold(0, |acc: Combination, c| acc | c);
    for flag in ms.flags() {
        checks.push(check((!flag.is_set(ever_set)).then(|| {
            LintViolation::UnusedState {
                state: flag.id().to_owned(),
            }
        })));
    }

    for cluster in ms.clusters() {
        let matched = graph
            .combinations()
            .any(|c| graph.cluster_of(c) == Some(cluster.id()));
        checks.push(check((!matched).then(|| LintViolation::EmptyCluster {
            cluster: cluster.name().to_owned(),
        })));
    }

    for (from, action, to) in graph.edges() {
        checks.push(check((from == to).then(|| LintViolation::NoOpTransition {
            action: action.to_owned(),
            combination: from,
        })));
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Flatten a failed validation into a plain list.
pub(crate) fn into_violations(result: Check) -> Vec<LintViolation> {
    match result {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}
