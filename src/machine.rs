//! The multistate registry.

use crate::config::MultistateConfig;
use crate::core::Flag;
use crate::effects::{Action, Entity, OnActionCallback};
use crate::graph::{Cluster, CompiledGraph};
use std::collections::BTreeMap;
use std::fmt;

/// Registry of flags, actions and clusters plus, once compiled, the complete
/// transition graph.
///
/// Declaration (`add_state`, `add_action`, `add_cluster`, `set_on_action`)
/// and [`compile`](Self::compile) take `&mut self` and are meant to run once
/// at start-up. After compiling, the registry is read-only: share it behind
/// an `Arc` and call [`do_action`](Self::do_action) and the queries from as
/// many tasks as needed.
///
/// # Example
///
/// ```rust
/// use multistate::{Expr, MemoryEntity, Multistate};
///
/// let mut ms = Multistate::<MemoryEntity>::new("New");
/// let draft = ms.add_state(0, "draft", "Draft").unwrap();
/// let sent = ms.add_state(1, "sent", "Sent").unwrap();
///
/// ms.add_action("write", "Write", Expr::empty(), &["draft"], &[], None, None).unwrap();
/// ms.add_action("send", "Send", Expr::from(&draft), &[sent.id()], &[draft.id()], None, None)
///     .unwrap();
/// ms.compile().unwrap();
///
/// assert_eq!(ms.combinations().collect::<Vec<_>>(), vec![0, 1, 2]);
/// assert_eq!(ms.state_name(2), "Sent.");
/// ```
pub struct Multistate<E: Entity> {
    pub(crate) config: MultistateConfig,
    pub(crate) flags: BTreeMap<String, Flag>,
    pub(crate) bits: BTreeMap<u8, String>,
    pub(crate) actions: BTreeMap<String, Action<E>>,
    pub(crate) clusters: Vec<Cluster>,
    pub(crate) on_action: Option<OnActionCallback<E>>,
    pub(crate) graph: Option<CompiledGraph>,
    /// Set by the first compile attempt, successful or not.
    pub(crate) sealed: bool,
}

impl<E: Entity> Multistate<E> {
    /// Create an empty registry whose no-flags combination is called
    /// `empty_state_name`.
    pub fn new(empty_state_name: impl Into<String>) -> Self {
        Self::with_config(MultistateConfig::default().with_empty_state_name(empty_state_name))
    }

    pub fn with_config(config: MultistateConfig) -> Self {
        Self {
            config,
            flags: BTreeMap::new(),
            bits: BTreeMap::new(),
            actions: BTreeMap::new(),
            clusters: Vec::new(),
            on_action: None,
            graph: None,
            sealed: false,
        }
    }

    pub fn config(&self) -> &MultistateConfig {
        &self.config
    }

    /// Look up a declared flag by id.
    pub fn flag(&self, id: &str) -> Option<&Flag> {
        self.flags.get(id)
    }

    /// Declared flags, ascending by bit.
    pub fn flags(&self) -> impl Iterator<Item = &Flag> + '_ {
        self.bits.values().filter_map(|id| self.flags.get(id))
    }

    /// Look up a declared action by id.
    pub fn action(&self, id: &str) -> Option<&Action<E>> {
        self.actions.get(id)
    }

    /// Declared actions, ascending by id.
    pub fn actions(&self) -> impl Iterator<Item = &Action<E>> + '_ {
        self.actions.values()
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn is_compiled(&self) -> bool {
        self.graph.is_some()
    }

    /// The compiled graph, if `compile` succeeded.
    pub fn graph(&self) -> Option<&CompiledGraph> {
        self.graph.as_ref()
    }
}

impl<E: Entity> fmt::Debug for Multistate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Multistate")
            .field("config", &self.config)
            .field("flags", &self.flags.len())
            .field("actions", &self.actions.len())
            .field("clusters", &self.clusters.len())
            .field("on_action", &self.on_action.is_some())
            .field("graph", &self.graph)
            .finish()
    }
}
