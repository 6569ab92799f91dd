//! Serializable export of a compiled graph, and Graphviz rendering.
//!
//! A snapshot carries everything a renderer needs (flags of every
//! combination, edges, captions, gate presence, clusters) and nothing a
//! renderer could use to influence the engine. Guards and callbacks are not
//! serializable and are left out.

use crate::core::{Combination, Flag};
use crate::effects::Entity;
use crate::graph::error::SnapshotError;
use crate::machine::Multistate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version identifier for the snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Snapshot format version
    pub version: u32,
    /// Unique snapshot identifier
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub empty_state_name: String,
    /// Declared flags, ascending by bit
    pub flags: Vec<Flag>,
    /// Declared actions, ascending by id
    pub actions: Vec<ActionSummary>,
    pub clusters: Vec<ClusterSummary>,
    /// Reachable combinations, ascending
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSummary {
    pub id: String,
    pub caption: String,
    /// Label of the availability gate, if the action has one.
    pub gate: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub id: usize,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub combination: Combination,
    /// Ids of the flags set, ascending by bit.
    pub flags: Vec<String>,
    pub cluster: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub from: Combination,
    pub action: String,
    pub to: Combination,
}

impl<E: Entity> Multistate<E> {
    /// Export the compiled graph.
    pub fn snapshot(&self) -> Result<GraphSnapshot, SnapshotError> {
        let graph = self.graph.as_ref().ok_or(SnapshotError::NotCompiled)?;

        let nodes = graph
            .combinations()
            .map(|combination| NodeSnapshot {
                combination,
                flags: self
                    .state_flags(combination)
                    .into_iter()
                    .map(|f| f.id)
                    .collect(),
                cluster: graph.cluster_of(combination),
            })
            .collect();

        let edges = graph
            .edges()
            .map(|(from, action, to)| EdgeSnapshot {
                from,
                action: action.to_owned(),
                to,
            })
            .collect();

        Ok(GraphSnapshot {
            version: SNAPSHOT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            empty_state_name: self.config.empty_state_name().to_owned(),
            flags: self.flags().cloned().collect(),
            actions: self
                .actions()
                .map(|a| ActionSummary {
                    id: a.id().to_owned(),
                    caption: a.caption().to_owned(),
                    gate: a.gate().map(|g| g.label().to_owned()),
                })
                .collect(),
            clusters: self
                .clusters
                .iter()
                .map(|c| ClusterSummary {
                    id: c.id(),
                    name: c.name().to_owned(),
                })
                .collect(),
            nodes,
            edges,
        })
    }
}

impl GraphSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()
    }

    fn check_version(self) -> Result<Self, SnapshotError> {
        if self.version == SNAPSHOT_VERSION {
            Ok(self)
        } else {
            Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            })
        }
    }

    /// Render as Graphviz DOT source.
    pub fn to_dot(&self) -> String {
        Dot(self).to_string()
    }
}

struct Dot<'a>(&'a GraphSnapshot);

impl Dot<'_> {
    fn node_label(&self, node: &NodeSnapshot) -> String {
        let flags: Vec<String> = self
            .0
            .flags
            .iter()
            .filter(|f| node.flags.contains(&f.id))
            .map(|f| format!("<I>[{:2}]</I> {}", f.bit(), escape_html(f.caption())))
            .collect();

        let body = if flags.is_empty() {
            escape_html(&self.0.empty_state_name)
        } else {
            flags.join("<BR/>")
        };

        format!(
            r#"<<TABLE BORDER="0" CELLBORDER="1" CELLSPACING="0"><TR><TD><B>{}</B></TD><TD>{body}</TD></TR></TABLE>>"#,
            node.combination
        )
    }

    fn edge_label(&self, action: &str) -> String {
        match self.0.actions.iter().find(|a| a.id == action) {
            Some(summary) if summary.gate.is_some() => {
                format!("{}\n({}[?])", summary.caption, summary.id)
            }
            Some(summary) => format!("{}\n({})", summary.caption, summary.id),
            None => action.to_owned(),
        }
    }
}

impl fmt::Display for Dot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph Multistate {{")?;

        for cluster in &self.0.clusters {
            writeln!(f, "  subgraph cluster_{} {{", cluster.id)?;
            writeln!(f, "    label={};", quote(&cluster.name))?;
            for node in self.0.nodes.iter().filter(|n| n.cluster == Some(cluster.id)) {
                writeln!(f, "    {};", node_name(node.combination))?;
            }
            writeln!(f, "  }}")?;
        }

        for node in &self.0.nodes {
            let color = color(node.combination);
            writeln!(
                f,
                "  {} [shape=plaintext, label={}, color=\"{color}\", fontcolor=\"{color}\"];",
                node_name(node.combination),
                self.node_label(node),
            )?;
        }

        for edge in &self.0.edges {
            let color = color(edge.from);
            writeln!(
                f,
                "  {} -> {} [label={}, color=\"{color}\", fontcolor=\"{color}\"];",
                node_name(edge.from),
                node_name(edge.to),
                quote(&self.edge_label(&edge.action)),
            )?;
        }

        writeln!(f, "}}")
    }
}

fn node_name(combination: Combination) -> String {
    format!("\"{combination:x}\"")
}

/// Stable HSV color per combination.
fn color(combination: Combination) -> String {
    // Fibonacci hashing spreads neighbouring combinations around the wheel.
    let spread = combination.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let hue = (spread >> 40) as f64 / f64::from(1u32 << 24);
    let saturation = 0.5 + ((spread >> 16) & 0xFF) as f64 / 510.0;
    format!("{hue:.3} {saturation:.3} 0.700")
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
