//! Scene reference graph recorded during traversal

use super::analysis::ReferenceKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Documents visited from one root and the arcs between them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// Every document seen, keyed by its resolved path
    pub nodes: BTreeMap<PathBuf, DocumentNode>,

    /// Composition arcs, in discovery order
    pub edges: Vec<ReferenceEdge>,

    /// The analyzed root document
    pub root: Option<PathBuf>,

    /// Arcs that point back at a document still being visited
    pub cycles: BTreeSet<(PathBuf, PathBuf)>,
}

/// A document in the reference graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentNode {
    /// False when the document was referenced but missing on disk
    pub exists: bool,
    /// Documents this one references
    pub dependencies: Vec<PathBuf>,
    /// Documents referencing this one
    pub dependents: Vec<PathBuf>,
}

/// A composition arc between two documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEdge {
    pub from: PathBuf,
    pub to: PathBuf,
    pub kind: ReferenceKind,
}

impl DependencyGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: Vec::new(),
            root: None,
            cycles: BTreeSet::new(),
        }
    }

    pub fn set_root(&mut self, root: PathBuf) {
        self.add_node(root.clone(), true);
        self.root = Some(root);
    }

    /// Add a document, upgrading `exists` if it was already known
    pub fn add_node(&mut self, path: PathBuf, exists: bool) {
        let node = self.nodes.entry(path).or_default();
        node.exists |= exists;
    }

    /// Add an arc; repeated arcs between the same pair are kept once
    pub fn add_edge(&mut self, from: PathBuf, to: PathBuf, kind: ReferenceKind) {
        if self.edges.iter().any(|e| e.from == from && e.to == to) {
            return;
        }

        self.nodes.entry(from.clone()).or_default();
        self.nodes.entry(to.clone()).or_default();

        if let Some(from_node) = self.nodes.get_mut(&from) {
            from_node.dependencies.push(to.clone());
        }
        if let Some(to_node) = self.nodes.get_mut(&to) {
            to_node.dependents.push(from.clone());
        }

        self.edges.push(ReferenceEdge { from, to, kind });
    }

    pub fn add_cycle(&mut self, from: PathBuf, to: PathBuf) {
        self.cycles.insert((from, to));
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Documents referenced but absent on disk
    pub fn missing(&self) -> Vec<&Path> {
        self.nodes
            .iter()
            .filter(|(_, node)| !node.exists)
            .map(|(path, _)| path.as_path())
            .collect()
    }

    /// Get statistics about the graph
    pub fn statistics(&self) -> GraphStatistics {
        let mut max_fan_in = 0;
        let mut max_fan_out = 0;
        let mut max_fan_in_file = None;
        let mut max_fan_out_file = None;

        for (path, node) in &self.nodes {
            if node.dependents.len() > max_fan_in {
                max_fan_in = node.dependents.len();
                max_fan_in_file = Some(path.clone());
            }
            if node.dependencies.len() > max_fan_out {
                max_fan_out = node.dependencies.len();
                max_fan_out_file = Some(path.clone());
            }
        }

        GraphStatistics {
            total_nodes: self.nodes.len(),
            total_edges: self.edges.len(),
            missing_count: self.missing().len(),
            cycle_count: self.cycles.len(),
            max_fan_in,
            max_fan_in_file,
            max_fan_out,
            max_fan_out_file,
        }
    }

    /// Export to DOT format for visualization
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph references {\n");
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=box];\n\n");

        for (path, node) in &self.nodes {
            let label = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown");

            let color = if self.root.as_deref() == Some(path.as_path()) {
                "green"
            } else if !node.exists {
                "red"
            } else {
                "black"
            };

            let style = if node.exists { "solid" } else { "dashed" };

            dot.push_str(&format!(
                "  \"{}\" [label=\"{}\", color={}, style={}];\n",
                path.display(),
                label,
                color,
                style
            ));
        }

        dot.push('\n');

        for edge in &self.edges {
            let style = match edge.kind {
                ReferenceKind::SubLayer => "dashed",
                ReferenceKind::Payload => "dotted",
                ReferenceKind::ShaderTexture => "bold",
                ReferenceKind::Reference => "solid",
            };

            dot.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\", style={}];\n",
                edge.from.display(),
                edge.to.display(),
                edge.kind,
                style
            ));
        }

        for (from, to) in &self.cycles {
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\" [color=red, style=bold];\n",
                from.display(),
                to.display()
            ));
        }

        dot.push_str("}\n");
        dot
    }
}

/// Statistics about the reference graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub missing_count: usize,
    pub cycle_count: usize,
    pub max_fan_in: usize,
    pub max_fan_in_file: Option<PathBuf>,
    pub max_fan_out: usize,
    pub max_fan_out_file: Option<PathBuf>,
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
