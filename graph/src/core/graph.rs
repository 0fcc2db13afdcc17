use super::{edge::Edge, node::Node, node::NodeKind};
use indexmap::IndexMap;

/// The annotated commit graph.
///
/// Node insertion order is preserved and determines the emission order of
/// the serialized output. Each pipeline stage consumes a graph and produces
/// a fresh one; nothing mutates a graph across stage boundaries.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// All nodes indexed by id, in insertion order.
    pub nodes: IndexMap<String, Node>,
    /// All edges, in insertion order.
    pub edges: Vec<Edge>,
    /// Commit count before any squashing. The builder initializes it and
    /// the pruner resets it; the squasher leaves it alone.
    pub total_commits: usize,
    /// Parent references dropped because the target fell outside the
    /// history window.
    pub dropped_parents: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Ids are unique within a graph.
    pub fn add_node(&mut self, node: Node) {
        debug_assert!(
            !self.nodes.contains_key(&node.id),
            "duplicate node id {}",
            node.id
        );
        self.nodes.insert(node.id.clone(), node);
    }

    /// Insert an edge. Both endpoints must already exist.
    pub fn add_edge(&mut self, edge: Edge) {
        debug_assert!(
            self.nodes.contains_key(&edge.from) && self.nodes.contains_key(&edge.to),
            "edge {} -> {} references an unknown node",
            edge.from,
            edge.to
        );
        self.edges.push(edge);
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Summary statistics reported in the serialized trailer.
    ///
    /// The per-kind counts are derived from the node arena so they can
    /// never drift from the graph itself; only `total_commits` is carried
    /// as state because squashed interior commits are no longer present to
    /// be counted.
    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            total_commits: self.total_commits,
            ..Summary::default()
        };
        for node in self.nodes.values() {
            match node.kind {
                NodeKind::Commit => summary.num_graph_commit_nodes += 1,
                NodeKind::Merge => summary.num_graph_merge_nodes += 1,
                NodeKind::Squash => summary.num_graph_squash_nodes += 1,
                NodeKind::Branch | NodeKind::Tag => {}
            }
        }
        summary.total_graph_commit_nodes = summary.num_graph_commit_nodes
            + summary.num_graph_merge_nodes
            + summary.num_graph_squash_nodes;
        summary
    }
}

/// Node statistics for the summary trailer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub num_graph_commit_nodes: usize,
    pub num_graph_merge_nodes: usize,
    pub num_graph_squash_nodes: usize,
    pub total_commits: usize,
    pub total_graph_commit_nodes: usize,
}
