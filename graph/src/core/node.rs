use chrono::{DateTime, FixedOffset};

/// Vertex kind.
///
/// `Merge` refines `Commit` (the underlying record has two or more parents)
/// and is fixed at construction. `Squash` marks the two boundary commits of
/// a collapsed chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Commit,
    Merge,
    Squash,
    Branch,
    Tag,
}

impl NodeKind {
    /// Commit, Merge and Squash nodes all stand for commits.
    pub fn is_commit_like(self) -> bool {
        matches!(self, NodeKind::Commit | NodeKind::Merge | NodeKind::Squash)
    }

    pub fn is_ref(self) -> bool {
        matches!(self, NodeKind::Branch | NodeKind::Tag)
    }
}

/// A graph vertex.
#[derive(Debug, Clone)]
pub struct Node {
    /// Stable key: the commit id, or a synthetic id for ref nodes.
    pub id: String,
    pub kind: NodeKind,
    /// Pre-formatted display text; may span multiple lines.
    pub label: String,
    /// Change-id carried over from the commit record; blocks squashing.
    pub change_id: Option<String>,
    /// Commit timestamp, used for date alignment in the output.
    pub commit_date: Option<DateTime<FixedOffset>>,
}

impl Node {
    pub fn branch(id: String, name: &str) -> Self {
        Self {
            id,
            kind: NodeKind::Branch,
            label: name.to_string(),
            change_id: None,
            commit_date: None,
        }
    }

    pub fn tag(id: String, name: &str) -> Self {
        Self {
            id,
            kind: NodeKind::Tag,
            label: name.to_string(),
            change_id: None,
            commit_date: None,
        }
    }
}
