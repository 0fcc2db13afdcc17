/// An edge connecting two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Source node id.
    pub from: String,
    /// Target node id.
    pub to: String,
    pub kind: EdgeKind,
}

/// Arc kind.
///
/// Parent edges point from a commit to each of its parents. Branch and Tag
/// edges point from the ref node to the commit it decorates. A Squash edge
/// replaces the parent edges of a collapsed chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Parent,
    Squash,
    Branch,
    Tag,
}

impl Edge {
    pub fn parent(from: String, to: String) -> Self {
        Self {
            from,
            to,
            kind: EdgeKind::Parent,
        }
    }

    pub fn squash(from: String, to: String) -> Self {
        Self {
            from,
            to,
            kind: EdgeKind::Squash,
        }
    }

    pub fn branch(from: String, to: String) -> Self {
        Self {
            from,
            to,
            kind: EdgeKind::Branch,
        }
    }

    pub fn tag(from: String, to: String) -> Self {
        Self {
            from,
            to,
            kind: EdgeKind::Tag,
        }
    }
}
