use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::core::{Edge, EdgeKind, Graph, NodeKind};

/// Collapse every maximal chain of plain, undecorated, change-id-free
/// commits into its two boundary nodes joined by a single squash edge.
///
/// A node is chain-eligible when its kind is Commit (merges never qualify),
/// it has at most one parent edge in each direction, no branch or tag edge
/// targets it, and it carries no change-id. A change-id anywhere on an
/// otherwise eligible chain disqualifies the whole chain; chains are never
/// split around it. Chains shorter than three nodes stay untouched.
///
/// `total_commits` is deliberately left alone: it keeps reflecting the
/// pre-squash commit count so the summary can report how many commits the
/// surviving nodes stand for.
pub fn squash(graph: &Graph) -> Graph {
    // Adjacency over parent edges only, in stored edge order.
    let mut parents: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut decorated: HashSet<&str> = HashSet::new();
    for edge in &graph.edges {
        match edge.kind {
            EdgeKind::Parent => {
                parents
                    .entry(edge.from.as_str())
                    .or_default()
                    .push(edge.to.as_str());
                children
                    .entry(edge.to.as_str())
                    .or_default()
                    .push(edge.from.as_str());
            }
            EdgeKind::Branch | EdgeKind::Tag => {
                decorated.insert(edge.to.as_str());
            }
            EdgeKind::Squash => {}
        }
    }

    let eligible = |id: &str| -> bool {
        let Some(node) = graph.node(id) else {
            return false;
        };
        node.kind == NodeKind::Commit
            && node.change_id.is_none()
            && !decorated.contains(id)
            && parents.get(id).map_or(0, |v| v.len()) <= 1
            && children.get(id).map_or(0, |v| v.len()) <= 1
    };

    // Discover maximal chains, walking nodes in insertion order so the
    // result does not depend on a traversal starting point.
    struct Chain<'a> {
        head: &'a str,
        tail: &'a str,
        interior: Vec<&'a str>,
    }
    let mut visited: HashSet<&str> = HashSet::new();
    let mut chains: Vec<Chain> = Vec::new();
    for id in graph.nodes.keys() {
        let id = id.as_str();
        if visited.contains(id) || !eligible(id) {
            continue;
        }

        // Walk child-ward to the newest eligible commit: the chain head.
        let mut head = id;
        while let Some(child) = children.get(head).and_then(|v| v.first()).copied() {
            if !eligible(child) {
                break;
            }
            head = child;
        }
        // Then parent-ward from the head, collecting the whole chain.
        let mut chain = vec![head];
        let mut cursor = head;
        while let Some(parent) = parents.get(cursor).and_then(|v| v.first()).copied() {
            if !eligible(parent) {
                break;
            }
            chain.push(parent);
            cursor = parent;
        }
        for member in &chain {
            visited.insert(*member);
        }
        if chain.len() >= 3 {
            chains.push(Chain {
                head: chain[0],
                tail: chain[chain.len() - 1],
                interior: chain[1..chain.len() - 1].to_vec(),
            });
        }
    }

    if chains.is_empty() {
        return graph.clone();
    }

    let mut remove: HashSet<&str> = HashSet::new();
    let mut rekind: HashSet<&str> = HashSet::new();
    let mut squash_target: HashMap<&str, &str> = HashMap::new();
    for chain in &chains {
        rekind.insert(chain.head);
        rekind.insert(chain.tail);
        for id in &chain.interior {
            remove.insert(*id);
        }
        squash_target.insert(chain.head, chain.tail);
    }

    let mut squashed = Graph::new();
    for (id, node) in &graph.nodes {
        if remove.contains(id.as_str()) {
            continue;
        }
        let mut node = node.clone();
        if rekind.contains(id.as_str()) {
            node.kind = NodeKind::Squash;
        }
        squashed.add_node(node);
    }
    for edge in &graph.edges {
        // The head's outgoing parent edge becomes the squash edge, keeping
        // its slot in the stored order; everything else touching an
        // interior node is dropped.
        if edge.kind == EdgeKind::Parent {
            if let Some(tail) = squash_target.get(edge.from.as_str()) {
                squashed.add_edge(Edge::squash(edge.from.clone(), (*tail).to_string()));
                continue;
            }
        }
        if remove.contains(edge.from.as_str()) || remove.contains(edge.to.as_str()) {
            continue;
        }
        squashed.add_edge(edge.clone());
    }
    squashed.total_commits = graph.total_commits;
    squashed.dropped_parents = graph.dropped_parents;

    info!(
        "squashed {} chains, removed {} interior commits",
        chains.len(),
        remove.len()
    );
    squashed
}
