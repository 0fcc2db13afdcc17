use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::core::{EdgeKind, Graph};
use crate::error::{Error, Result};

/// Restrict the graph to the ancestry closure of the chosen branch and tag
/// names, plus the chosen ref nodes themselves.
///
/// A name matching no ref node of the requested kind is a hard error: a
/// typo would otherwise silently produce a full or empty graph. With both
/// choose sets empty this is the identity transform.
pub fn prune(graph: &Graph, choose_branches: &[String], choose_tags: &[String]) -> Result<Graph> {
    if choose_branches.is_empty() && choose_tags.is_empty() {
        return Ok(graph.clone());
    }

    // Resolve each chosen name to its ref node and decorated commit. This
    // runs before crunch, so a ref node label is exactly the ref name.
    let mut chosen_refs: HashSet<&str> = HashSet::new();
    let mut seeds: Vec<&str> = Vec::new();
    let chosen = choose_branches
        .iter()
        .map(|name| (name, EdgeKind::Branch))
        .chain(choose_tags.iter().map(|name| (name, EdgeKind::Tag)));
    for (name, kind) in chosen {
        let mut found = false;
        for edge in &graph.edges {
            if edge.kind != kind {
                continue;
            }
            let Some(node) = graph.node(&edge.from) else {
                continue;
            };
            if node.label == *name {
                chosen_refs.insert(edge.from.as_str());
                seeds.push(edge.to.as_str());
                found = true;
            }
        }
        if !found {
            return Err(Error::RefNotFound(name.clone()));
        }
    }

    // Ancestry closure over parent edges. Iterative walk: long linear
    // histories would blow the stack under recursion.
    let mut parents: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &graph.edges {
        if edge.kind == EdgeKind::Parent {
            parents
                .entry(edge.from.as_str())
                .or_default()
                .push(edge.to.as_str());
        }
    }
    let mut keep: HashSet<&str> = HashSet::new();
    let mut stack = seeds;
    while let Some(id) = stack.pop() {
        if !keep.insert(id) {
            continue;
        }
        if let Some(ps) = parents.get(id) {
            stack.extend(ps.iter().copied());
        }
    }

    // Rebuild in insertion order, keeping only surviving endpoints.
    let mut pruned = Graph::new();
    for (id, node) in &graph.nodes {
        if keep.contains(id.as_str()) || chosen_refs.contains(id.as_str()) {
            pruned.add_node(node.clone());
        }
    }
    for edge in &graph.edges {
        if pruned.nodes.contains_key(&edge.from) && pruned.nodes.contains_key(&edge.to) {
            pruned.add_edge(edge.clone());
        }
    }
    pruned.total_commits = pruned
        .nodes
        .values()
        .filter(|n| n.kind.is_commit_like())
        .count();
    pruned.dropped_parents = graph.dropped_parents;

    info!(
        "pruned graph: keeping {} of {} nodes",
        pruned.node_count(),
        graph.node_count()
    );
    Ok(pruned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_graph;
    use crate::config::LabelFormat;
    use crate::testutil::{record, with_branch, with_tag};

    /// main -> shared <- release, with one commit only on main's side.
    fn two_branch_graph() -> Graph {
        let records = vec![
            with_branch(record("m1", &["shared"]), "main"),
            with_branch(record("r1", &["shared"]), "release"),
            record("shared", &["root"]),
            record("root", &[]),
        ];
        build_graph(&records, &LabelFormat::default())
    }

    #[test]
    fn test_choose_branch_keeps_ancestry_only() -> Result<()> {
        let graph = two_branch_graph();
        let pruned = prune(&graph, &["release".to_string()], &[])?;

        assert!(pruned.node("r1").is_some());
        assert!(pruned.node("shared").is_some());
        assert!(pruned.node("root").is_some());
        assert!(pruned.node("r1+release").is_some());
        // Commits and refs reachable only from main are gone.
        assert!(pruned.node("m1").is_none());
        assert!(pruned.node("m1+main").is_none());
        assert_eq!(pruned.total_commits, 3);
        Ok(())
    }

    #[test]
    fn test_no_edge_escapes_surviving_set() -> Result<()> {
        let graph = two_branch_graph();
        let pruned = prune(&graph, &["release".to_string()], &[])?;

        for edge in &pruned.edges {
            assert!(pruned.node(&edge.from).is_some());
            assert!(pruned.node(&edge.to).is_some());
        }
        Ok(())
    }

    #[test]
    fn test_unknown_ref_is_hard_error() {
        let graph = two_branch_graph();
        let err = prune(&graph, &[], &["nope".to_string()]).unwrap_err();
        assert!(matches!(err, Error::RefNotFound(name) if name == "nope"));
    }

    #[test]
    fn test_branch_name_does_not_match_tag() {
        // A tag named like the requested branch must not satisfy it.
        let records = vec![with_tag(record("a", &[]), "main")];
        let graph = build_graph(&records, &LabelFormat::default());
        let err = prune(&graph, &["main".to_string()], &[]).unwrap_err();
        assert!(matches!(err, Error::RefNotFound(_)));
    }

    #[test]
    fn test_empty_choice_is_identity() -> Result<()> {
        let graph = two_branch_graph();
        let pruned = prune(&graph, &[], &[])?;
        assert_eq!(pruned.node_count(), graph.node_count());
        assert_eq!(pruned.edge_count(), graph.edge_count());
        assert_eq!(pruned.total_commits, graph.total_commits);
        Ok(())
    }

    #[test]
    fn test_choose_tag() -> Result<()> {
        let records = vec![
            record("tip", &["tagged"]),
            with_tag(record("tagged", &["root"]), "v1.0"),
            record("root", &[]),
        ];
        let graph = build_graph(&records, &LabelFormat::default());
        let pruned = prune(&graph, &[], &["v1.0".to_string()])?;

        assert!(pruned.node("tip").is_none());
        assert!(pruned.node("tagged").is_some());
        assert!(pruned.node("root").is_some());
        assert!(pruned.node("tagged+tag:v1.0").is_some());
        Ok(())
    }
}
