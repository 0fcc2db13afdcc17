use std::collections::HashMap;

use tracing::info;

use crate::core::{EdgeKind, Graph};

/// Merge multiple branch nodes decorating the same commit into one shared
/// node, and independently the same for tag nodes.
///
/// The first node of each group in stored edge order survives; its label
/// becomes the order-preserving, de-duplicated union of the group labels,
/// one name per line. Branch and tag groups are never merged with each
/// other. No-op when every commit has at most one ref of each kind.
pub fn crunch(graph: &Graph) -> Graph {
    // Decorated commit id -> ref node ids, in stored edge order.
    let mut branch_groups: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut tag_groups: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &graph.edges {
        match edge.kind {
            EdgeKind::Branch => branch_groups
                .entry(edge.to.as_str())
                .or_default()
                .push(edge.from.as_str()),
            EdgeKind::Tag => tag_groups
                .entry(edge.to.as_str())
                .or_default()
                .push(edge.from.as_str()),
            EdgeKind::Parent | EdgeKind::Squash => {}
        }
    }

    let mut removed: HashMap<&str, &str> = HashMap::new();
    let mut labels: HashMap<&str, String> = HashMap::new();
    let mut merged_groups = 0usize;
    for groups in [&branch_groups, &tag_groups] {
        for members in groups.values() {
            if members.len() < 2 {
                continue;
            }
            merged_groups += 1;
            let survivor = members[0];
            let mut names: Vec<&str> = Vec::new();
            for id in members {
                if let Some(node) = graph.node(id) {
                    for line in node.label.lines() {
                        if !names.contains(&line) {
                            names.push(line);
                        }
                    }
                }
            }
            labels.insert(survivor, names.join("\n"));
            for id in &members[1..] {
                removed.insert(*id, survivor);
            }
        }
    }
    if removed.is_empty() {
        return graph.clone();
    }

    let mut crunched = Graph::new();
    for (id, node) in &graph.nodes {
        if removed.contains_key(id.as_str()) {
            continue;
        }
        let mut node = node.clone();
        if let Some(label) = labels.get(id.as_str()) {
            node.label = label.clone();
        }
        crunched.add_node(node);
    }
    for edge in &graph.edges {
        if removed.contains_key(edge.from.as_str()) {
            continue;
        }
        crunched.add_edge(edge.clone());
    }
    crunched.total_commits = graph.total_commits;
    crunched.dropped_parents = graph.dropped_parents;

    info!("crunched {} ref groups", merged_groups);
    crunched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_graph;
    use crate::config::LabelFormat;
    use crate::core::NodeKind;
    use crate::testutil::{record, with_branch, with_tag};

    #[test]
    fn test_branches_on_one_commit_merge_into_one_node() {
        let records = vec![with_tag(
            with_branch(with_branch(record("x", &[]), "dev"), "feature"),
            "v1.0",
        )];
        let graph = build_graph(&records, &LabelFormat::default());
        let crunched = crunch(&graph);

        let survivor = crunched.node("x+dev").unwrap();
        assert_eq!(survivor.kind, NodeKind::Branch);
        assert_eq!(survivor.label, "dev\nfeature");
        assert!(crunched.node("x+feature").is_none());

        // The single tag is untouched.
        assert_eq!(crunched.node("x+tag:v1.0").unwrap().label, "v1.0");

        // Exactly one branch edge and one tag edge remain, both into x.
        let branch_edges: Vec<_> = crunched
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Branch)
            .collect();
        assert_eq!(branch_edges.len(), 1);
        assert_eq!(branch_edges[0].from, "x+dev");
        assert_eq!(branch_edges[0].to, "x");
        assert_eq!(
            crunched
                .edges
                .iter()
                .filter(|e| e.kind == EdgeKind::Tag)
                .count(),
            1
        );
    }

    #[test]
    fn test_branch_and_tag_groups_stay_separate() {
        let records = vec![with_tag(
            with_tag(with_branch(with_branch(record("x", &[]), "a"), "b"), "t1"),
            "t2",
        )];
        let graph = build_graph(&records, &LabelFormat::default());
        let crunched = crunch(&graph);

        assert_eq!(crunched.node("x+a").unwrap().label, "a\nb");
        assert_eq!(crunched.node("x+tag:t1").unwrap().label, "t1\nt2");
        assert_eq!(crunched.node("x+a").unwrap().kind, NodeKind::Branch);
        assert_eq!(crunched.node("x+tag:t1").unwrap().kind, NodeKind::Tag);
    }

    #[test]
    fn test_at_most_one_ref_of_each_kind_per_commit() {
        let records = vec![
            with_tag(
                with_branch(with_branch(record("x", &["y"]), "a"), "b"),
                "t1",
            ),
            with_branch(record("y", &[]), "c"),
        ];
        let graph = build_graph(&records, &LabelFormat::default());
        let crunched = crunch(&graph);

        for commit in ["x", "y"] {
            let branches = crunched
                .edges
                .iter()
                .filter(|e| e.kind == EdgeKind::Branch && e.to == commit)
                .count();
            let tags = crunched
                .edges
                .iter()
                .filter(|e| e.kind == EdgeKind::Tag && e.to == commit)
                .count();
            assert!(branches <= 1);
            assert!(tags <= 1);
        }
    }

    #[test]
    fn test_single_refs_are_a_noop() {
        let records = vec![
            with_branch(record("x", &["y"]), "main"),
            with_tag(record("y", &[]), "v1.0"),
        ];
        let graph = build_graph(&records, &LabelFormat::default());
        let crunched = crunch(&graph);

        assert_eq!(crunched.node_count(), graph.node_count());
        assert_eq!(crunched.edge_count(), graph.edge_count());
    }
}
