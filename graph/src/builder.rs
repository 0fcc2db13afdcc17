use tracing::info;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::config::{LabelFormat, RecordField};
use crate::core::{Edge, Graph, Node, NodeKind};
use crate::record::CommitRecord;

/// Synthetic node id for a branch decorating a commit.
fn branch_node_id(commit_id: &str, name: &str) -> String {
    format!("{commit_id}+{name}")
}

/// Synthetic node id for a tag decorating a commit. The `tag:` infix keeps
/// it distinct from a branch of the same name on the same commit.
fn tag_node_id(commit_id: &str, name: &str) -> String {
    format!("{commit_id}+tag:{name}")
}

/// Build the initial graph from the record sequence: one commit or merge
/// node per record, one parent edge per (child, parent) pair, one branch or
/// tag node and edge per ref.
///
/// Nodes are created in a first pass so that a parent edge can resolve even
/// when the parent appears later in the log than its child. A parent id
/// missing from the record set marks the edge of a bounded history window;
/// the edge is dropped and counted, never an error.
pub fn build_graph(records: &[CommitRecord], label: &LabelFormat) -> Graph {
    let mut graph = Graph::new();

    for record in records {
        let kind = if record.is_merge() {
            NodeKind::Merge
        } else {
            NodeKind::Commit
        };
        graph.add_node(Node {
            id: record.id.clone(),
            kind,
            label: format_label(record, label),
            change_id: record.change_id.clone(),
            commit_date: record.commit_date,
        });
    }
    graph.total_commits = graph.node_count();

    let mut num_refs = 0usize;
    for record in records {
        for parent in &record.parent_ids {
            if graph.nodes.contains_key(parent) {
                graph.add_edge(Edge::parent(record.id.clone(), parent.clone()));
            } else {
                graph.dropped_parents += 1;
            }
        }
        for name in &record.branch_refs {
            let id = branch_node_id(&record.id, name);
            graph.add_node(Node::branch(id.clone(), name));
            graph.add_edge(Edge::branch(id, record.id.clone()));
            num_refs += 1;
        }
        for name in &record.tag_refs {
            let id = tag_node_id(&record.id, name);
            graph.add_node(Node::tag(id.clone(), name));
            graph.add_edge(Edge::tag(id, record.id.clone()));
            num_refs += 1;
        }
    }

    info!(
        "built graph: {} commit nodes, {} refs, {} edges",
        graph.total_commits,
        num_refs,
        graph.edge_count()
    );
    if graph.dropped_parents > 0 {
        info!(
            "dropped {} parent references outside the history window",
            graph.dropped_parents
        );
    }
    graph
}

/// Format a commit node label: one line per configured field.
fn format_label(record: &CommitRecord, format: &LabelFormat) -> String {
    let mut lines = Vec::with_capacity(format.fields.len());
    for field in &format.fields {
        let value = match field {
            RecordField::Id => record.id.clone(),
            RecordField::ShortId => record.short_id.clone(),
            RecordField::Subject => record.subject.clone(),
            RecordField::AuthorDate => record
                .author_date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            RecordField::CommitDate => record
                .commit_date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            RecordField::ChangeId => record.change_id.clone().unwrap_or_default(),
        };
        lines.push(truncate_to_width(&value, format.max_width));
    }
    lines.join("\n")
}

/// Cut a label line to `max_width` display columns on grapheme boundaries.
/// Zero means unlimited.
fn truncate_to_width(text: &str, max_width: usize) -> String {
    if max_width == 0 || UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for grapheme in text.graphemes(true) {
        let w = UnicodeWidthStr::width(grapheme);
        if width + w > max_width {
            break;
        }
        out.push_str(grapheme);
        width += w;
    }
    out
}
