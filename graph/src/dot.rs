use std::io::Write;

use chrono::{DateTime, Datelike, FixedOffset, Timelike};

use crate::config::{DateGranularity, DotConfig, NodeStyle};
use crate::core::{EdgeKind, Graph, Node, NodeKind};
use crate::error::Result;

/// Serialize the graph as DOT text followed by the summary trailer.
///
/// Nodes are emitted in insertion order and edges in stored order, so equal
/// graphs always produce byte-identical output. Errors from the sink
/// surface as `Error::Write`; partially written output is not rolled back.
pub fn write_dot<W: Write>(graph: &Graph, config: &DotConfig, out: &mut W) -> Result<()> {
    writeln!(out, "digraph G {{")?;
    for option in &config.graph_options {
        let option = option.trim();
        let term = if option.ends_with(';') { "" } else { ";" };
        writeln!(out, "   {option}{term}")?;
    }

    for node in graph.nodes.values() {
        let style = node_style(config, node.kind);
        writeln!(
            out,
            "   \"{}\" [shape={}, style=filled, fillcolor=\"{}\", label=\"{}\"];",
            escape(&node.id),
            style.shape,
            style.fillcolor,
            escape(&node.label)
        )?;
    }

    for edge in &graph.edges {
        writeln!(
            out,
            "   \"{}\" -> \"{}\" [style={}];",
            escape(&edge.from),
            escape(&edge.to),
            edge_style(config, edge.kind)
        )?;
    }

    if let Some(granularity) = config.align_by_date {
        write_date_constraints(graph, granularity, out)?;
    }

    if let Some(label) = &config.graph_label {
        writeln!(out, "   label=\"{}\";", escape(label))?;
    }
    writeln!(out, "}}")?;

    let summary = graph.summary();
    writeln!(
        out,
        "// summary:num_graph_commit_nodes {}",
        summary.num_graph_commit_nodes
    )?;
    writeln!(
        out,
        "// summary:num_graph_merge_nodes {}",
        summary.num_graph_merge_nodes
    )?;
    writeln!(
        out,
        "// summary:num_graph_squash_nodes {}",
        summary.num_graph_squash_nodes
    )?;
    writeln!(out, "// summary:total_commits {}", summary.total_commits)?;
    writeln!(
        out,
        "// summary:total_graph_commit_nodes {}",
        summary.total_graph_commit_nodes
    )?;
    Ok(())
}

fn node_style(config: &DotConfig, kind: NodeKind) -> &NodeStyle {
    match kind {
        NodeKind::Commit => &config.node_styles.commit,
        NodeKind::Merge => &config.node_styles.merge,
        NodeKind::Squash => &config.node_styles.squash,
        NodeKind::Branch => &config.node_styles.branch,
        NodeKind::Tag => &config.node_styles.tag,
    }
}

fn edge_style(config: &DotConfig, kind: EdgeKind) -> &str {
    match kind {
        EdgeKind::Parent => &config.edge_styles.parent,
        EdgeKind::Squash => &config.edge_styles.squash,
        EdgeKind::Branch => &config.edge_styles.branch,
        EdgeKind::Tag => &config.edge_styles.tag,
    }
}

/// Escape a string for use inside a double-quoted DOT attribute.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}

/// Timestamp bucket at the alignment granularity. Finer components are
/// zeroed so comparisons stop at the configured level.
fn date_key(date: &DateTime<FixedOffset>, g: DateGranularity) -> (i32, u32, u32, u32, u32, u32) {
    (
        date.year(),
        if g >= DateGranularity::Month { date.month() } else { 0 },
        if g >= DateGranularity::Day { date.day() } else { 0 },
        if g >= DateGranularity::Hour { date.hour() } else { 0 },
        if g >= DateGranularity::Minute { date.minute() } else { 0 },
        if g >= DateGranularity::Second { date.second() } else { 0 },
    )
}

/// Emit invisible constraints so that a commit dated later at the chosen
/// granularity ranks to the right of an earlier one.
fn write_date_constraints<W: Write>(
    graph: &Graph,
    granularity: DateGranularity,
    out: &mut W,
) -> Result<()> {
    let mut dated: Vec<(&Node, (i32, u32, u32, u32, u32, u32))> = graph
        .nodes
        .values()
        .filter(|n| n.kind.is_commit_like())
        .filter_map(|n| n.commit_date.map(|d| (n, date_key(&d, granularity))))
        .collect();
    // Stable sort: insertion order breaks ties, keeping output deterministic.
    dated.sort_by_key(|(_, key)| *key);

    for pair in dated.windows(2) {
        let (earlier, earlier_key) = &pair[0];
        let (later, later_key) = &pair[1];
        if later_key > earlier_key {
            writeln!(
                out,
                "   \"{}\" -> \"{}\" [style=invis];",
                escape(&earlier.id),
                escape(&later.id)
            )?;
        }
    }
    Ok(())
}
