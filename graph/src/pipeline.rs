use crate::builder::build_graph;
use crate::config::PipelineConfig;
use crate::core::Graph;
use crate::error::Result;
use crate::record::CommitRecord;
use crate::transform::{crunch, prune, squash};

/// Run the transform pipeline over a record sequence.
///
/// Stage order is fixed: build, prune, squash, crunch. Optional stages are
/// skipped per configuration, never reordered; each stage consumes the
/// previous graph and produces a fresh one.
pub fn run(records: &[CommitRecord], config: &PipelineConfig) -> Result<Graph> {
    let mut graph = build_graph(records, &config.label);
    if !config.choose_branches.is_empty() || !config.choose_tags.is_empty() {
        graph = prune(&graph, &config.choose_branches, &config.choose_tags)?;
    }
    if config.squash {
        graph = squash(&graph);
    }
    if config.crunch {
        graph = crunch(&graph);
    }
    Ok(graph)
}
