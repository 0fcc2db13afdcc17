pub mod builder;
pub mod config;
pub mod core;
pub mod dot;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod transform;

pub use builder::build_graph;
pub use config::{
    DateGranularity, DotConfig, EdgeStyles, LabelFormat, LogField, NodeStyle, NodeStyles,
    ParserConfig, PipelineConfig, RecordField,
};
pub use core::{Edge, EdgeKind, Graph, Node, NodeKind, Summary};
pub use dot::write_dot;
pub use error::{Error, Result};
pub use pipeline::run;
pub use record::{CommitRecord, RecordParser};
pub use transform::{crunch, prune, squash};

#[cfg(test)]
pub(crate) mod testutil;
