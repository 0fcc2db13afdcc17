pub mod edge;
pub mod graph;
pub mod node;

pub use edge::{Edge, EdgeKind};
pub use graph::{Graph, Summary};
pub use node::{Node, NodeKind};
