use thiserror::Error;

/// Errors produced by the graph engine.
///
/// Everything else in the pipeline is a total function over a well-formed
/// graph; internal inconsistencies are treated as defects and asserted.
#[derive(Debug, Error)]
pub enum Error {
    /// A log line could not be mapped onto the configured record layout.
    #[error("parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// A chosen branch or tag name matched no ref node.
    #[error("ref not found: \"{0}\"")]
    RefNotFound(String),

    /// The output sink rejected emitted bytes.
    #[error("write failed: {0}")]
    Write(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
