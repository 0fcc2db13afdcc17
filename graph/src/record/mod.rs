pub mod parser;

pub use parser::RecordParser;

use chrono::{DateTime, FixedOffset};

/// One parsed commit log entry.
///
/// Created once by the parser and read-only afterwards. Dates are absent
/// only when the configured field layout omits them.
#[derive(Debug, Clone)]
pub struct CommitRecord {
    pub id: String,
    pub short_id: String,
    /// Parent commit ids in log order; empty for root commits.
    pub parent_ids: Vec<String>,
    pub author_date: Option<DateTime<FixedOffset>>,
    pub commit_date: Option<DateTime<FixedOffset>>,
    pub subject: String,
    /// Stable identifier extracted from the message body, if any.
    pub change_id: Option<String>,
    /// Branch names decorating this commit, in encounter order.
    pub branch_refs: Vec<String>,
    /// Tag names decorating this commit, in encounter order.
    pub tag_refs: Vec<String>,
}

impl CommitRecord {
    /// A merge commit has at least two parents.
    pub fn is_merge(&self) -> bool {
        self.parent_ids.len() > 1
    }

    pub fn is_root(&self) -> bool {
        self.parent_ids.is_empty()
    }
}
