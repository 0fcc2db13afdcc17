use chrono::{DateTime, FixedOffset};

use crate::record::CommitRecord;

pub fn date(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).expect("valid test date")
}

pub fn record(id: &str, parents: &[&str]) -> CommitRecord {
    CommitRecord {
        id: id.to_string(),
        short_id: id.chars().take(7).collect(),
        parent_ids: parents.iter().map(|p| p.to_string()).collect(),
        author_date: Some(date("2024-03-01T10:00:00+00:00")),
        commit_date: Some(date("2024-03-01T10:00:00+00:00")),
        subject: format!("commit {id}"),
        change_id: None,
        branch_refs: Vec::new(),
        tag_refs: Vec::new(),
    }
}

pub fn with_branch(mut record: CommitRecord, name: &str) -> CommitRecord {
    record.branch_refs.push(name.to_string());
    record
}

pub fn with_tag(mut record: CommitRecord, name: &str) -> CommitRecord {
    record.tag_refs.push(name.to_string());
    record
}

pub fn with_change_id(mut record: CommitRecord, change_id: &str) -> CommitRecord {
    record.change_id = Some(change_id.to_string());
    record
}
