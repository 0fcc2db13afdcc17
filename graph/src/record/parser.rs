use chrono::{DateTime, FixedOffset};
use tracing::info;

use super::CommitRecord;
use crate::config::{LogField, ParserConfig};
use crate::error::{Error, Result};

/// Parses raw `git log` text into an ordered sequence of commit records.
///
/// A record line carries the configured delimiter-separated fields behind a
/// marker field; every other line belongs to the message body of the record
/// that precedes it and is scanned for a change-id.
pub struct RecordParser {
    config: ParserConfig,
}

impl RecordParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a complete log dump into records, in input order.
    pub fn parse(&self, input: &str) -> Result<Vec<CommitRecord>> {
        let marker = format!(
            "{}{}{}",
            self.config.delimiter, self.config.record_marker, self.config.delimiter
        );
        let mut records: Vec<CommitRecord> = Vec::new();

        for (idx, raw) in input.lines().enumerate() {
            let line = raw.trim();
            let lineno = idx + 1;
            if let Some(pos) = line.find(&marker) {
                records.push(self.parse_record(&line[pos..], lineno)?);
            } else if let Some(record) = records.last_mut() {
                if record.change_id.is_none() {
                    if let Some(caps) = self.config.change_id_pattern.captures(line) {
                        if let Some(m) = caps.get(1) {
                            record.change_id = Some(m.as_str().to_string());
                        }
                    }
                }
            }
        }

        info!("parsed {} commit records", records.len());
        Ok(records)
    }

    fn parse_record(&self, line: &str, lineno: usize) -> Result<CommitRecord> {
        let fields = &self.config.fields;
        // A record line splits into a leading empty piece, the marker, and
        // one piece per configured field. When the last field is the free
        // text subject, embedded delimiters are kept rather than rejected.
        let expected = fields.len() + 2;
        let parts: Vec<&str> = if matches!(fields.last(), Some(LogField::Subject)) {
            line.splitn(expected, self.config.delimiter).collect()
        } else {
            line.split(self.config.delimiter).collect()
        };
        if parts.len() != expected {
            return Err(Error::Parse {
                line: lineno,
                reason: format!(
                    "expected {} fields, found {}",
                    fields.len(),
                    parts.len().saturating_sub(2)
                ),
            });
        }

        let mut id = "";
        let mut short_id = "";
        let mut parent_ids: Vec<String> = Vec::new();
        let mut author_date = None;
        let mut commit_date = None;
        let mut refs_raw = "";
        let mut subject = "";
        for (field, value) in fields.iter().zip(&parts[2..]) {
            match field {
                LogField::Id => id = value.trim(),
                LogField::ShortId => short_id = value.trim(),
                LogField::Parents => {
                    parent_ids = value.split_whitespace().map(String::from).collect();
                }
                LogField::AuthorDate => author_date = Some(parse_date(value.trim(), lineno)?),
                LogField::CommitDate => commit_date = Some(parse_date(value.trim(), lineno)?),
                LogField::Refs => refs_raw = value.trim(),
                LogField::Subject => subject = value.trim(),
            }
        }

        if id.is_empty() {
            return Err(Error::Parse {
                line: lineno,
                reason: "record has no commit id".to_string(),
            });
        }
        let short_id = if short_id.is_empty() {
            id.chars().take(7).collect()
        } else {
            short_id.to_string()
        };
        let (branch_refs, tag_refs) = parse_refs(refs_raw);

        Ok(CommitRecord {
            id: id.to_string(),
            short_id,
            parent_ids,
            author_date,
            commit_date,
            subject: subject.to_string(),
            change_id: None,
            branch_refs,
            tag_refs,
        })
    }
}

fn parse_date(value: &str, lineno: usize) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S %z")
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map_err(|_| Error::Parse {
            line: lineno,
            reason: format!("unrecognized date format: {value}"),
        })
}

/// Split a `%d` decoration string into branch and tag name sets.
///
/// The surrounding parentheses and the `tag: ` prefix are stripped, and
/// `HEAD -> branch` resolves to the branch name.
fn parse_refs(raw: &str) -> (Vec<String>, Vec<String>) {
    let mut branches: Vec<String> = Vec::new();
    let mut tags: Vec<String> = Vec::new();
    let raw = raw.trim();
    if raw.is_empty() {
        return (branches, tags);
    }
    let raw = raw.strip_prefix('(').unwrap_or(raw);
    let raw = raw.strip_suffix(')').unwrap_or(raw);
    for piece in raw.split(',') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        if let Some(tag) = piece.strip_prefix("tag: ") {
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        } else {
            let name = match piece.split_once(" -> ") {
                Some((_, target)) => target,
                None => piece,
            };
            if !branches.iter().any(|b| b == name) {
                branches.push(name.to_string());
            }
        }
    }
    (branches, tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::error::Error;

    fn parse(input: &str) -> Result<Vec<CommitRecord>> {
        RecordParser::new(ParserConfig::default()).parse(input)
    }

    #[test]
    fn test_single_record() -> Result<()> {
        let input = "|Record:|aaaa1111|aaaa111|bbbb2222|2024-03-01 10:00:00 +0000|2024-03-01 10:05:00 +0000||Fix the widget\n";
        let records = parse(input)?;
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.id, "aaaa1111");
        assert_eq!(r.short_id, "aaaa111");
        assert_eq!(r.parent_ids, vec!["bbbb2222"]);
        assert_eq!(r.subject, "Fix the widget");
        assert!(r.branch_refs.is_empty());
        assert!(r.tag_refs.is_empty());
        assert!(r.change_id.is_none());
        Ok(())
    }

    #[test]
    fn test_root_and_merge_parents() -> Result<()> {
        let input = "\
|Record:|merge111|merge11|p1 p2|2024-03-02 10:00:00 +0000|2024-03-02 10:00:00 +0000||Merge branch
|Record:|root2222|root222||2024-03-01 10:00:00 +0000|2024-03-01 10:00:00 +0000||Initial commit
";
        let records = parse(input)?;
        assert_eq!(records[0].parent_ids, vec!["p1", "p2"]);
        assert!(records[0].is_merge());
        assert!(records[1].parent_ids.is_empty());
        assert!(records[1].is_root());
        Ok(())
    }

    #[test]
    fn test_ref_decoration() -> Result<()> {
        let input = "|Record:|aaaa1111|aaaa111||2024-03-01 10:00:00 +0000|2024-03-01 10:00:00 +0000| (HEAD -> main, tag: v1.0, origin/main)|Release\n";
        let records = parse(input)?;
        assert_eq!(records[0].branch_refs, vec!["main", "origin/main"]);
        assert_eq!(records[0].tag_refs, vec!["v1.0"]);
        Ok(())
    }

    #[test]
    fn test_change_id_from_body() -> Result<()> {
        let input = "\
|Record:|aaaa1111|aaaa111||2024-03-01 10:00:00 +0000|2024-03-01 10:00:00 +0000||Fix widget
Some body text.

Change-Id: I0123abcd
|Record:|bbbb2222|bbbb222||2024-03-01 09:00:00 +0000|2024-03-01 09:00:00 +0000||No change id here
";
        let records = parse(input)?;
        assert_eq!(records[0].change_id.as_deref(), Some("I0123abcd"));
        assert!(records[1].change_id.is_none());
        Ok(())
    }

    #[test]
    fn test_subject_may_contain_delimiter() -> Result<()> {
        let input = "|Record:|aaaa1111|aaaa111||2024-03-01 10:00:00 +0000|2024-03-01 10:00:00 +0000||left | right\n";
        let records = parse(input)?;
        assert_eq!(records[0].subject, "left | right");
        Ok(())
    }

    #[test]
    fn test_field_count_mismatch_is_error() {
        let err = parse("|Record:|aaaa1111|aaaa111|\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn test_missing_id_is_error() {
        let input = "|Record:||aaaa111||2024-03-01 10:00:00 +0000|2024-03-01 10:00:00 +0000||subject\n";
        let err = parse(input).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
        assert!(err.to_string().contains("no commit id"));
    }

    #[test]
    fn test_bad_date_is_error() {
        let input = "|Record:|aaaa1111|aaaa111||yesterday|2024-03-01 10:00:00 +0000||subject\n";
        let err = parse(input).unwrap_err();
        assert!(err.to_string().contains("unrecognized date format"));
    }

    #[test]
    fn test_short_id_derived_when_layout_omits_it() -> Result<()> {
        let mut config = ParserConfig::default();
        config.fields = vec![LogField::Id, LogField::Parents, LogField::Subject];
        let parser = RecordParser::new(config);
        let records = parser.parse("|Record:|abcdef0123456789||subject\n")?;
        assert_eq!(records[0].short_id, "abcdef0");
        assert!(records[0].author_date.is_none());
        Ok(())
    }
}
