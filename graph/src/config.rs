use regex::Regex;

/// Commit record field usable in node labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Id,
    ShortId,
    Subject,
    AuthorDate,
    CommitDate,
    ChangeId,
}

/// Field slot in a raw log record line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogField {
    Id,
    ShortId,
    Parents,
    AuthorDate,
    CommitDate,
    Refs,
    Subject,
}

/// How raw log lines map onto commit records.
///
/// The default layout matches
/// `git log --format="|Record:|%H|%h|%P|%ai|%ci|%d|%s%n%b"`.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    pub delimiter: char,
    pub record_marker: String,
    pub fields: Vec<LogField>,
    /// Scanned against message body lines; the first capture group becomes
    /// the record's change-id.
    pub change_id_pattern: Regex,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: '|',
            record_marker: "Record:".to_string(),
            fields: vec![
                LogField::Id,
                LogField::ShortId,
                LogField::Parents,
                LogField::AuthorDate,
                LogField::CommitDate,
                LogField::Refs,
                LogField::Subject,
            ],
            change_id_pattern: Regex::new(r"^Change-Id:\s*(\S+)").expect("valid pattern"),
        }
    }
}

/// Commit node label layout: one line per field, truncated to `max_width`
/// display columns when non-zero.
#[derive(Debug, Clone)]
pub struct LabelFormat {
    pub fields: Vec<RecordField>,
    pub max_width: usize,
}

impl Default for LabelFormat {
    fn default() -> Self {
        Self {
            fields: vec![RecordField::ShortId],
            max_width: 0,
        }
    }
}

/// Immutable configuration passed through the transform pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub label: LabelFormat,
    pub squash: bool,
    pub crunch: bool,
    pub choose_branches: Vec<String>,
    pub choose_tags: Vec<String>,
}

/// Appearance of one node kind in the DOT output.
#[derive(Debug, Clone)]
pub struct NodeStyle {
    pub shape: String,
    pub fillcolor: String,
}

impl NodeStyle {
    fn new(shape: &str, fillcolor: &str) -> Self {
        Self {
            shape: shape.to_string(),
            fillcolor: fillcolor.to_string(),
        }
    }
}

/// Per-kind node styles, all overridable.
#[derive(Debug, Clone)]
pub struct NodeStyles {
    pub commit: NodeStyle,
    pub merge: NodeStyle,
    pub squash: NodeStyle,
    pub branch: NodeStyle,
    pub tag: NodeStyle,
}

impl Default for NodeStyles {
    fn default() -> Self {
        Self {
            commit: NodeStyle::new("ellipse", "tan"),
            merge: NodeStyle::new("ellipse", "lightcoral"),
            squash: NodeStyle::new("ellipse", "darkred"),
            branch: NodeStyle::new("box", "lightblue"),
            tag: NodeStyle::new("box", "plum"),
        }
    }
}

/// Per-kind edge line styles.
#[derive(Debug, Clone)]
pub struct EdgeStyles {
    pub parent: String,
    pub squash: String,
    pub branch: String,
    pub tag: String,
}

impl Default for EdgeStyles {
    fn default() -> Self {
        Self {
            parent: "solid".to_string(),
            squash: "dashed".to_string(),
            branch: "dotted".to_string(),
            tag: "dotted".to_string(),
        }
    }
}

/// Granularity for date-alignment constraints in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DateGranularity {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl std::str::FromStr for DateGranularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year" => Ok(Self::Year),
            "month" => Ok(Self::Month),
            "day" => Ok(Self::Day),
            "hour" => Ok(Self::Hour),
            "minute" => Ok(Self::Minute),
            "second" => Ok(Self::Second),
            other => Err(format!("unknown date granularity: {other}")),
        }
    }
}

/// Configuration for the DOT serializer.
#[derive(Debug, Clone, Default)]
pub struct DotConfig {
    /// Graph-level option lines, e.g. `rankdir=LR`.
    pub graph_options: Vec<String>,
    pub graph_label: Option<String>,
    /// When set, emit invisible constraints keeping later commits to the
    /// right at this granularity.
    pub align_by_date: Option<DateGranularity>,
    pub node_styles: NodeStyles,
    pub edge_styles: EdgeStyles,
}
