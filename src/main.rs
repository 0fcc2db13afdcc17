use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use graph::{
    DateGranularity, DotConfig, LabelFormat, ParserConfig, PipelineConfig, RecordField,
    RecordParser,
};

const DEFAULT_GITCMD: &str = r#"git log --format="|Record:|%H|%h|%P|%ai|%ci|%d|%s%n%b""#;
const DEFAULT_RANGE: &str = "--all --topo-order";

#[derive(Parser)]
#[command(name = "gitdot")]
#[command(about = "Generate a graphviz DOT description of a git commit history", long_about = None)]
struct Cli {
    /// Read a previously captured git log dump instead of running git
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Custom git log command; disables --since/--until/--range splicing
    #[arg(short, long)]
    gitcmd: Option<String>,

    /// Only include commits after this date
    #[arg(long, default_value = "")]
    since: String,

    /// Only include commits before this date
    #[arg(long, default_value = "")]
    until: String,

    /// Extra revision range arguments for git log
    #[arg(long, default_value = DEFAULT_RANGE)]
    range: String,

    /// Keep the raw git log output next to the output file
    #[arg(short, long)]
    keep: bool,

    /// Collapse undecorated linear commit chains
    #[arg(short, long)]
    squash: bool,

    /// Merge same-commit branch (and tag) nodes into one
    #[arg(short, long)]
    crunch: bool,

    /// Restrict the graph to the ancestry of this branch (repeatable)
    #[arg(long = "choose-branch", value_name = "NAME")]
    choose_branch: Vec<String>,

    /// Restrict the graph to the ancestry of this tag (repeatable)
    #[arg(long = "choose-tag", value_name = "NAME")]
    choose_tag: Vec<String>,

    /// Commit label fields: id, short-id, subject, author-date,
    /// commit-date, change-id
    #[arg(short, long, value_delimiter = ',', default_value = "short-id")]
    label: Vec<String>,

    /// Maximum label line width in display columns (0 = unlimited)
    #[arg(short = 'w', long, default_value_t = 0)]
    max_width: usize,

    /// Graph-level option, e.g. "rankdir=LR" (repeatable)
    #[arg(short = 'd', long = "dot-option", value_name = "OPTION")]
    dot_option: Vec<String>,

    /// Graph label
    #[arg(short = 'L', long)]
    graph_label: Option<String>,

    /// Align commits left-to-right by date: year, month, day, hour,
    /// minute or second
    #[arg(long, value_name = "GRANULARITY")]
    align_by_date: Option<String>,

    /// Fill color override, KIND=COLOR with KIND one of commit, merge,
    /// squash, branch, tag (repeatable)
    #[arg(long, value_name = "KIND=COLOR")]
    color: Vec<String>,

    /// Render a PNG next to the output file using the dot binary
    #[arg(long)]
    png: bool,

    /// Render an SVG next to the output file using the dot binary
    #[arg(long)]
    svg: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let raw = read_history(&cli)?;
    if cli.keep {
        match &cli.output {
            Some(path) => {
                let keep_path = append_extension(path, "keep");
                info!("writing raw log to {}", keep_path.display());
                fs::write(&keep_path, &raw)
                    .with_context(|| format!("unable to write {}", keep_path.display()))?;
            }
            None => warn!("--keep ignored without --output"),
        }
    }

    let parser = RecordParser::new(ParserConfig::default());
    let records = parser.parse(&raw)?;
    if records.is_empty() {
        bail!("no records found");
    }

    let config = PipelineConfig {
        label: LabelFormat {
            fields: parse_label_fields(&cli.label)?,
            max_width: cli.max_width,
        },
        squash: cli.squash,
        crunch: cli.crunch,
        choose_branches: cli.choose_branch.clone(),
        choose_tags: cli.choose_tag.clone(),
    };
    let commit_graph = graph::run(&records, &config)?;

    let mut buf = Vec::new();
    graph::write_dot(&commit_graph, &dot_config(&cli)?, &mut buf)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, &buf)
                .with_context(|| format!("unable to write {}", path.display()))?;
            if cli.png {
                render(path, "png")?;
            }
            if cli.svg {
                render(path, "svg")?;
            }
        }
        None => {
            if cli.png || cli.svg {
                bail!("--png/--svg require --output");
            }
            std::io::stdout().write_all(&buf)?;
        }
    }
    info!("done");
    Ok(())
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Read the raw history: from a capture file, or by running git.
fn read_history(cli: &Cli) -> Result<String> {
    if let Some(path) = &cli.input {
        return fs::read_to_string(path)
            .with_context(|| format!("unable to read {}", path.display()));
    }

    let cmd = match &cli.gitcmd {
        Some(custom) => {
            // A custom command is taken verbatim.
            if !cli.since.is_empty() {
                warn!("--since ignored when --gitcmd is specified");
            }
            if !cli.until.is_empty() {
                warn!("--until ignored when --gitcmd is specified");
            }
            if cli.range != DEFAULT_RANGE {
                warn!("--range ignored when --gitcmd is specified");
            }
            custom.clone()
        }
        None => {
            let mut cmd = DEFAULT_GITCMD.to_string();
            if !cli.since.is_empty() {
                cmd.push_str(&format!(" --since=\"{}\"", cli.since));
            }
            if !cli.until.is_empty() {
                cmd.push_str(&format!(" --until=\"{}\"", cli.until));
            }
            if !cli.range.is_empty() {
                cmd.push_str(&format!(" {}", cli.range));
            }
            cmd
        }
    };

    info!("running command: {cmd}");
    let output = Command::new("sh")
        .arg("-c")
        .arg(&cmd)
        .output()
        .with_context(|| format!("failed to run: {cmd}"))?;
    if !output.status.success() {
        bail!(
            "command failed ({}): {}",
            output.status,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    info!("read {} bytes", text.len());
    Ok(text)
}

/// Render the DOT file through the external graphviz binary (`dot -O`).
fn render(path: &Path, format: &str) -> Result<()> {
    info!("generating {format}");
    let status = Command::new("dot")
        .arg(format!("-T{format}"))
        .arg("-O")
        .arg(path)
        .status()
        .context("failed to run dot; is graphviz installed?")?;
    if !status.success() {
        bail!("dot -T{format} failed with {status}");
    }
    Ok(())
}

fn parse_label_fields(names: &[String]) -> Result<Vec<RecordField>> {
    names
        .iter()
        .map(|name| match name.as_str() {
            "id" => Ok(RecordField::Id),
            "short-id" => Ok(RecordField::ShortId),
            "subject" => Ok(RecordField::Subject),
            "author-date" => Ok(RecordField::AuthorDate),
            "commit-date" => Ok(RecordField::CommitDate),
            "change-id" => Ok(RecordField::ChangeId),
            other => bail!("unknown label field: {other}"),
        })
        .collect()
}

fn dot_config(cli: &Cli) -> Result<DotConfig> {
    let mut config = DotConfig {
        graph_options: cli.dot_option.clone(),
        graph_label: cli.graph_label.clone(),
        ..DotConfig::default()
    };
    if let Some(granularity) = &cli.align_by_date {
        config.align_by_date =
            Some(DateGranularity::from_str(granularity).map_err(anyhow::Error::msg)?);
    }
    for entry in &cli.color {
        let Some((kind, color)) = entry.split_once('=') else {
            bail!("invalid --color value (expected KIND=COLOR): {entry}");
        };
        let style = match kind {
            "commit" => &mut config.node_styles.commit,
            "merge" => &mut config.node_styles.merge,
            "squash" => &mut config.node_styles.squash,
            "branch" => &mut config.node_styles.branch,
            "tag" => &mut config.node_styles.tag,
            other => bail!("unknown node kind in --color: {other}"),
        };
        style.fillcolor = color.to_string();
    }
    Ok(config)
}

/// `foo.dot` -> `foo.dot.keep` (unlike `Path::with_extension`, which would
/// replace the existing extension).
fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".");
    os.push(ext);
    PathBuf::from(os)
}
