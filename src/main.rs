//! Command-line front end: reads a JSON roster, prints the assembled roster.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use u_roster::report::RosterSummary;
use u_roster::roster::{MergePolicy, RosterAssembler, RosterConfig, RosterRow, StudentRecord};

/// Assign ranks and exam sequence numbers to a scored student roster
#[derive(Parser, Debug)]
#[command(name = "u-roster")]
#[command(about = "Assigns rank, composite and elective sequence numbers to a student roster")]
struct Args {
    /// JSON file holding an array of student records
    input: PathBuf,

    /// JSON roster configuration (electives, self-study tag, merge policy)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the self-study tag
    #[arg(long)]
    self_study_tag: Option<String>,

    /// Keep prior values for unmergeable records instead of failing
    #[arg(long)]
    lenient: bool,

    /// Print subject, flag and elective counts on stderr
    #[arg(long)]
    summary: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new(format!("u_roster={log_level}"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load_config(args: &Args) -> Result<RosterConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => RosterConfig::default(),
    };

    if let Some(tag) = &args.self_study_tag {
        config = config.with_self_study_tag(tag.clone());
    }
    if args.lenient {
        config = config.with_merge_policy(MergePolicy::Warn);
    }
    Ok(config)
}

fn load_roster(path: &Path, self_study_tag: &str) -> Result<Vec<StudentRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read roster {}", path.display()))?;
    let rows: Vec<RosterRow> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse roster {}", path.display()))?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_record(self_study_tag))
        .collect())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = load_config(&args)?;
    debug!(?config, "loaded configuration");

    let assembler = RosterAssembler::new(config)?;
    let tag = &assembler.config().self_study_tag;

    let roster = load_roster(&args.input, tag)?;
    info!(students = roster.len(), input = %args.input.display(), "loaded roster");

    let assignment = assembler.assemble(&roster)?;

    let rows: Vec<RosterRow> = assignment
        .roster
        .iter()
        .map(|record| RosterRow::from_record(record, tag))
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);

    if args.summary {
        let summary = RosterSummary::from_roster(&assignment.roster, assembler.config());
        eprint!("{summary}");
    }
    Ok(())
}
