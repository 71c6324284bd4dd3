use anyhow::{Context, Result};
use clap::{ArgAction, ArgGroup, Parser};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, info};

use linesplice::{
    config::{ConfigLoader, SpliceConfig},
    rewrite_file, LineEnding, Marker, PlanSource, RetainPlan, RewriteOptions,
};

/// Remove a duplicated block of lines from a file and rewrite it in place
#[derive(Parser, Debug)]
#[command(name = "linesplice", version, about)]
#[command(group(
    ArgGroup::new("plan")
        .required(true)
        .args(["cutoff", "marker", "marker_regex"])
))]
struct Cli {
    /// File to rewrite in place
    file: PathBuf,

    /// Keep lines before this index (0-based)
    #[arg(long, requires = "resume")]
    cutoff: Option<usize>,

    /// Resume keeping lines from this index (0-based)
    #[arg(long, requires = "cutoff")]
    resume: Option<usize>,

    /// Drop from the first line containing TEXT up to its second occurrence
    #[arg(long, value_name = "TEXT")]
    marker: Option<String>,

    /// Like --marker, but lines are matched against a regex
    #[arg(long, value_name = "REGEX")]
    marker_regex: Option<String>,

    /// Refuse to write unless the dropped lines repeat right after the cut
    #[arg(long)]
    verify: bool,

    /// Newline written after every line: crlf, lf or preserve
    #[arg(long)]
    line_ending: Option<LineEnding>,

    /// Print a unified diff instead of writing
    #[arg(long)]
    dry_run: bool,

    /// Keep a timestamped copy of the original
    #[arg(long)]
    backup: bool,

    /// TOML config file (defaults to ./linesplice.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// More log output (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "info",
            _ => "debug",
        }
    }

    fn plan_source(&self) -> Result<PlanSource> {
        if let (Some(cutoff), Some(resume)) = (self.cutoff, self.resume) {
            return Ok(PlanSource::Fixed(RetainPlan::new(cutoff, resume)?));
        }
        if let Some(text) = &self.marker {
            return Ok(PlanSource::Detect(Marker::literal(text.as_str())));
        }
        if let Some(pattern) = &self.marker_regex {
            return Ok(PlanSource::Detect(Marker::pattern(pattern)?));
        }
        Err(anyhow::anyhow!(
            "one of --cutoff/--resume, --marker or --marker-regex is required"
        ))
    }

    fn options(&self, config: &SpliceConfig) -> RewriteOptions {
        RewriteOptions {
            line_ending: self.line_ending.unwrap_or(config.line_ending),
            verify: self.verify || config.verify,
            backup: self.backup || config.backup,
            dry_run: self.dry_run,
            diff_context: config.diff_context,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    linesplice::init_with_logger(cli.log_level(), std::io::stderr().is_terminal());

    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    let config = loader
        .load()
        .with_context(|| format!("Failed to load config {}", loader.path().display()))?;
    debug!("Effective config: {:?}", config);

    let source = cli.plan_source()?;
    let options = cli.options(&config);
    info!(
        "Rewriting {} with {} line endings",
        cli.file.display(),
        options.line_ending
    );

    let report = rewrite_file(&cli.file, &source, &options)
        .with_context(|| format!("Failed to fix {}", cli.file.display()))?;

    if let Some(diff) = &report.diff {
        print!("{}", diff);
    }
    println!("{}", report);

    Ok(())
}
