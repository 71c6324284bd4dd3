// Filter-and-rewrite: read a file, splice out a span of lines and write
// it back in place with a single newline convention.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::diff::preview::{unified_diff, unified_diff_ignoring_endings};
use crate::error::Result;
use crate::lines::{join_lines, split_lines_keep_ends, LineEnding};
use crate::splice::{detect_duplicate, verify_duplicate, Marker, RetainPlan};
use crate::utils::fs::{backup_file, read_file_to_string, write_file_atomic};

/// Where the retained ranges come from
#[derive(Debug, Clone)]
pub enum PlanSource {
    /// Indices decided by hand, trusted as-is
    Fixed(RetainPlan),
    /// Indices found by locating a repeated marker line
    Detect(Marker),
}

impl PlanSource {
    pub fn resolve<S: AsRef<str>>(&self, lines: &[S]) -> Result<RetainPlan> {
        match self {
            PlanSource::Fixed(plan) => Ok(*plan),
            PlanSource::Detect(marker) => detect_duplicate(lines, marker),
        }
    }
}

/// Knobs for a single rewrite
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    pub line_ending: LineEnding,
    pub verify: bool,
    pub backup: bool,
    pub dry_run: bool,
    pub diff_context: usize,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Crlf,
            verify: false,
            backup: false,
            dry_run: false,
            diff_context: 3,
        }
    }
}

/// What a rewrite did (or would do, on a dry run)
#[derive(Debug, Clone)]
pub struct RewriteReport {
    pub path: PathBuf,
    pub plan: RetainPlan,
    pub lines_before: usize,
    pub lines_after: usize,
    pub backup: Option<PathBuf>,
    pub dry_run: bool,
    /// Unified diff, only filled in on dry runs
    pub diff: Option<String>,
}

impl RewriteReport {
    pub fn removed(&self) -> usize {
        self.lines_before - self.lines_after
    }
}

impl fmt::Display for RewriteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string());
        let verb = if self.dry_run { "Would fix" } else { "Fixed" };
        write!(
            f,
            "{} {} - removed {} lines ({} -> {})",
            verb,
            name,
            self.removed(),
            self.lines_before,
            self.lines_after
        )?;
        if let Some(backup) = &self.backup {
            write!(f, ", backup at {}", backup.display())?;
        }
        Ok(())
    }
}

/// Result of splicing content in memory
#[derive(Debug, Clone)]
pub struct Spliced {
    pub content: String,
    pub plan: RetainPlan,
    pub lines_before: usize,
    pub lines_after: usize,
}

/// Splice already-loaded content
pub fn splice_content(
    content: &str,
    source: &PlanSource,
    options: &RewriteOptions,
) -> Result<Spliced> {
    let lines = split_lines_keep_ends(content);
    let plan = source.resolve(&lines)?;
    if options.verify {
        verify_duplicate(&lines, &plan)?;
    }

    let kept = plan.apply(&lines);
    Ok(Spliced {
        content: join_lines(&kept, options.line_ending),
        plan,
        lines_before: lines.len(),
        lines_after: kept.len(),
    })
}

/// Read `path`, keep the retained ranges and overwrite the file.
///
/// Nothing checks that a fixed plan removes the right lines; running the same
/// fixed plan twice keeps cutting.
pub fn rewrite_file(
    path: impl AsRef<Path>,
    source: &PlanSource,
    options: &RewriteOptions,
) -> Result<RewriteReport> {
    let path = path.as_ref();
    let content = read_file_to_string(path)?;
    let spliced = splice_content(&content, source, options)?;
    debug!(
        "{}: {} -> {} lines with {}",
        path.display(),
        spliced.lines_before,
        spliced.lines_after,
        spliced.plan
    );

    let mut report = RewriteReport {
        path: path.to_path_buf(),
        plan: spliced.plan,
        lines_before: spliced.lines_before,
        lines_after: spliced.lines_after,
        backup: None,
        dry_run: options.dry_run,
        diff: None,
    };

    if options.dry_run {
        // A forced newline convention would mark every line as changed
        let render = match options.line_ending {
            LineEnding::Preserve => unified_diff,
            _ => unified_diff_ignoring_endings,
        };
        report.diff = Some(render(
            path,
            &content,
            &spliced.content,
            options.diff_context,
        ));
        return Ok(report);
    }

    if options.backup {
        report.backup = Some(backup_file(path)?);
    }
    write_file_atomic(path, &spliced.content)?;
    info!("Rewrote {} ({} lines removed)", path.display(), report.removed());

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpliceError;
    use std::fs;
    use tempfile::tempdir;

    fn write_numbered(path: &Path, n: usize, ending: &str) -> Vec<String> {
        let lines: Vec<String> = (0..n).map(|i| format!("line {}", i)).collect();
        let content: String = lines.iter().map(|l| format!("{}{}", l, ending)).collect();
        fs::write(path, content).unwrap();
        lines
    }

    #[test]
    fn test_fixed_plan_rewrites_with_crlf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ProposalStage.tsx");
        let input = write_numbered(&path, 600, "\n");

        let source = PlanSource::Fixed(RetainPlan::new(395, 508).unwrap());
        let report = rewrite_file(&path, &source, &RewriteOptions::default()).unwrap();
        assert_eq!(report.lines_before, 600);
        assert_eq!(report.lines_after, 487);
        assert_eq!(
            report.to_string(),
            "Fixed ProposalStage.tsx - removed 113 lines (600 -> 487)"
        );

        let written = fs::read_to_string(&path).unwrap();
        let out: Vec<&str> = written.split_inclusive('\n').collect();
        assert_eq!(out.len(), 487);
        assert!(out.iter().all(|l| l.ends_with("\r\n")));
        assert_eq!(out[394], "line 394\r\n");
        assert_eq!(out[395], "line 508\r\n");
        assert_eq!(out[486], format!("{}\r\n", input[599]));
    }

    #[test]
    fn test_missing_trailing_newline_gets_one() {
        let spliced = splice_content(
            "a\nb\nc",
            &PlanSource::Fixed(RetainPlan::new(1, 2).unwrap()),
            &RewriteOptions::default(),
        )
        .unwrap();
        assert_eq!((spliced.lines_before, spliced.lines_after), (3, 2));
        assert_eq!(spliced.content, "a\r\nc\r\n");
    }

    #[test]
    fn test_classic_mac_endings_split_and_converted() {
        let spliced = splice_content(
            "a\rb\rc\r",
            &PlanSource::Fixed(RetainPlan::new(1, 2).unwrap()),
            &RewriteOptions::default(),
        )
        .unwrap();
        assert_eq!((spliced.lines_before, spliced.lines_after), (3, 2));
        assert_eq!(spliced.content, "a\r\nc\r\n");
    }

    #[test]
    fn test_preserve_keeps_mixed_endings() {
        let options = RewriteOptions {
            line_ending: LineEnding::Preserve,
            ..Default::default()
        };
        let spliced = splice_content(
            "a\r\nb\nc",
            &PlanSource::Fixed(RetainPlan::new(1, 2).unwrap()),
            &options,
        )
        .unwrap();
        assert_eq!(spliced.content, "a\r\nc");
    }

    #[test]
    fn test_detect_then_rerun_refuses() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("App.tsx");
        fs::write(
            &path,
            "top\n<Celebration>\nbody\n</Celebration>\n<Celebration>\nbody\n</Celebration>\nend\n",
        )
        .unwrap();

        let source = PlanSource::Detect(Marker::literal("<Celebration>"));
        let options = RewriteOptions {
            line_ending: LineEnding::Lf,
            verify: true,
            ..Default::default()
        };
        let report = rewrite_file(&path, &source, &options).unwrap();
        assert_eq!(report.plan, RetainPlan { cutoff: 1, resume: 4 });
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "top\n<Celebration>\nbody\n</Celebration>\nend\n"
        );

        let err = rewrite_file(&path, &source, &options).unwrap_err();
        assert!(matches!(err, SpliceError::MarkerNotRepeated { .. }));
    }

    #[test]
    fn test_verify_blocks_wrong_indices() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("App.tsx");
        write_numbered(&path, 20, "\n");
        let before = fs::read_to_string(&path).unwrap();

        let options = RewriteOptions {
            verify: true,
            ..Default::default()
        };
        let source = PlanSource::Fixed(RetainPlan::new(5, 10).unwrap());
        assert!(matches!(
            rewrite_file(&path, &source, &options),
            Err(SpliceError::NotDuplicate { .. })
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_dry_run_leaves_file_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("App.tsx");
        write_numbered(&path, 10, "\r\n");
        let before = fs::read_to_string(&path).unwrap();

        let options = RewriteOptions {
            dry_run: true,
            ..Default::default()
        };
        let source = PlanSource::Fixed(RetainPlan::new(2, 4).unwrap());
        let report = rewrite_file(&path, &source, &options).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert!(report.to_string().starts_with("Would fix App.tsx"));
        let diff = report.diff.unwrap();
        assert!(diff.contains("-line 2\n"));
        assert!(diff.contains("-line 3\n"));
        assert!(!diff.contains("+line"));
    }

    #[test]
    fn test_backup_written_before_rewrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("App.tsx");
        write_numbered(&path, 10, "\n");
        let before = fs::read_to_string(&path).unwrap();

        let options = RewriteOptions {
            backup: true,
            ..Default::default()
        };
        let source = PlanSource::Fixed(RetainPlan::new(2, 4).unwrap());
        let report = rewrite_file(&path, &source, &options).unwrap();

        let backup = report.backup.unwrap();
        assert_eq!(fs::read_to_string(backup).unwrap(), before);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let source = PlanSource::Fixed(RetainPlan::new(0, 1).unwrap());
        let err = rewrite_file(dir.path().join("gone.tsx"), &source, &RewriteOptions::default())
            .unwrap_err();
        assert!(err.is_io());
    }
}
