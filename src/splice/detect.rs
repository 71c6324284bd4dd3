use regex::Regex;
use std::fmt;
use tracing::{debug, warn};

use super::RetainPlan;
use crate::error::{Result, SpliceError};
use crate::lines::strip_line_ending;

/// Identifies the first line of a duplicated block
#[derive(Debug, Clone)]
pub enum Marker {
    /// Line contains this text
    Literal(String),
    /// Line matches this regex
    Pattern(Regex),
}

impl Marker {
    pub fn literal(text: impl Into<String>) -> Self {
        Marker::Literal(text.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Marker::Pattern)
            .map_err(|e| SpliceError::invalid_argument(format!("invalid marker regex: {}", e)))
    }

    pub fn matches(&self, line: &str) -> bool {
        let line = strip_line_ending(line);
        match self {
            Marker::Literal(text) => line.contains(text.as_str()),
            Marker::Pattern(re) => re.is_match(line),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Literal(text) => write!(f, "{}", text),
            Marker::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// Find the marker twice and plan to drop everything from the first
/// occurrence up to (not including) the second.
pub fn detect_duplicate<S: AsRef<str>>(lines: &[S], marker: &Marker) -> Result<RetainPlan> {
    let mut hits = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| marker.matches(line.as_ref()))
        .map(|(idx, _)| idx);

    let first = hits.next().ok_or_else(|| SpliceError::MarkerNotFound {
        marker: marker.to_string(),
    })?;
    let second = hits.next().ok_or_else(|| SpliceError::MarkerNotRepeated {
        marker: marker.to_string(),
        line: first + 1,
    })?;

    let extra = hits.count();
    if extra > 0 {
        warn!(
            "Marker {} matched {} more times after line {}; using the first two",
            marker,
            extra,
            second + 1
        );
    }

    debug!(
        "Marker {} found at lines {} and {}",
        marker,
        first + 1,
        second + 1
    );
    RetainPlan::new(first, second)
}

/// Check that the span a plan removes is repeated right after it.
///
/// Compares `[cutoff, resume)` with the same number of lines starting at
/// `resume`, ignoring line endings.
pub fn verify_duplicate<S: AsRef<str>>(lines: &[S], plan: &RetainPlan) -> Result<()> {
    let not_duplicate = || SpliceError::NotDuplicate {
        cutoff: plan.cutoff,
        resume: plan.resume,
    };

    let span = plan.resume - plan.cutoff;
    let end = match plan.resume.checked_add(span) {
        Some(end) if end <= lines.len() => end,
        _ => return Err(not_duplicate()),
    };

    let removed = &lines[plan.cutoff..plan.resume];
    let kept = &lines[plan.resume..end];
    let same = removed
        .iter()
        .zip(kept)
        .all(|(a, b)| strip_line_ending(a.as_ref()) == strip_line_ending(b.as_ref()));

    if same {
        Ok(())
    } else {
        Err(not_duplicate())
    }
}
