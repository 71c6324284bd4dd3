// Line-range splice: keeps [0, cutoff) and [resume, end) and drops the
// span between them.

pub mod detect;

pub use detect::{detect_duplicate, verify_duplicate, Marker};

use std::fmt;
use tracing::debug;

use crate::error::{Result, SpliceError};

/// The pair of retained ranges `[0, cutoff)` and `[resume, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetainPlan {
    /// Where the first retained range ends
    pub cutoff: usize,
    /// Where the second retained range begins
    pub resume: usize,
}

impl RetainPlan {
    /// Build a plan from fixed indices.
    ///
    /// Only `cutoff <= resume` is checked. Indices past the end of the file are
    /// accepted and simply clamp when the plan is applied.
    pub fn new(cutoff: usize, resume: usize) -> Result<Self> {
        if cutoff > resume {
            return Err(SpliceError::InvalidRange { cutoff, resume });
        }
        Ok(Self { cutoff, resume })
    }

    /// Number of lines this plan removes from a file of `total` lines
    pub fn removed(&self, total: usize) -> usize {
        self.resume.min(total) - self.cutoff.min(total)
    }

    /// Number of lines left after applying this plan to `total` lines
    pub fn output_len(&self, total: usize) -> usize {
        total - self.removed(total)
    }

    /// Concatenate the two retained ranges
    pub fn apply<T: Clone>(&self, lines: &[T]) -> Vec<T> {
        let total = lines.len();
        let cutoff = self.cutoff.min(total);
        let resume = self.resume.min(total);
        debug!(
            "Splicing {} lines: keep [0, {}) and [{}, {})",
            total, cutoff, resume, total
        );

        let mut out = Vec::with_capacity(self.output_len(total));
        out.extend_from_slice(&lines[..cutoff]);
        out.extend_from_slice(&lines[resume..]);
        out
    }
}

impl fmt::Display for RetainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "keep [0, {}) + [{}, end)", self.cutoff, self.resume)
    }
}
