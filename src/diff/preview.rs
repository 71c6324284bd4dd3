use similar::TextDiff;
use std::path::Path;

use crate::lines::{split_lines_keep_ends, strip_line_ending};

/// Render a unified diff between the current and planned file content
pub fn unified_diff(path: &Path, before: &str, after: &str, context: usize) -> String {
    let name = path.display().to_string();
    TextDiff::from_lines(before, after)
        .unified_diff()
        .context_radius(context)
        .header(&format!("a/{}", name), &format!("b/{}", name))
        .to_string()
}

/// Diff that hides newline-only changes, so a CRLF conversion does not
/// drown out the lines actually removed
pub fn unified_diff_ignoring_endings(
    path: &Path,
    before: &str,
    after: &str,
    context: usize,
) -> String {
    unified_diff(path, &normalize(before), &normalize(after), context)
}

fn normalize(text: &str) -> String {
    split_lines_keep_ends(text)
        .iter()
        .map(|line| format!("{}\n", strip_line_ending(line)))
        .collect()
}
