// Diff rendering for dry runs

pub mod preview;

pub use preview::{unified_diff, unified_diff_ignoring_endings};
