// linesplice - removes a duplicated block of lines from a source file
// and rewrites it in place with a fixed newline convention

pub mod config;
pub mod diff;
pub mod error;
pub mod lines;
pub mod rewrite;
pub mod splice;
pub mod utils;

pub use error::{Result, SpliceError};
pub use lines::LineEnding;
pub use rewrite::{rewrite_file, PlanSource, RewriteOptions, RewriteReport};
pub use splice::{Marker, RetainPlan};

use tracing::debug;
use tracing_subscriber::EnvFilter;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Initialize logging to stderr
///
/// `RUST_LOG` takes precedence; otherwise `default_level` is used for this
/// crate. Stdout stays reserved for the confirmation line and diffs.
pub fn init_with_logger(default_level: &str, ansi_colors: bool) {
    use tracing_subscriber::fmt;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("linesplice={}", default_level)));

    // A second init (tests, embedding) is not an error worth surfacing
    let _ = fmt::Subscriber::builder()
        .with_ansi(ansi_colors)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();

    debug!("Initialized linesplice v{}", version());
}
