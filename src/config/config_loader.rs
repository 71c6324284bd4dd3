use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, SpliceError};
use crate::lines::LineEnding;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "linesplice.toml";

/// Settings that can live in `linesplice.toml`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpliceConfig {
    /// Newline written after every output line
    pub line_ending: LineEnding,

    /// Keep a timestamped copy of the file before rewriting it
    pub backup: bool,

    /// Require the removed span to duplicate the lines after it
    pub verify: bool,

    /// Context lines shown around each dry-run hunk
    pub diff_context: usize,
}

impl Default for SpliceConfig {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Crlf,
            backup: false,
            verify: false,
            diff_context: 3,
        }
    }
}

/// The configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
    required: bool,
}

impl ConfigLoader {
    /// Look for `linesplice.toml` in the current directory; missing is fine
    pub fn new() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            required: false,
        }
    }

    /// Use an explicit config path; it must exist
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            required: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load the configuration
    pub fn load(&self) -> Result<SpliceConfig> {
        if !self.config_path.exists() {
            if self.required {
                return Err(SpliceError::config_error(format!(
                    "config file not found: {}",
                    self.config_path.display()
                )));
            }
            debug!("No config at {}, using defaults", self.config_path.display());
            return Ok(SpliceConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| SpliceError::io_error(e, Some(&self.config_path)))?;
        let config = toml::from_str(&content).map_err(|e| {
            SpliceError::config_error(format!("{}: {}", self.config_path.display(), e))
        })?;

        debug!("Loaded config from {}", self.config_path.display());
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
