use std::path::PathBuf;
use thiserror::Error;

/// Main error type for linesplice
#[derive(Error, Debug)]
pub enum SpliceError {
    #[error("IO error on {}: {source}", display_path(.path))]
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },

    #[error("File is not valid UTF-8: {}", .path.display())]
    Encoding {
        source: std::string::FromUtf8Error,
        path: PathBuf,
    },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Invalid line range: cutoff {cutoff} is past resume {resume}")]
    InvalidRange { cutoff: usize, resume: usize },

    #[error("Marker {marker:?} not found")]
    MarkerNotFound { marker: String },

    #[error("Marker {marker:?} occurs only once (line {line}); nothing to remove")]
    MarkerNotRepeated { marker: String, line: usize },

    #[error("Lines {cutoff}..{resume} are not a copy of the lines that follow them")]
    NotDuplicate { cutoff: usize, resume: usize },

    #[error("Write verification failed for {}: content on disk differs", .path.display())]
    VerificationFailed { path: PathBuf },

    #[error("Config error: {message}")]
    Config { message: String },
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unknown>".to_string())
}

impl SpliceError {
    /// Create a new IO error with path context
    pub fn io_error(err: std::io::Error, path: Option<impl Into<PathBuf>>) -> Self {
        Self::Io {
            source: err,
            path: path.map(|p| p.into()),
        }
    }

    /// Create a new invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a new config error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True when the error came from the filesystem rather than from file content
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

pub type Result<T> = std::result::Result<T, SpliceError>;
