//! Error types for treesort.
//!
//! `SortError` is what every core operation returns. `main` prints it and
//! turns it into a process exit status with [`SortError::exit_code`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit status for a failed sort (I/O, bucket or collision failures).
pub const EXIT_SORT_FAILED: i32 = 1;
/// Exit status for bad arguments, config files or validation failures.
pub const EXIT_USAGE: i32 = 2;
/// Exit status when the sort succeeded but removing the source failed.
pub const EXIT_DELETE_FAILED: i32 = 3;

#[derive(Debug, Error)]
pub enum BucketError {
    #[error("file name is empty: '{}'", .0.display())]
    EmptyName(PathBuf),

    #[error("file name is not valid UTF-8: '{}'", .0.display())]
    NonUnicode(PathBuf),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("cannot determine base directory: {0}")]
    BaseDir(io::Error),
}

#[derive(Debug, Error)]
pub enum SortError {
    #[error("failed to {action} '{}': {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("source '{}' is not a directory", .0.display())]
    SourceNotDirectory(PathBuf),

    #[error("'{}' exists but is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error(transparent)]
    Bucket(#[from] BucketError),

    #[error("destination '{}' already exists (collision policy is 'fail')", .0.display())]
    Collision(PathBuf),

    #[error("'{}' would be copied onto itself", .0.display())]
    SameFile(PathBuf),

    #[error("failed to delete source folder '{}': {source}", path.display())]
    Delete { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Validation(String),
}

impl SortError {
    /// Wrap an `io::Error` with the action that failed and the path involved.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        SortError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            SortError::Config(_) | SortError::Validation(_) => EXIT_USAGE,
            SortError::Delete { .. } => EXIT_DELETE_FAILED,
            SortError::Io { .. }
            | SortError::SourceNotDirectory(_)
            | SortError::NotADirectory(_)
            | SortError::Bucket(_)
            | SortError::Collision(_)
            | SortError::SameFile(_) => EXIT_SORT_FAILED,
        }
    }
}

pub type SortResult<T> = Result<T, SortError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
