//! Error types for firmware snapshotting and comparison.

use std::path::PathBuf;
use thiserror::Error;

/// Filesystem indexing errors
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("{0} is not a directory. You must specify the top-level directory of the converted firmware file")]
    NotADirectory(PathBuf),

    #[error("Failed to walk directory: {0}")]
    Walk(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Package metadata errors
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("{0} is not a file!")]
    MissingControl(PathBuf),

    #[error("{0} is not a file!")]
    MissingList(PathBuf),

    #[error("Invalid Installed-Size '{value}' in {path}")]
    InvalidInstalledSize { path: PathBuf, value: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Board and version extraction errors
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Unable to extract board from directory name {0}")]
    BoardNotFound(String),

    #[error("No 'option version' line in {0}")]
    VersionLineMissing(PathBuf),

    #[error("Unable to extract version number from '{0}'")]
    VersionUnparseable(String),

    #[error("No 'option fwversion_suffix' line in {0}")]
    SuffixLineMissing(PathBuf),

    #[error("Unable to extract version number suffix from '{0}'")]
    SuffixUnparseable(String),

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Snapshot cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode cache entry: {0}")]
    Encode(String),

    #[error("Failed to decode cache entry {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("No cache directory available")]
    NoCacheDir,
}

/// Errors raised while building a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Package(#[from] PackageError),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Errors raised while comparing two snapshots
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("Cannot compare board {left} to {right}")]
    BoardMismatch { left: String, right: String },

    #[error("Firmware versions are identical! ({left} == {right})")]
    IdenticalVersions { left: String, right: String },
}

/// Top-level error surfaced by the CLI
#[derive(Debug, Error)]
pub enum CompareError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Output error: {0}")]
    Output(String),
}

impl From<config::ConfigError> for CompareError {
    fn from(err: config::ConfigError) -> Self {
        CompareError::ConfigError(err.to_string())
    }
}
