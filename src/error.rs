use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while validating, planning or processing files
#[derive(Error, Debug)]
pub enum Error {
    #[error("Source file does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Source is not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Expected a .{expected} file, got: {}", .path.display())]
    WrongExtension { path: PathBuf, expected: String },

    #[error("Source and destination are the same file: {}", .0.display())]
    SameSourceAndDestination(PathBuf),

    #[error("Root directory does not exist: {}", .0.display())]
    RootMissing(PathBuf),

    #[error("Root is not a directory (single files are not supported): {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("Invalid comment prefix pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Comment pattern matched {matches} times on line {line} of {}", .path.display())]
    PatternAmbiguity {
        path: PathBuf,
        line: usize,
        matches: usize,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error was raised before any file was touched
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::PatternAmbiguity { .. } | Self::Io { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
