// error.rs - Failure kinds for a conversion run
//
// Every failure aborts the run. Nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReliefError>;

#[derive(Debug, Error)]
pub enum ReliefError {
    /// Missing, corrupt or undersized input
    #[error("input error: {message}")]
    Input { message: String },

    /// A parameter outside its legal range
    #[error("config error: `{param}` {message}")]
    Config { param: &'static str, message: String },

    /// Out-of-range vertex index or similar internal defect
    #[error("geometry invariant violated: {message}")]
    GeometryInvariant { message: String },

    /// Output could not be written
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReliefError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input { message: message.into() }
    }

    pub fn config(param: &'static str, message: impl Into<String>) -> Self {
        Self::Config { param, message: message.into() }
    }

    pub fn geometry(message: impl Into<String>) -> Self {
        Self::GeometryInvariant { message: message.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Short stable name of the failure class
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Input { .. } => "InputError",
            Self::Config { .. } => "ConfigError",
            Self::GeometryInvariant { .. } => "GeometryInvariant",
            Self::Io { .. } => "IOError",
        }
    }
}
