use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::coords::Position;

/// Convenient result alias for the sea route library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A coordinate was non-finite or outside the valid longitude/latitude range.
    #[error("invalid coordinate ({longitude}, {latitude}): {reason}")]
    InvalidCoordinate {
        longitude: f64,
        latitude: f64,
        reason: String,
    },

    /// Fewer than two waypoints were supplied for a route.
    #[error("a route needs at least 2 waypoints, got {count}")]
    InsufficientWaypoints { count: usize },

    /// No graph vertex within tolerance, or no connected path between the endpoints.
    #[error("no path found from {origin} to {destination}: {reason}")]
    PathNotFound {
        origin: Position,
        destination: Position,
        reason: String,
    },

    /// The navigable-lines dataset is missing, unparsable or empty.
    #[error("routing graph unavailable from {path}: {message}")]
    GraphUnavailable { path: PathBuf, message: String },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the dataset")]
    ProjectDirsUnavailable,

    /// Raised when an output representation cannot be produced for a route.
    #[error("unsupported output: {message}")]
    UnsupportedOutput { message: String },

    /// Raised when serializing the prepared graph cache fails.
    #[error("failed to serialize prepared graph cache: {message}")]
    CacheSerialize { message: String },

    /// Raised when loading the prepared graph cache from a file fails.
    #[error("failed to load prepared graph cache from {path}: {message}")]
    CacheLoad { path: PathBuf, message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Stable classification of an [`Error`], used in structured error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidCoordinate,
    InsufficientWaypoints,
    PathNotFound,
    GraphUnavailable,
    UnsupportedOutput,
    Cache,
    Io,
    Json,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            ErrorKind::InvalidCoordinate => "invalid_coordinate",
            ErrorKind::InsufficientWaypoints => "insufficient_waypoints",
            ErrorKind::PathNotFound => "path_not_found",
            ErrorKind::GraphUnavailable => "graph_unavailable",
            ErrorKind::UnsupportedOutput => "unsupported_output",
            ErrorKind::Cache => "cache",
            ErrorKind::Io => "io",
            ErrorKind::Json => "json",
        };
        f.write_str(value)
    }
}

/// Serializable error payload: the error kind plus a human-readable message.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidCoordinate { .. } => ErrorKind::InvalidCoordinate,
            Error::InsufficientWaypoints { .. } => ErrorKind::InsufficientWaypoints,
            Error::PathNotFound { .. } => ErrorKind::PathNotFound,
            Error::GraphUnavailable { .. } | Error::ProjectDirsUnavailable => {
                ErrorKind::GraphUnavailable
            }
            Error::UnsupportedOutput { .. } => ErrorKind::UnsupportedOutput,
            Error::CacheSerialize { .. } | Error::CacheLoad { .. } => ErrorKind::Cache,
            Error::Io(_) => ErrorKind::Io,
            Error::Json(_) => ErrorKind::Json,
        }
    }

    /// Build the structured report shown to users for a failed request.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
        }
    }

    pub(crate) fn graph_unavailable(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::GraphUnavailable {
            path: path.into(),
            message: message.into(),
        }
    }
}
