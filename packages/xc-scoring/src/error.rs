//! Error types for task construction, geometry and track reading.

use std::path::PathBuf;

use chrono::NaiveTime;
use thiserror::Error;

/// A task that cannot be scored. Always fatal for the task.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("task has no turnpoints")]
    EmptyTask,

    #[error("cannot optimize a route through zero turnpoints")]
    EmptyRoute,

    #[error("invalid time window: {reason} (open={open:?}, start={start:?}, stop={stop})")]
    InvalidTimeWindow {
        reason: &'static str,
        open: Option<NaiveTime>,
        start: Option<NaiveTime>,
        stop: NaiveTime,
    },

    #[error("unknown goal style '{0}' (expected CYLINDER or LINE)")]
    UnknownGoalStyle(String),

    #[error("turnpoint {index} ('{name}') is invalid: {reason}")]
    InvalidTurnpoint {
        index: usize,
        name: String,
        reason: &'static str,
    },

    #[error("task format not recognized: {}", format_failures(.0))]
    UnrecognizedFormat(Vec<FormatError>),
}

fn format_failures(failures: &[FormatError]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// One task adapter refusing a source document.
#[derive(Debug, Error)]
#[error("{format}: {message}")]
pub struct FormatError {
    pub format: &'static str,
    pub message: String,
}

impl FormatError {
    pub fn new(format: &'static str, message: impl Into<String>) -> Self {
        Self {
            format,
            message: message.into(),
        }
    }
}

/// The geodesic solver produced an unusable value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("inverse problem returned non-finite result (distance={distance}, heading={heading})")]
    NonFiniteInverse { distance: f64, heading: f64 },

    #[error("direct problem returned non-finite coordinate ({lat}, {lon})")]
    NonFiniteDirect { lat: f64, lon: f64 },
}

/// Flight recorder file problems.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("failed to read track {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("track '{0}' contains no fix records")]
    NoFixes(String),
}

/// Top-level error for loading a task from disk or text.
#[derive(Debug, Error)]
pub enum TaskLoadError {
    #[error("failed to read task {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("task is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
