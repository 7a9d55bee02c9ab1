use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the speleo library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Only caller mistakes and unreadable input surface here. Orphaned shots,
/// isolated surveys, and unreachable sections are reported as data.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a station name could not be found in the graph or station map.
    #[error("unknown station name: {name}{}", format_suggestions(.suggestions))]
    UnknownStation {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when an edit names a survey the cave does not contain.
    #[error("unknown survey: {name}")]
    UnknownSurvey { name: String },

    /// Raised when a survey declares a start station another survey already positioned.
    #[error("station {name} declared as start of survey {survey} is already positioned by survey {existing_survey}")]
    DuplicateStation {
        name: String,
        survey: String,
        existing_survey: String,
    },

    /// Raised when an edge is added with a negative or non-finite weight.
    #[error("invalid edge weight {weight} between {from} and {to}")]
    InvalidEdgeWeight { from: String, to: String, weight: f64 },

    /// Raised when loop enumeration is requested on a graph without edges.
    #[error("cannot enumerate cycles of a graph with no edges")]
    EmptyGraph,

    /// Raised when a shot fails ingestion-time validation.
    #[error("invalid shot {shot} in survey {survey}: {message}")]
    InvalidShot {
        survey: String,
        shot: usize,
        message: String,
    },

    /// Raised when a color literal is not of the form `#rrggbb`.
    #[error("invalid color literal {value:?}; expected #rrggbb")]
    InvalidColor { value: String },

    /// Raised when a snapshot file extension is not recognised.
    #[error("unsupported snapshot format at {path}; expected .json, .csv or .txt")]
    UnsupportedFormat { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for configuration")]
    ProjectDirsUnavailable,

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON snapshot and configuration errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for delimited shot table errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
