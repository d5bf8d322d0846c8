//! Pipeline error types

use thiserror::Error;

/// Errors that can occur while running an attribution batch
///
/// Only batch-level faults surface here. Row-level problems (an unparsable
/// timestamp, a missing column value) degrade that row and are logged, they
/// never abort the batch.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The lead evidence file is missing or unreadable
    #[error("Lead evidence unavailable at '{path}': {message}")]
    MissingEvidence {
        /// Path that was attempted
        path: String,
        /// Underlying cause
        message: String,
    },

    /// The traffic feed file was named but could not be read
    #[error("Traffic feed unavailable at '{path}': {message}")]
    FeedUnavailable {
        /// Path that was attempted
        path: String,
        /// Underlying cause
        message: String,
    },

    /// A table row is structurally broken (not merely missing values)
    #[error("Malformed record at line {line}: {message}")]
    MalformedRecord {
        /// 1-based line number in the input
        line: usize,
        /// What was wrong
        message: String,
    },

    /// Failure writing an output artifact
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
