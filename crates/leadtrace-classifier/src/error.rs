//! Classifier error types

use thiserror::Error;

/// Errors that can occur while building rule tables
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// A rule pattern failed to compile
    #[error("Invalid pattern in rule '{label}': {message}")]
    InvalidPattern {
        /// Label of the offending rule
        label: String,
        /// Compiler message
        message: String,
    },

    /// A rule set names an unknown source
    #[error("Unknown source '{0}' in rule table")]
    UnknownSource(String),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    Toml(String),
}
