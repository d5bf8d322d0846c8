//! Leadtrace Classifier
//!
//! First-pass pattern attribution and content-based override correction.
//!
//! Both stages are driven by declarative rule tables rather than per-category
//! control flow: the classifier evaluates an ordered list of per-source rule
//! sets ("first rule set with any matching member wins"), and the override
//! engine evaluates a mutually-exclusive chain of override categories
//! ("first category matched wins, no further categories checked"). Adding a
//! campaign identifier or phrase variant means editing a table, not code.
//!
//! # Examples
//!
//! ```
//! use leadtrace_classifier::{PatternClassifier, RuleTable};
//! use leadtrace_domain::AttributionStage;
//!
//! let classifier = PatternClassifier::new(RuleTable::default_table());
//! assert_eq!(classifier.name(), "pattern-classifier");
//! ```

#![warn(missing_docs)]

mod classifier;
mod content;
mod error;
mod rules;

pub use classifier::PatternClassifier;
pub use content::{
    CaptureStyle, ContentOverrideEngine, OverrideCategorySpec, OverrideTable,
};
pub use error::ClassifierError;
pub use rules::{MatchField, RuleMatch, RuleSetSpec, RuleSpec, RuleTable, RuleTableSpec};
