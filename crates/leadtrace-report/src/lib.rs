//! Leadtrace Report
//!
//! Aggregation and reporting over a finished attribution batch. The summary
//! is a pure computation from `(leads, results)` pairs; rendering it to the
//! human-readable report text is a separate, equally pure step, so the same
//! summary can back the text report and any tabular export.

#![warn(missing_docs)]

mod summary;
mod text;

pub use summary::{AttributionSummary, ConfidenceStats};
pub use text::{render_report, write_report};
