//! Leadtrace Pipeline
//!
//! End-to-end batch orchestration: ingest exported helpdesk and analytics
//! tables, run the fixed attribution stage sequence, aggregate, and export
//! per-lead results. This is the crate a scheduler or CLI drives; the
//! individual stages live in their own crates and know nothing about files.

#![warn(missing_docs)]

mod error;
pub mod ingest;
mod pipeline;
pub mod table;

pub use error::PipelineError;
pub use pipeline::{
    result_rows, run_attribution, run_attribution_files, write_results, write_summary,
    AttributionPipeline, AttributionRequest, BatchOutcome, RESULT_COLUMNS,
};
