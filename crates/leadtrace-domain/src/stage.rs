//! Stage trait - the pipeline seam
//!
//! Each stage takes the current snapshot of results for all leads and
//! returns the next snapshot. Rows are evaluated independently: a fault in
//! one row's evidence must never abort the others, so `apply` is infallible
//! and row-level problems degrade to "no change" for that row.

use crate::attribution::AttributionResult;
use crate::lead::LeadRecord;

/// One pipeline stage over the full lead batch
///
/// `results[i]` is the decision for `leads[i]`; implementations must return
/// a vector of the same length and may not reorder rows.
pub trait AttributionStage {
    /// Stage name, used in logs and the audit trail
    fn name(&self) -> &'static str;

    /// Consume the current snapshot and produce the next one
    fn apply(&self, leads: &[LeadRecord], results: Vec<AttributionResult>)
        -> Vec<AttributionResult>;
}
