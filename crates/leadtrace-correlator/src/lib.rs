//! Leadtrace Correlator
//!
//! Cross-checks attributions against an external analytics traffic feed.
//! Two adjustments, both strictly monotone per row:
//!
//! - **Validation boost**: a lead already attributed to SEO or PPC whose
//!   contact time falls near compatible traffic gets a confidence boost
//!   proportional to the observed sessions (capped, never decreasing).
//! - **Paid re-attribution**: a lead the earlier stages left Unknown, or a
//!   weakly-attributed SEO lead, that coincides with paid ad-platform
//!   traffic inside a wide lookback window is re-attributed to PPC.
//!
//! With an empty feed the stage is a no-op; the feed can only corroborate,
//! never contradict.

#![warn(missing_docs)]

mod config;
mod correlator;

pub use config::CorrelatorConfig;
pub use correlator::TrafficCorrelator;
