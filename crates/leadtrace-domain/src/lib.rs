//! Leadtrace Domain Layer
//!
//! This crate contains the core business logic and domain model for
//! Leadtrace. It keeps external dependencies to a minimum (chrono only) and
//! defines the fundamental concepts, value objects, and trait interfaces
//! that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **LeadRecord**: one inbound contact plus its normalized evidence
//! - **AttributionResult**: the ranked decision for a lead, with audit trail
//! - **ConfidenceScore**: numeric certainty in [0, 100]; its bucket label is
//!   always derived, never stored
//! - **TrafficSample**: one row of an external analytics feed
//! - **AttributionStage**: the snapshot-in, snapshot-out pipeline seam
//!
//! ## Architecture
//!
//! Pipeline stages never mutate shared state in place: each stage consumes
//! the current snapshot of all results and returns the next one. Mutations
//! inside a snapshot go through `AttributionResult` methods so that the
//! invariants (score bounds, write-once original source, non-empty override
//! reasons) hold by construction.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attribution;
pub mod confidence;
pub mod lead;
pub mod source;
pub mod stage;
pub mod traffic;

// Re-exports for convenience
pub use attribution::AttributionResult;
pub use confidence::{ConfidenceLevel, ConfidenceScore};
pub use lead::{LeadRecord, TicketMessage};
pub use source::Source;
pub use stage::AttributionStage;
pub use traffic::{MediumClass, TrafficSample};
