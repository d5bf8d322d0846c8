//! Leadtrace Extractor
//!
//! Derives normalized evidence from raw lead rows - the first pipeline
//! stage.
//!
//! # Overview
//!
//! The extractor is a pure transform: for each raw lead it produces
//! lowercased subject/content text, an extracted keyword list (words plus
//! 2-/3-word phrases), the product-mention list, and the earliest parseable
//! timestamp. Missing text becomes an empty string and an unparsable
//! timestamp becomes `None`; extraction itself never fails.
//!
//! # Architecture
//!
//! ```text
//! RawLead → EvidenceExtractor → LeadRecord → classifier → ...
//! ```
//!
//! # Example Usage
//!
//! ```
//! use leadtrace_extractor::{EvidenceExtractor, ExtractorConfig, RawLead, RawTicket};
//!
//! let extractor = EvidenceExtractor::new(ExtractorConfig::default());
//!
//! let raw = RawLead {
//!     email: "  Alice@Example.COM ".to_string(),
//!     tickets: vec![RawTicket {
//!         subject: "Custom Lanyards Enquiry".to_string(),
//!         content: "We need 200 lanyards".to_string(),
//!         timestamp: "2024-06-12 14:30:00".to_string(),
//!     }],
//!     products: "Lanyards".to_string(),
//!     extra: vec![],
//! };
//!
//! let lead = extractor.extract(raw);
//! assert_eq!(lead.email, "alice@example.com");
//! assert!(lead.keywords.contains(&"custom lanyards".to_string()));
//! ```

#![warn(missing_docs)]

mod config;
mod evidence;
mod keywords;
mod types;


pub use config::ExtractorConfig;
pub use evidence::{parse_timestamp, EvidenceExtractor};
pub use keywords::extract_keywords;
pub use types::{RawLead, RawTicket};
