//! Command implementations.

pub mod analyze;
pub mod profile;
pub mod report;
pub mod rules;

pub use self::analyze::execute_analyze;
pub use self::profile::execute_profile;
pub use self::report::execute_report;
pub use self::rules::execute_rules;
