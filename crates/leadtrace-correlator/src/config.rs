//! Configuration for the traffic correlator

use serde::{Deserialize, Serialize};

/// Correlation window configuration
///
/// The boost window is tight (traffic right around the contact), the paid
/// re-attribution window is a wide lookback (an ad click can precede the
/// enquiry by up to two days).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelatorConfig {
    /// Boost window: hours of traffic before the lead's first contact
    pub boost_before_hours: i64,

    /// Boost window: hours of traffic after the lead's first contact
    pub boost_after_hours: i64,

    /// Paid re-attribution window: lookback hours before first contact
    pub paid_before_hours: i64,

    /// Paid re-attribution window: minutes after first contact
    pub paid_after_minutes: i64,
}

impl CorrelatorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.boost_before_hours < 0 || self.boost_after_hours < 0 {
            return Err("boost window bounds must be non-negative".to_string());
        }
        if self.paid_before_hours < 0 || self.paid_after_minutes < 0 {
            return Err("paid window bounds must be non-negative".to_string());
        }
        if self.boost_before_hours + self.boost_after_hours == 0 {
            return Err("boost window must not be empty".to_string());
        }
        if self.paid_before_hours * 60 + self.paid_after_minutes == 0 {
            return Err("paid window must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for CorrelatorConfig {
    fn default() -> Self {
        Self {
            boost_before_hours: 2,
            boost_after_hours: 1,
            paid_before_hours: 48,
            paid_after_minutes: 30,
        }
    }
}
