//! Configuration for the extractor

use serde::{Deserialize, Serialize};

/// Configuration for the evidence extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum normalized content length per lead (characters); longer text
    /// is truncated, not rejected
    pub max_content_length: usize,

    /// Maximum keywords kept per lead after deduplication
    pub max_keywords: usize,

    /// Longest phrase (in words) emitted by keyword extraction
    pub phrase_window: usize,
}

impl ExtractorConfig {
    /// Lightweight preset for large batches: short content cap, fewer
    /// keywords, single-word phrases only
    pub fn minimal() -> Self {
        Self {
            max_content_length: 10_000,
            max_keywords: 50,
            phrase_window: 1,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_content_length == 0 {
            return Err("max_content_length must be greater than 0".to_string());
        }
        if self.max_keywords == 0 {
            return Err("max_keywords must be greater than 0".to_string());
        }
        if self.phrase_window == 0 || self.phrase_window > 5 {
            return Err("phrase_window must be in 1..=5".to_string());
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

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_content_length: 100_000,
            max_keywords: 500,
            phrase_window: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_minimal_preset_is_valid() {
        let config = ExtractorConfig::minimal();
        assert!(config.validate().is_ok());
        assert!(config.max_content_length < ExtractorConfig::default().max_content_length);
    }

    #[test]
    fn test_invalid_phrase_window() {
        let mut config = ExtractorConfig::default();
        config.phrase_window = 0;
        assert!(config.validate().is_err());
        config.phrase_window = 6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.max_content_length, parsed.max_content_length);
        assert_eq!(config.max_keywords, parsed.max_keywords);
        assert_eq!(config.phrase_window, parsed.phrase_window);
    }
}
