//! Attribution result module - the ranked decision per lead, with audit trail

use crate::confidence::{ConfidenceLevel, ConfidenceScore};
use crate::source::Source;

/// The attribution decision for one lead, carried across pipeline stages
///
/// All mutation goes through methods so the invariants hold by construction:
/// the score stays in [0, 100], `original_source` is write-once, every
/// override carries a non-empty reason, and a correlator boost never lowers
/// the score.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionResult {
    source: Source,
    original_source: Option<Source>,
    confidence: ConfidenceScore,
    detail: String,
    drill_down: String,
    data_source: String,
    email_content_override: bool,
    override_reason: String,
    ga4_validated: bool,
    ga4_sessions: u64,
}

impl AttributionResult {
    /// Provenance tag for first-pass pattern attribution
    pub const SOURCE_PATTERN: &'static str = "pattern";
    /// Provenance tag for correlator PPC re-attribution
    pub const SOURCE_GA4_PPC: &'static str = "ga4_ppc";

    /// The starting state: Unknown with zero confidence
    pub fn unattributed() -> Self {
        Self {
            source: Source::Unknown,
            original_source: None,
            confidence: ConfidenceScore::ZERO,
            detail: String::new(),
            drill_down: String::new(),
            data_source: "unknown".to_string(),
            email_content_override: false,
            override_reason: String::new(),
            ga4_validated: false,
            ga4_sessions: 0,
        }
    }

    /// Seed the first-pass attribution (Pattern Classifier stage)
    pub fn attribute(
        &mut self,
        source: Source,
        confidence: ConfidenceScore,
        detail: impl Into<String>,
        data_source: impl Into<String>,
    ) {
        self.source = source;
        self.confidence = confidence;
        self.detail = detail.into();
        self.data_source = data_source.into();
    }

    /// Override the current attribution with stronger content evidence
    ///
    /// Freezes `original_source` from the pre-override value if not already
    /// set, marks the row as overridden, and records the reason.
    ///
    /// # Panics
    /// Panics if `reason` is empty - every override carries a reason.
    pub fn override_with(
        &mut self,
        source: Source,
        confidence: ConfidenceScore,
        reason: impl Into<String>,
        drill_down: impl Into<String>,
        data_source: impl Into<String>,
    ) {
        let reason = reason.into();
        assert!(!reason.is_empty(), "override must carry a reason");

        self.freeze_original();
        self.source = source;
        self.confidence = confidence;
        self.email_content_override = true;
        self.override_reason = reason;
        self.drill_down = drill_down.into();
        self.data_source = data_source.into();
    }

    /// Re-attribute based on correlated external traffic (Correlator stage)
    pub fn reattribute(
        &mut self,
        source: Source,
        confidence: ConfidenceScore,
        detail: impl Into<String>,
        data_source: impl Into<String>,
    ) {
        self.freeze_original();
        self.source = source;
        self.confidence = confidence;
        self.detail = detail.into();
        self.data_source = data_source.into();
    }

    /// Boost confidence after finding time-correlated compatible traffic
    ///
    /// The factor is floored at 1.0 and the score is clamped to 100, so a
    /// boost never decreases confidence. Records the validating session
    /// count and appends to the detail trail.
    pub fn boost(&mut self, factor: f64, sessions: u64) {
        self.confidence = self.confidence.boosted(factor);
        self.ga4_validated = true;
        self.ga4_sessions = sessions;
        self.detail
            .push_str(&format!(" | GA4: {} sessions validated", sessions));
    }

    fn freeze_original(&mut self) {
        if self.original_source.is_none() {
            self.original_source = Some(self.source);
        }
    }

    /// Current attributed source
    pub fn source(&self) -> Source {
        self.source
    }

    /// The source as it stood before the first override, if any occurred
    pub fn original_source(&self) -> Option<Source> {
        self.original_source
    }

    /// Current confidence score
    pub fn confidence(&self) -> ConfidenceScore {
        self.confidence
    }

    /// Derived confidence bucket (never independently assignable)
    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.confidence.level()
    }

    /// Human-readable explanation of the deciding evidence
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Sub-classification beneath the source (campaign, referrer name, ...)
    pub fn drill_down(&self) -> &str {
        &self.drill_down
    }

    /// Provenance tag naming the stage that produced the current value
    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    /// Whether the Content Override Engine changed this attribution
    pub fn is_override(&self) -> bool {
        self.email_content_override
    }

    /// Override cause; empty when no override occurred
    pub fn override_reason(&self) -> &str {
        &self.override_reason
    }

    /// Whether the correlator found time-correlated compatible traffic
    pub fn ga4_validated(&self) -> bool {
        self.ga4_validated
    }

    /// Session count behind the correlator validation
    pub fn ga4_sessions(&self) -> u64 {
        self.ga4_sessions
    }
}

impl Default for AttributionResult {
    fn default() -> Self {
        Self::unattributed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unattributed_start_state() {
        let result = AttributionResult::unattributed();
        assert_eq!(result.source(), Source::Unknown);
        assert_eq!(result.confidence().value(), 0.0);
        assert_eq!(result.confidence_level(), ConfidenceLevel::Unknown);
        assert!(!result.is_override());
        assert!(result.override_reason().is_empty());
    }

    #[test]
    fn test_original_source_write_once() {
        let mut result = AttributionResult::unattributed();
        result.attribute(
            Source::Seo,
            ConfidenceScore::new(70.0),
            "keyword match",
            AttributionResult::SOURCE_PATTERN,
        );

        result.override_with(
            Source::Direct,
            ConfidenceScore::new(90.0),
            "Payment-related communication (existing customer)",
            "",
            "email_payment",
        );
        assert_eq!(result.original_source(), Some(Source::Seo));

        // A later re-attribution must not rewrite the frozen original
        result.reattribute(
            Source::Ppc,
            ConfidenceScore::new(85.0),
            "GA4 PPC detection",
            AttributionResult::SOURCE_GA4_PPC,
        );
        assert_eq!(result.original_source(), Some(Source::Seo));
        assert_eq!(result.source(), Source::Ppc);
    }

    #[test]
    #[should_panic(expected = "override must carry a reason")]
    fn test_override_requires_reason() {
        let mut result = AttributionResult::unattributed();
        result.override_with(
            Source::Direct,
            ConfidenceScore::new(90.0),
            "",
            "",
            "email_payment",
        );
    }

    #[test]
    fn test_boost_records_sessions_and_clamps() {
        let mut result = AttributionResult::unattributed();
        result.attribute(
            Source::Ppc,
            ConfidenceScore::new(90.0),
            "campaign match",
            AttributionResult::SOURCE_PATTERN,
        );

        result.boost(1.3, 42);
        assert_eq!(result.confidence().value(), 100.0);
        assert!(result.ga4_validated());
        assert_eq!(result.ga4_sessions(), 42);
        assert!(result.detail().contains("42 sessions validated"));
    }

    #[test]
    fn test_boost_never_decreases() {
        let mut result = AttributionResult::unattributed();
        result.attribute(
            Source::Seo,
            ConfidenceScore::new(60.0),
            "keyword match",
            AttributionResult::SOURCE_PATTERN,
        );
        result.boost(0.2, 1);
        assert_eq!(result.confidence().value(), 60.0);
    }
}
