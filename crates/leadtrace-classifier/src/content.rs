//! Content-based override correction stage
//!
//! Some email content is stronger evidence than any first-pass pattern: a
//! campaign-tagged subject line proves the paid click, a remittance advice
//! proves an existing customer. The override engine evaluates a
//! mutually-exclusive chain of categories in fixed order; the first category
//! with a matching phrase rewrites the attribution (preserving the original
//! source in the audit trail) and no later category is consulted, so a
//! second run over the same rows changes nothing.

use crate::error::ClassifierError;
use crate::rules::MatchField;
use leadtrace_domain::{
    AttributionResult, AttributionStage, ConfidenceScore, LeadRecord, Source,
};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a category turns its first capture group into a drill-down value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStyle {
    /// Campaign identifier: lowercase, spaces to underscores
    CampaignId,
    /// Person name: first letter capitalized
    Name,
    /// No capture; drill-down stays empty
    NoCapture,
}

/// One override category in the chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideCategorySpec {
    /// Category name, used in logs
    pub label: String,

    /// Ordered phrase patterns; any match triggers the category
    pub patterns: Vec<String>,

    /// Field the patterns are applied to
    pub field: MatchField,

    /// Corrected source
    pub source: String,

    /// Confidence seed for the corrected attribution
    pub confidence: f64,

    /// Override reason recorded on the row; must be non-empty
    pub reason: String,

    /// Drill-down prefix, completed from the capture when one exists
    pub drill_down_prefix: String,

    /// Drill-down used when the winning pattern has no capture group
    pub drill_down_fallback: String,

    /// Capture handling for the drill-down
    pub capture: CaptureStyle,

    /// Provenance tag recorded on the row
    pub data_source: String,
}

struct CompiledOverride {
    label: String,
    patterns: Vec<Regex>,
    field: MatchField,
    source: Source,
    confidence: ConfidenceScore,
    reason: String,
    drill_down_prefix: String,
    drill_down_fallback: String,
    capture: CaptureStyle,
    data_source: String,
}

/// Compiled override chain, categories in evaluation order
pub struct OverrideTable {
    categories: Vec<CompiledOverride>,
}

impl OverrideTable {
    /// Compile a declarative category chain
    pub fn compile(specs: &[OverrideCategorySpec]) -> Result<Self, ClassifierError> {
        let mut categories = Vec::with_capacity(specs.len());
        for spec in specs {
            let source = Source::parse(&spec.source)
                .ok_or_else(|| ClassifierError::UnknownSource(spec.source.clone()))?;
            let patterns = spec
                .patterns
                .iter()
                .map(|p| {
                    RegexBuilder::new(p)
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| ClassifierError::InvalidPattern {
                            label: spec.label.clone(),
                            message: e.to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            categories.push(CompiledOverride {
                label: spec.label.clone(),
                patterns,
                field: spec.field,
                source,
                confidence: ConfidenceScore::new(spec.confidence),
                reason: spec.reason.clone(),
                drill_down_prefix: spec.drill_down_prefix.clone(),
                drill_down_fallback: spec.drill_down_fallback.clone(),
                capture: spec.capture,
                data_source: spec.data_source.clone(),
            });
        }
        Ok(Self { categories })
    }

    /// The built-in category chain: campaign, payment, repeat, referral
    pub fn default_table() -> Self {
        Self::compile(&Self::default_spec()).expect("default override table compiles")
    }

    /// The declarative form of the default chain
    pub fn default_spec() -> Vec<OverrideCategorySpec> {
        vec![
            OverrideCategorySpec {
                label: "campaign subject".to_string(),
                patterns: vec![r"you'?ve got a new enquiry!?\s*\(([^)]+)\)".to_string()],
                field: MatchField::Subject,
                source: "PPC".to_string(),
                confidence: 95.0,
                reason: "Campaign-tagged enquiry subject".to_string(),
                drill_down_prefix: "Google Ads - ".to_string(),
                drill_down_fallback: "Google Ads - unspecified".to_string(),
                capture: CaptureStyle::CampaignId,
                data_source: "email_campaign".to_string(),
            },
            OverrideCategorySpec {
                label: "payment communication".to_string(),
                patterns: vec![
                    "remittance advice".to_string(),
                    "payment released".to_string(),
                    r"\bsoa\b".to_string(),
                    "payment scheduled".to_string(),
                    "routing for approval".to_string(),
                    "outstanding invoice".to_string(),
                    "invoice attached".to_string(),
                ],
                field: MatchField::AnyText,
                source: "Direct".to_string(),
                confidence: 90.0,
                reason: "Payment-related communication (existing customer)".to_string(),
                drill_down_prefix: String::new(),
                drill_down_fallback: "Existing customer".to_string(),
                capture: CaptureStyle::NoCapture,
                data_source: "email_payment".to_string(),
            },
            OverrideCategorySpec {
                label: "repeat customer".to_string(),
                patterns: vec![
                    r"\breorder\b".to_string(),
                    "ordered before".to_string(),
                    "you still have our artwork".to_string(),
                    "same as last time".to_string(),
                    "our previous order".to_string(),
                ],
                field: MatchField::AnyText,
                source: "Direct".to_string(),
                confidence: 85.0,
                reason: "Repeat customer identified".to_string(),
                drill_down_prefix: String::new(),
                drill_down_fallback: "Repeat customer".to_string(),
                capture: CaptureStyle::NoCapture,
                data_source: "email_repeat".to_string(),
            },
            OverrideCategorySpec {
                label: "personal referral".to_string(),
                patterns: vec![
                    r"got your contact from my colleague,?\s+(\w+)".to_string(),
                    r"(\w+) (?:referred me|passed me your details)".to_string(),
                    "was recommended to contact you".to_string(),
                ],
                field: MatchField::Content,
                source: "Referral".to_string(),
                confidence: 80.0,
                reason: "Personal referral mentioned in email".to_string(),
                drill_down_prefix: "Referral from ".to_string(),
                drill_down_fallback: "Referral from colleague".to_string(),
                capture: CaptureStyle::Name,
                data_source: "email_referral".to_string(),
            },
        ]
    }

    fn first_match<'a>(&'a self, lead: &LeadRecord) -> Option<(&'a CompiledOverride, String)> {
        for category in &self.categories {
            for pattern in &category.patterns {
                if let Some(caps) = first_capture(pattern, category.field, lead) {
                    let drill_down = render_drill_down(category, caps.as_deref());
                    return Some((category, drill_down));
                }
            }
        }
        None
    }
}

/// Match a pattern against the configured field, returning `Some` on a
/// match; the inner option carries capture group 1 when present.
fn first_capture(
    pattern: &Regex,
    field: MatchField,
    lead: &LeadRecord,
) -> Option<Option<String>> {
    let texts: &[&str] = match field {
        MatchField::Email => &[&lead.email],
        MatchField::Subject => &[&lead.subject_text],
        MatchField::Content => &[&lead.content_text],
        MatchField::AnyText => &[&lead.subject_text, &lead.content_text],
        MatchField::Keywords => {
            return lead
                .keywords
                .iter()
                .find_map(|k| pattern.captures(k))
                .map(|caps| caps.get(1).map(|g| g.as_str().to_string()));
        }
    };
    for text in texts {
        if let Some(caps) = pattern.captures(text) {
            return Some(caps.get(1).map(|g| g.as_str().to_string()));
        }
    }
    None
}

fn render_drill_down(category: &CompiledOverride, capture: Option<&str>) -> String {
    let Some(raw) = capture else {
        return category.drill_down_fallback.clone();
    };
    let fragment = match category.capture {
        CaptureStyle::CampaignId => raw.trim().to_lowercase().replace(' ', "_"),
        CaptureStyle::Name => capitalize(raw.trim()),
        CaptureStyle::NoCapture => return category.drill_down_fallback.clone(),
    };
    format!("{}{}", category.drill_down_prefix, fragment)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Override correction stage over a compiled category chain
pub struct ContentOverrideEngine {
    table: OverrideTable,
}

impl ContentOverrideEngine {
    /// Create an engine over a compiled override table
    pub fn new(table: OverrideTable) -> Self {
        Self { table }
    }
}

impl AttributionStage for ContentOverrideEngine {
    fn name(&self) -> &'static str {
        "content-override"
    }

    fn apply(
        &self,
        leads: &[LeadRecord],
        mut results: Vec<AttributionResult>,
    ) -> Vec<AttributionResult> {
        for (lead, result) in leads.iter().zip(results.iter_mut()) {
            // Idempotence: a row already corrected by this stage keeps its
            // first correction.
            if result.is_override() {
                continue;
            }
            let Some((category, drill_down)) = self.table.first_match(lead) else {
                continue;
            };

            debug!(
                email = %lead.email,
                category = %category.label,
                source = %category.source,
                "content override"
            );
            result.override_with(
                category.source,
                category.confidence,
                category.reason.clone(),
                drill_down,
                category.data_source.clone(),
            );
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadtrace_domain::ConfidenceLevel;

    fn lead(subject: &str, content: &str) -> LeadRecord {
        LeadRecord {
            email: "buyer@example.com".to_string(),
            messages: vec![],
            products: vec![],
            keywords: vec![],
            subject_text: subject.to_string(),
            content_text: content.to_string(),
            first_contact: None,
            extra: vec![],
        }
    }

    fn run(leads: &[LeadRecord]) -> Vec<AttributionResult> {
        let engine = ContentOverrideEngine::new(OverrideTable::default_table());
        let fresh = leads.iter().map(|_| AttributionResult::unattributed()).collect();
        engine.apply(leads, fresh)
    }

    #[test]
    fn test_campaign_subject_override() {
        let leads = vec![lead("you've got a new enquiry! (lanyard lp)", "")];
        let results = run(&leads);

        assert_eq!(results[0].source(), Source::Ppc);
        assert!(results[0].is_override());
        assert_eq!(results[0].drill_down(), "Google Ads - lanyard_lp");
        assert_eq!(results[0].data_source(), "email_campaign");
        assert_eq!(results[0].confidence_level(), ConfidenceLevel::High);
    }

    #[test]
    fn test_payment_override() {
        let leads = vec![lead("re: remittance advice", "please find attached")];
        let results = run(&leads);

        assert_eq!(results[0].source(), Source::Direct);
        assert_eq!(
            results[0].override_reason(),
            "Payment-related communication (existing customer)"
        );
        assert_eq!(results[0].data_source(), "email_payment");
        assert_eq!(results[0].confidence().value(), 90.0);
    }

    #[test]
    fn test_repeat_customer_override() {
        let leads = vec![lead("hi", "we'd like to reorder, you still have our artwork")];
        let results = run(&leads);

        assert_eq!(results[0].source(), Source::Direct);
        assert_eq!(results[0].override_reason(), "Repeat customer identified");
        assert_eq!(results[0].data_source(), "email_repeat");
    }

    #[test]
    fn test_referral_override_captures_name() {
        let leads = vec![lead(
            "enquiry",
            "hi, got your contact from my colleague, sarah. can you quote?",
        )];
        let results = run(&leads);

        assert_eq!(results[0].source(), Source::Referral);
        assert_eq!(results[0].drill_down(), "Referral from Sarah");
        assert_eq!(results[0].data_source(), "email_referral");
    }

    #[test]
    fn test_referral_without_name_uses_fallback() {
        let leads = vec![lead("enquiry", "i was recommended to contact you")];
        let results = run(&leads);

        assert_eq!(results[0].source(), Source::Referral);
        assert_eq!(results[0].drill_down(), "Referral from colleague");
    }

    #[test]
    fn test_categories_are_mutually_exclusive() {
        // Matches both the campaign and payment categories; the earlier
        // category in the chain wins.
        let leads = vec![lead(
            "you've got a new enquiry! (badge lp)",
            "remittance advice attached",
        )];
        let results = run(&leads);

        assert_eq!(results[0].source(), Source::Ppc);
        assert_eq!(results[0].data_source(), "email_campaign");
    }

    #[test]
    fn test_override_preserves_original_source() {
        let leads = vec![lead("re: remittance advice", "")];
        let engine = ContentOverrideEngine::new(OverrideTable::default_table());

        let mut seeded = AttributionResult::unattributed();
        seeded.attribute(
            Source::Seo,
            ConfidenceScore::new(70.0),
            "Matched rule: organic ranking keyword",
            AttributionResult::SOURCE_PATTERN,
        );

        let results = engine.apply(&leads, vec![seeded]);
        assert_eq!(results[0].source(), Source::Direct);
        assert_eq!(results[0].original_source(), Some(Source::Seo));
    }

    #[test]
    fn test_reapplying_changes_nothing() {
        let leads = vec![lead("you've got a new enquiry! (lanyard lp)", "")];
        let engine = ContentOverrideEngine::new(OverrideTable::default_table());

        let once = engine.apply(&leads, vec![AttributionResult::unattributed()]);
        let twice = engine.apply(&leads, once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_phrase_no_override() {
        let leads = vec![lead("quote request", "how much for 500 pens?")];
        let results = run(&leads);

        assert_eq!(results[0].source(), Source::Unknown);
        assert!(!results[0].is_override());
        assert!(results[0].override_reason().is_empty());
    }
}
