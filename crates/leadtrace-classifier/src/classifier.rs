//! First-pass pattern attribution stage

use crate::rules::RuleTable;
use leadtrace_domain::{
    AttributionResult, AttributionStage, ConfidenceScore, LeadRecord, Source,
};
use tracing::debug;

/// First-pass attribution over a compiled rule table
///
/// Evaluates the table's rule sets in priority order; the first set with a
/// matching member decides the source, and the winning rule's weight seeds
/// the confidence. Leads with no matching rule stay Unknown at zero but are
/// still stamped with this stage's provenance tag, ready for later stages
/// to pick up.
pub struct PatternClassifier {
    table: RuleTable,
}

impl PatternClassifier {
    /// Create a classifier over a compiled rule table
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }
}

impl AttributionStage for PatternClassifier {
    fn name(&self) -> &'static str {
        "pattern-classifier"
    }

    fn apply(
        &self,
        leads: &[LeadRecord],
        mut results: Vec<AttributionResult>,
    ) -> Vec<AttributionResult> {
        for (lead, result) in leads.iter().zip(results.iter_mut()) {
            let Some(m) = self.table.first_match(lead) else {
                debug!(email = %lead.email, "no pattern matched, left Unknown");
                result.attribute(
                    Source::Unknown,
                    ConfidenceScore::ZERO,
                    "",
                    AttributionResult::SOURCE_PATTERN,
                );
                continue;
            };

            debug!(
                email = %lead.email,
                source = %m.source,
                rule = %m.rule.label,
                "pattern attribution"
            );
            result.attribute(
                m.source,
                ConfidenceScore::new(m.rule.weight),
                format!("Matched rule: {}", m.rule.label),
                AttributionResult::SOURCE_PATTERN,
            );
        }
        results
    }
}
