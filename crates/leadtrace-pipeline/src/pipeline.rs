//! Batch orchestration
//!
//! Runs the fixed stage sequence over an ingested batch: pattern
//! classification, content override, traffic correlation. Each stage
//! consumes the previous snapshot of results and returns the next, so
//! stages never observe each other's partial writes.

use crate::error::PipelineError;
use crate::ingest;
use crate::table;
use leadtrace_classifier::{ContentOverrideEngine, OverrideTable, PatternClassifier, RuleTable};
use leadtrace_correlator::{CorrelatorConfig, TrafficCorrelator};
use leadtrace_domain::{
    AttributionResult, AttributionStage, LeadRecord, TrafficSample,
};
use leadtrace_extractor::{EvidenceExtractor, ExtractorConfig, RawLead};
use leadtrace_report::AttributionSummary;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// File inputs for one attribution run
#[derive(Debug, Clone)]
pub struct AttributionRequest {
    /// Exported helpdesk lead table
    pub leads: PathBuf,
    /// Zero or more traffic feed exports, merged before correlation
    pub feeds: Vec<PathBuf>,
}

impl AttributionRequest {
    /// A run over a lead table with no traffic feeds
    pub fn leads_only(leads: impl Into<PathBuf>) -> Self {
        Self {
            leads: leads.into(),
            feeds: Vec::new(),
        }
    }
}

/// The finished output of one batch
pub struct BatchOutcome {
    /// Normalized leads, in ingestion order
    pub leads: Vec<LeadRecord>,
    /// One result per lead, same order
    pub results: Vec<AttributionResult>,
    /// Aggregated view of the batch
    pub summary: AttributionSummary,
}

impl BatchOutcome {
    /// Number of leads attributed to a source other than Unknown
    pub fn attributed_count(&self) -> usize {
        self.summary.attributed
    }
}

/// The attribution pipeline with its fixed stage sequence
pub struct AttributionPipeline {
    extractor: EvidenceExtractor,
    stages: Vec<Box<dyn AttributionStage>>,
}

impl AttributionPipeline {
    /// The standard pipeline: built-in rule tables, default windows
    pub fn standard(feed: Vec<TrafficSample>) -> Self {
        Self::new(
            ExtractorConfig::default(),
            RuleTable::default_table(),
            OverrideTable::default_table(),
            CorrelatorConfig::default(),
            feed,
        )
    }

    /// Assemble a pipeline from explicit parts
    pub fn new(
        extractor_config: ExtractorConfig,
        rules: RuleTable,
        overrides: OverrideTable,
        correlator_config: CorrelatorConfig,
        feed: Vec<TrafficSample>,
    ) -> Self {
        let stages: Vec<Box<dyn AttributionStage>> = vec![
            Box::new(PatternClassifier::new(rules)),
            Box::new(ContentOverrideEngine::new(overrides)),
            Box::new(TrafficCorrelator::new(correlator_config, feed)),
        ];
        Self {
            extractor: EvidenceExtractor::new(extractor_config),
            stages,
        }
    }

    /// Run the full batch over raw ingested leads
    pub fn run(&self, raw: Vec<RawLead>) -> BatchOutcome {
        let leads = self.extractor.extract_batch(raw);
        let mut results: Vec<AttributionResult> =
            leads.iter().map(|_| AttributionResult::unattributed()).collect();

        for stage in &self.stages {
            info!(stage = stage.name(), leads = leads.len(), "running stage");
            results = stage.apply(&leads, results);
            debug_assert_eq!(results.len(), leads.len());
        }

        let summary = AttributionSummary::compute(&leads, &results);
        info!(
            total = summary.total,
            attributed = summary.attributed,
            "batch finished"
        );
        BatchOutcome {
            leads,
            results,
            summary,
        }
    }
}

/// Run attribution end to end from files
///
/// Returns the number of attributed leads. Any batch-level failure is
/// logged and reported as zero; a caller polling this from a scheduler gets
/// a number either way.
pub fn run_attribution(request: &AttributionRequest) -> usize {
    match run_attribution_files(request) {
        Ok(outcome) => outcome.attributed_count(),
        Err(e) => {
            error!(error = %e, "attribution run failed");
            0
        }
    }
}

/// File-driven batch run, surfacing errors to the caller
///
/// A missing lead table is an error; a missing traffic feed only downgrades
/// the correlator, so the batch still runs.
pub fn run_attribution_files(
    request: &AttributionRequest,
) -> Result<BatchOutcome, PipelineError> {
    let raw = ingest::read_leads(&request.leads)?;
    let feed = ingest::read_traffic_feeds(&request.feeds);
    Ok(AttributionPipeline::standard(feed).run(raw))
}

/// Header of the per-lead results table
pub const RESULT_COLUMNS: [&str; 14] = [
    "email",
    "first_contact",
    "products",
    "source",
    "original_source",
    "confidence",
    "confidence_level",
    "detail",
    "drill_down",
    "data_source",
    "email_content_override",
    "override_reason",
    "ga4_validated",
    "ga4_sessions",
];

/// Per-lead result rows for tabular export, header row first
///
/// Unrecognized input columns pass through after the fixed columns, in
/// first-seen order.
pub fn result_rows(outcome: &BatchOutcome) -> Vec<Vec<String>> {
    let mut extra_columns: Vec<&str> = Vec::new();
    for lead in &outcome.leads {
        for (name, _) in &lead.extra {
            if !extra_columns.contains(&name.as_str()) {
                extra_columns.push(name);
            }
        }
    }

    let mut rows = Vec::with_capacity(outcome.leads.len() + 1);
    rows.push(
        RESULT_COLUMNS
            .iter()
            .copied()
            .chain(extra_columns.iter().copied())
            .map(str::to_string)
            .collect(),
    );
    for (lead, result) in outcome.leads.iter().zip(outcome.results.iter()) {
        let mut row = vec![
            lead.email.clone(),
            lead.first_contact
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            lead.products.join(";"),
            result.source().to_string(),
            result
                .original_source()
                .map(|s| s.to_string())
                .unwrap_or_default(),
            format!("{:.1}", result.confidence().value()),
            result.confidence_level().to_string(),
            result.detail().to_string(),
            result.drill_down().to_string(),
            result.data_source().to_string(),
            result.is_override().to_string(),
            result.override_reason().to_string(),
            result.ga4_validated().to_string(),
            result.ga4_sessions().to_string(),
        ];
        for name in &extra_columns {
            row.push(
                lead.extra
                    .iter()
                    .find(|(n, _)| n.as_str() == *name)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default(),
            );
        }
        rows.push(row);
    }
    rows
}

/// Write the per-lead results table to a file
pub fn write_results(outcome: &BatchOutcome, path: &Path) -> Result<(), PipelineError> {
    let text = table::render(&result_rows(outcome));
    std::fs::write(path, text)?;
    info!(path = %path.display(), rows = outcome.leads.len(), "results written");
    Ok(())
}

/// Write the batch summary as a `[section, label, count, share]` table
pub fn write_summary(outcome: &BatchOutcome, path: &Path) -> Result<(), PipelineError> {
    let mut rows = vec![vec![
        "section".to_string(),
        "label".to_string(),
        "count".to_string(),
        "share".to_string(),
    ]];
    rows.extend(outcome.summary.table_rows());
    std::fs::write(path, table::render(&rows))?;
    info!(path = %path.display(), "summary written");
    Ok(())
}
