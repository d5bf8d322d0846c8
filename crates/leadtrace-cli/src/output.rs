//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use leadtrace_pipeline::{result_rows, BatchOutcome};
use leadtrace_report::AttributionSummary;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a batch outcome: the summary plus, optionally, every row.
    pub fn format_outcome(&self, outcome: &BatchOutcome, show_rows: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_outcome_json(outcome, show_rows),
            OutputFormat::Table => Ok(self.format_outcome_table(outcome, show_rows)),
            OutputFormat::Quiet => Ok(format!(
                "{}/{}",
                outcome.summary.attributed, outcome.summary.total
            )),
        }
    }

    fn format_outcome_json(&self, outcome: &BatchOutcome, show_rows: bool) -> Result<String> {
        let summary = &outcome.summary;
        let mut value = serde_json::json!({
            "total": summary.total,
            "attributed": summary.attributed,
            "sources": summary.source_counts.iter()
                .map(|(s, n)| serde_json::json!({ "source": s.to_string(), "count": n }))
                .collect::<Vec<_>>(),
            "confidence_levels": summary.level_counts.iter()
                .map(|(l, n)| serde_json::json!({ "level": l.to_string(), "count": n }))
                .collect::<Vec<_>>(),
            "overrides": summary.override_count,
            "traffic_validated": summary.ga4_validated_count,
        });

        if show_rows {
            let rows: Vec<serde_json::Value> = outcome
                .leads
                .iter()
                .zip(outcome.results.iter())
                .map(|(lead, result)| {
                    serde_json::json!({
                        "email": lead.email,
                        "source": result.source().to_string(),
                        "original_source": result.original_source().map(|s| s.to_string()),
                        "confidence": result.confidence().value(),
                        "confidence_level": result.confidence_level().to_string(),
                        "detail": result.detail(),
                        "drill_down": result.drill_down(),
                        "data_source": result.data_source(),
                        "email_content_override": result.is_override(),
                        "override_reason": result.override_reason(),
                        "ga4_validated": result.ga4_validated(),
                        "ga4_sessions": result.ga4_sessions(),
                    })
                })
                .collect();
            value["leads"] = serde_json::Value::Array(rows);
        }

        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn format_outcome_table(&self, outcome: &BatchOutcome, show_rows: bool) -> String {
        let mut out = self.format_summary_table(&outcome.summary);
        if show_rows && !outcome.leads.is_empty() {
            out.push('\n');
            out.push_str(&self.format_rows_table(outcome));
        }
        out
    }

    /// Format the batch summary as a source breakdown table.
    pub fn format_summary_table(&self, summary: &AttributionSummary) -> String {
        if summary.total == 0 {
            return self.colorize("No leads found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Source", "Leads", "Share"]);
        for (source, count) in &summary.source_counts {
            builder.push_record([
                source.to_string(),
                count.to_string(),
                format!("{:.1}%", summary.percentage(*count)),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!(
            "{}\n{} attributed of {} leads",
            table, summary.attributed, summary.total
        )
    }

    fn format_rows_table(&self, outcome: &BatchOutcome) -> String {
        let rows = result_rows(outcome);
        let mut builder = Builder::default();
        // Columns that read well at terminal width
        builder.push_record(["Email", "Source", "Confidence", "Level", "Drill-down"]);
        for row in rows.iter().skip(1) {
            builder.push_record([
                row[0].as_str(),
                row[3].as_str(),
                row[5].as_str(),
                row[6].as_str(),
                row[8].as_str(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadtrace_pipeline::AttributionPipeline;
    use leadtrace_extractor::{RawLead, RawTicket};

    fn outcome() -> BatchOutcome {
        let raw = vec![RawLead {
            email: "a@x.com".to_string(),
            tickets: vec![RawTicket {
                subject: "You've Got a New Enquiry! (Lanyard LP)".to_string(),
                content: String::new(),
                timestamp: "2024-06-10 10:00:00".to_string(),
            }],
            products: String::new(),
            extra: vec![],
        }];
        AttributionPipeline::standard(vec![]).run(raw)
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_outcome(&outcome(), false).unwrap();
        assert!(output.contains("Source"));
        assert!(output.contains("PPC"));
        assert!(output.contains("1 attributed of 1 leads"));
    }

    #[test]
    fn test_table_with_rows() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_outcome(&outcome(), true).unwrap();
        assert!(output.contains("a@x.com"));
        assert!(output.contains("Google Ads - lanyard_lp"));
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_outcome(&outcome(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["leads"][0]["source"], "PPC");
        assert_eq!(value["leads"][0]["email_content_override"], true);
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_outcome(&outcome(), false).unwrap();
        assert_eq!(output, "1/1");
    }

    #[test]
    fn test_empty_batch() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let empty = AttributionPipeline::standard(vec![]).run(vec![]);
        let output = formatter.format_outcome(&empty, false).unwrap();
        assert!(output.contains("No leads found"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("done"), "✓ done");
    }
}
