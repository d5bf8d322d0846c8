//! Human-readable report rendering

use crate::summary::{AttributionSummary, ConfidenceStats};
use leadtrace_domain::Source;
use std::fmt::{self, Write};

/// Render the attribution report for a computed summary
///
/// Section order and numbering are fixed; an empty batch still renders every
/// section header so downstream diffing stays stable.
pub fn render_report(summary: &AttributionSummary) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, summary);
    out
}

/// Write the attribution report into any `fmt::Write` sink
pub fn write_report<W: Write>(out: &mut W, summary: &AttributionSummary) -> fmt::Result {
    writeln!(out, "LEAD ATTRIBUTION REPORT")?;
    writeln!(out, "=======================")?;
    writeln!(out, "Total leads analyzed: {}", summary.total)?;
    writeln!(
        out,
        "Attributed: {} ({:.1}%)",
        summary.attributed,
        summary.percentage(summary.attributed)
    )?;
    writeln!(out)?;

    writeln!(out, "1. SOURCE BREAKDOWN")?;
    for (source, count) in &summary.source_counts {
        match summary.confidence_stats(*source) {
            Some(stats) if *count > 0 => writeln!(
                out,
                "   {}: {} ({:.1}%), avg confidence {:.1}",
                source,
                count,
                summary.percentage(*count),
                stats.average
            )?,
            _ => writeln!(
                out,
                "   {}: {} ({:.1}%)",
                source,
                count,
                summary.percentage(*count)
            )?,
        }
    }
    writeln!(out)?;

    writeln!(out, "2. CONFIDENCE LEVELS")?;
    for (level, count) in &summary.level_counts {
        writeln!(
            out,
            "   {}: {} ({:.1}%)",
            level,
            count,
            summary.percentage(*count)
        )?;
    }
    writeln!(out)?;

    writeln!(out, "3. TOP PRODUCTS BY SOURCE")?;
    if summary.top_products.is_empty() {
        writeln!(out, "   (no product mentions)")?;
    }
    for (source, products) in &summary.top_products {
        writeln!(out, "   {}:", source)?;
        for (product, count) in products {
            writeln!(out, "      {} ({})", product, count)?;
        }
    }
    writeln!(out)?;

    writeln!(out, "4. TIME PATTERNS")?;
    for (day, count) in &summary.day_counts {
        writeln!(out, "   {}: {}", day, count)?;
    }
    match summary.peak_hour {
        Some(hour) => writeln!(out, "   Peak hour: {:02}:00", hour)?,
        None => writeln!(out, "   Peak hour: n/a")?,
    }
    writeln!(
        out,
        "   Business hours (9-17): {} | After hours: {}",
        summary.business_hours, summary.after_hours
    )?;
    writeln!(
        out,
        "   Weekday: {} | Weekend: {}",
        summary.weekday, summary.weekend
    )?;
    writeln!(out)?;

    writeln!(out, "5. DATA SOURCES")?;
    for (tag, count) in &summary.data_source_counts {
        writeln!(out, "   {}: {}", tag, count)?;
    }
    writeln!(out)?;

    writeln!(out, "6. KEY INSIGHTS")?;
    for insight in key_insights(summary) {
        writeln!(out, "   - {}", insight)?;
    }

    Ok(())
}

fn key_insights(summary: &AttributionSummary) -> Vec<String> {
    let mut insights = Vec::new();
    if summary.total == 0 {
        insights.push("No leads in the analysis period".to_string());
        return insights;
    }

    if let Some((source, count)) = summary
        .source_counts
        .iter()
        .filter(|(s, _)| s.is_attributed())
        .max_by_key(|(_, n)| *n)
        .filter(|(_, n)| *n > 0)
    {
        insights.push(format!(
            "Top attributed source: {} with {} leads ({:.1}%)",
            source,
            count,
            summary.percentage(*count)
        ));
    } else {
        insights.push("No leads could be attributed".to_string());
    }

    let high = summary
        .level_counts
        .first()
        .map(|(_, n)| *n)
        .unwrap_or(0);
    insights.push(format!(
        "High confidence attributions: {} ({:.1}%)",
        high,
        summary.percentage(high)
    ));

    let unknown = summary.source_count(Source::Unknown);
    if unknown > 0 {
        insights.push(format!(
            "Unattributed leads: {} ({:.1}%)",
            unknown,
            summary.percentage(unknown)
        ));
    }
    if summary.override_count > 0 {
        insights.push(format!(
            "Content overrides applied: {}",
            summary.override_count
        ));
    }
    if summary.ga4_validated_count > 0 {
        insights.push(format!(
            "Traffic-validated attributions: {}",
            summary.ga4_validated_count
        ));
    }

    insights
}

impl AttributionSummary {
    /// Confidence statistics for `source`, `None` when it has no leads
    pub fn confidence_stats(&self, source: Source) -> Option<&ConfidenceStats> {
        self.source_confidence
            .iter()
            .find(|(s, _)| *s == source)
            .map(|(_, stats)| stats)
    }
}
