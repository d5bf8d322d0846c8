//! Batch summary computation

use chrono::{Datelike, Timelike, Weekday};
use leadtrace_domain::{
    AttributionResult, ConfidenceLevel, LeadRecord, Source,
};
use std::collections::HashMap;
use tracing::debug;

/// Days in report order
const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Business hours span: 09:00 inclusive to 17:00 exclusive
const BUSINESS_HOURS: std::ops::Range<u32> = 9..17;

/// Products listed per source in the report
const TOP_PRODUCTS: usize = 5;

/// Confidence statistics over one source's leads
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceStats {
    /// Mean confidence score
    pub average: f64,
    /// Lowest score among the source's leads
    pub min: f64,
    /// Highest score among the source's leads
    pub max: f64,
    /// Share of the source's leads at High confidence, in percent
    pub high_share: f64,
}

/// Aggregated view of one attribution batch
///
/// Every field is derived; two identical batches always produce identical
/// summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionSummary {
    /// Total leads in the batch
    pub total: usize,

    /// Leads with a source other than Unknown
    pub attributed: usize,

    /// Per-source lead counts, in fixed source order
    pub source_counts: Vec<(Source, usize)>,

    /// Confidence statistics per source with at least one lead
    pub source_confidence: Vec<(Source, ConfidenceStats)>,

    /// Per-level lead counts, strongest level first
    pub level_counts: Vec<(ConfidenceLevel, usize)>,

    /// Most-mentioned products per attributed source (top five, ties by
    /// name)
    pub top_products: Vec<(Source, Vec<(String, usize)>)>,

    /// Lead counts per day of week, Monday first
    pub day_counts: Vec<(Weekday, usize)>,

    /// Lead counts per hour of day
    pub hour_counts: [usize; 24],

    /// Busiest hour, `None` when no lead had a parseable timestamp
    pub peak_hour: Option<u32>,

    /// Leads arriving 09:00-17:00
    pub business_hours: usize,

    /// Leads arriving outside business hours
    pub after_hours: usize,

    /// Leads arriving Monday-Friday
    pub weekday: usize,

    /// Leads arriving Saturday or Sunday
    pub weekend: usize,

    /// Lead counts per provenance tag, tag-sorted
    pub data_source_counts: Vec<(String, usize)>,

    /// Leads corrected by the content override stage
    pub override_count: usize,

    /// Leads validated against the external traffic feed
    pub ga4_validated_count: usize,
}

impl AttributionSummary {
    /// Compute the summary for a batch; `results[i]` belongs to `leads[i]`
    pub fn compute(leads: &[LeadRecord], results: &[AttributionResult]) -> Self {
        debug_assert_eq!(leads.len(), results.len());

        let mut source_map: HashMap<Source, usize> = HashMap::new();
        let mut level_map: HashMap<ConfidenceLevel, usize> = HashMap::new();
        let mut product_map: HashMap<Source, HashMap<String, usize>> = HashMap::new();
        let mut data_source_map: HashMap<String, usize> = HashMap::new();
        let mut day_map: HashMap<Weekday, usize> = HashMap::new();
        let mut hour_counts = [0usize; 24];
        let mut business_hours = 0;
        let mut after_hours = 0;
        let mut weekday = 0;
        let mut weekend = 0;
        let mut override_count = 0;
        let mut ga4_validated_count = 0;

        let mut score_map: HashMap<Source, Vec<f64>> = HashMap::new();
        let mut high_map: HashMap<Source, usize> = HashMap::new();

        for (lead, result) in leads.iter().zip(results.iter()) {
            *source_map.entry(result.source()).or_default() += 1;
            score_map
                .entry(result.source())
                .or_default()
                .push(result.confidence().value());
            if result.confidence_level() == ConfidenceLevel::High {
                *high_map.entry(result.source()).or_default() += 1;
            }
            *level_map.entry(result.confidence_level()).or_default() += 1;
            *data_source_map
                .entry(result.data_source().to_string())
                .or_default() += 1;

            let products = product_map.entry(result.source()).or_default();
            for product in &lead.products {
                *products.entry(product.clone()).or_default() += 1;
            }

            if result.is_override() {
                override_count += 1;
            }
            if result.ga4_validated() {
                ga4_validated_count += 1;
            }

            if let Some(contact) = lead.first_contact {
                let day = contact.weekday();
                *day_map.entry(day).or_default() += 1;
                let hour = contact.hour();
                hour_counts[hour as usize] += 1;
                if BUSINESS_HOURS.contains(&hour) {
                    business_hours += 1;
                } else {
                    after_hours += 1;
                }
                if matches!(day, Weekday::Sat | Weekday::Sun) {
                    weekend += 1;
                } else {
                    weekday += 1;
                }
            }
        }

        let attributed = leads
            .iter()
            .zip(results.iter())
            .filter(|(_, r)| r.source().is_attributed())
            .count();

        let source_counts = Source::PRIORITY_ORDER
            .iter()
            .map(|s| (*s, source_map.get(s).copied().unwrap_or(0)))
            .collect();

        let mut source_confidence = Vec::new();
        for source in Source::PRIORITY_ORDER {
            let Some(scores) = score_map.get(&source) else {
                continue;
            };
            let sum: f64 = scores.iter().sum();
            let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
            let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let high = high_map.get(&source).copied().unwrap_or(0);
            source_confidence.push((
                source,
                ConfidenceStats {
                    average: sum / scores.len() as f64,
                    min,
                    max,
                    high_share: high as f64 * 100.0 / scores.len() as f64,
                },
            ));
        }
        let level_counts = ConfidenceLevel::ALL
            .iter()
            .map(|l| (*l, level_map.get(l).copied().unwrap_or(0)))
            .collect();

        let mut top_products = Vec::new();
        for source in Source::PRIORITY_ORDER {
            let Some(products) = product_map.get(&source) else {
                continue;
            };
            if products.is_empty() {
                continue;
            }
            let mut ranked: Vec<(String, usize)> =
                products.iter().map(|(p, n)| (p.clone(), *n)).collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            ranked.truncate(TOP_PRODUCTS);
            top_products.push((source, ranked));
        }

        let day_counts = WEEK
            .iter()
            .map(|d| (*d, day_map.get(d).copied().unwrap_or(0)))
            .collect();
        let peak_hour = hour_counts
            .iter()
            .enumerate()
            .filter(|(_, n)| **n > 0)
            .max_by_key(|(_, n)| **n)
            .map(|(h, _)| h as u32);

        let mut data_source_counts: Vec<(String, usize)> =
            data_source_map.into_iter().collect();
        data_source_counts.sort();

        debug!(total = leads.len(), attributed, "summary computed");

        Self {
            total: leads.len(),
            attributed,
            source_counts,
            source_confidence,
            level_counts,
            top_products,
            day_counts,
            hour_counts,
            peak_hour,
            business_hours,
            after_hours,
            weekday,
            weekend,
            data_source_counts,
            override_count,
            ga4_validated_count,
        }
    }

    /// Percentage of `part` over this batch's total, 0 for an empty batch
    pub fn percentage(&self, part: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        part as f64 * 100.0 / self.total as f64
    }

    /// Count of leads attributed to `source`
    pub fn source_count(&self, source: Source) -> usize {
        self.source_counts
            .iter()
            .find(|(s, _)| *s == source)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// Flatten the summary into `[section, label, count, share]` rows for
    /// tabular export
    ///
    /// Row order mirrors the text report so the two stay diffable against
    /// each other.
    pub fn table_rows(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        let mut push = |section: &str, label: String, count: usize, share: f64| {
            rows.push(vec![
                section.to_string(),
                label,
                count.to_string(),
                format!("{:.1}", share),
            ]);
        };

        push(
            "totals",
            "total".to_string(),
            self.total,
            if self.total > 0 { 100.0 } else { 0.0 },
        );
        push(
            "totals",
            "attributed".to_string(),
            self.attributed,
            self.percentage(self.attributed),
        );
        for (source, count) in &self.source_counts {
            push(
                "source",
                source.as_str().to_string(),
                *count,
                self.percentage(*count),
            );
        }
        for (level, count) in &self.level_counts {
            push(
                "confidence",
                level.as_str().to_string(),
                *count,
                self.percentage(*count),
            );
        }
        for (day, count) in &self.day_counts {
            push("day", day.to_string(), *count, self.percentage(*count));
        }
        for (tag, count) in &self.data_source_counts {
            push("data_source", tag.clone(), *count, self.percentage(*count));
        }
        push(
            "overrides",
            "content_override".to_string(),
            self.override_count,
            self.percentage(self.override_count),
        );
        push(
            "overrides",
            "ga4_validated".to_string(),
            self.ga4_validated_count,
            self.percentage(self.ga4_validated_count),
        );

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use leadtrace_domain::ConfidenceScore;

    fn lead(products: &[&str], ymd_hms: Option<(i32, u32, u32, u32)>) -> LeadRecord {
        LeadRecord {
            email: "buyer@example.com".to_string(),
            messages: vec![],
            products: products.iter().map(|p| p.to_string()).collect(),
            keywords: vec![],
            subject_text: String::new(),
            content_text: String::new(),
            first_contact: ymd_hms
                .map(|(y, m, d, h)| Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()),
            extra: vec![],
        }
    }

    fn result(source: Source, confidence: f64) -> AttributionResult {
        let mut r = AttributionResult::unattributed();
        if source != Source::Unknown {
            r.attribute(
                source,
                ConfidenceScore::new(confidence),
                "Matched rule: test",
                AttributionResult::SOURCE_PATTERN,
            );
        }
        r
    }

    #[test]
    fn test_empty_batch() {
        let summary = AttributionSummary::compute(&[], &[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.attributed, 0);
        assert_eq!(summary.peak_hour, None);
        assert_eq!(summary.percentage(0), 0.0);
    }

    #[test]
    fn test_source_and_level_counts() {
        // 2024-06-10 was a Monday
        let leads = vec![
            lead(&[], Some((2024, 6, 10, 10))),
            lead(&[], Some((2024, 6, 10, 14))),
            lead(&[], None),
        ];
        let results = vec![
            result(Source::Ppc, 85.0),
            result(Source::Seo, 60.0),
            result(Source::Unknown, 0.0),
        ];

        let summary = AttributionSummary::compute(&leads, &results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.attributed, 2);
        assert_eq!(summary.source_count(Source::Ppc), 1);
        assert_eq!(summary.source_count(Source::Unknown), 1);
        assert_eq!(
            summary.level_counts,
            vec![
                (ConfidenceLevel::High, 1),
                (ConfidenceLevel::Medium, 1),
                (ConfidenceLevel::Low, 0),
                (ConfidenceLevel::Unknown, 1),
            ]
        );
    }

    #[test]
    fn test_source_confidence_stats() {
        let leads = vec![lead(&[], None), lead(&[], None), lead(&[], None)];
        let results = vec![
            result(Source::Ppc, 95.0),
            result(Source::Ppc, 65.0),
            result(Source::Seo, 70.0),
        ];

        let summary = AttributionSummary::compute(&leads, &results);
        let (source, stats) = &summary.source_confidence[0];
        assert_eq!(*source, Source::Ppc);
        assert_eq!(stats.average, 80.0);
        assert_eq!(stats.min, 65.0);
        assert_eq!(stats.max, 95.0);
        assert_eq!(stats.high_share, 50.0);
    }

    #[test]
    fn test_top_products_ranked_and_capped() {
        let leads: Vec<LeadRecord> = (0..7)
            .map(|i| {
                let p = format!("product-{}", i % 6);
                lead(&[&p, "lanyards"], None)
            })
            .collect();
        let results: Vec<AttributionResult> =
            (0..7).map(|_| result(Source::Seo, 70.0)).collect();

        let summary = AttributionSummary::compute(&leads, &results);
        let (source, ranked) = &summary.top_products[0];
        assert_eq!(*source, Source::Seo);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0], ("lanyards".to_string(), 7));
        // Ties broken by name
        assert_eq!(ranked[1], ("product-0".to_string(), 2));
    }

    #[test]
    fn test_time_patterns() {
        let leads = vec![
            lead(&[], Some((2024, 6, 10, 10))), // Monday, business hours
            lead(&[], Some((2024, 6, 10, 10))), // Monday, business hours
            lead(&[], Some((2024, 6, 15, 20))), // Saturday, after hours
        ];
        let results = vec![
            result(Source::Unknown, 0.0),
            result(Source::Unknown, 0.0),
            result(Source::Unknown, 0.0),
        ];

        let summary = AttributionSummary::compute(&leads, &results);
        assert_eq!(summary.day_counts[0], (Weekday::Mon, 2));
        assert_eq!(summary.day_counts[5], (Weekday::Sat, 1));
        assert_eq!(summary.peak_hour, Some(10));
        assert_eq!(summary.business_hours, 2);
        assert_eq!(summary.after_hours, 1);
        assert_eq!(summary.weekday, 2);
        assert_eq!(summary.weekend, 1);
    }

    #[test]
    fn test_data_source_breakdown_sorted() {
        let leads = vec![lead(&[], None), lead(&[], None), lead(&[], None)];
        let mut reattributed = result(Source::Unknown, 0.0);
        reattributed.reattribute(
            Source::Ppc,
            ConfidenceScore::new(80.0),
            "GA4 PPC detection: 10 paid sessions from google",
            AttributionResult::SOURCE_GA4_PPC,
        );
        let results = vec![
            result(Source::Seo, 70.0),
            reattributed,
            result(Source::Unknown, 0.0),
        ];

        let summary = AttributionSummary::compute(&leads, &results);
        assert_eq!(
            summary.data_source_counts,
            vec![
                ("ga4_ppc".to_string(), 1),
                ("pattern".to_string(), 1),
                ("unknown".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_table_rows_cover_all_sections() {
        let leads = vec![lead(&[], Some((2024, 6, 10, 10))), lead(&[], None)];
        let results = vec![result(Source::Ppc, 85.0), result(Source::Unknown, 0.0)];

        let rows = AttributionSummary::compute(&leads, &results).table_rows();
        assert_eq!(rows[0], vec!["totals", "total", "2", "100.0"]);
        assert_eq!(rows[1], vec!["totals", "attributed", "1", "50.0"]);
        assert!(rows
            .iter()
            .any(|r| r[0] == "source" && r[1] == "PPC" && r[2] == "1"));
        assert!(rows.iter().any(|r| r[0] == "day" && r[1] == "Mon"));
        assert!(rows.iter().any(|r| r[0] == "data_source" && r[1] == "pattern"));
    }

    #[test]
    fn test_determinism() {
        let leads = vec![
            lead(&["lanyards", "badges"], Some((2024, 6, 10, 10))),
            lead(&["badges"], Some((2024, 6, 11, 9))),
        ];
        let results = vec![result(Source::Seo, 70.0), result(Source::Ppc, 85.0)];

        let a = AttributionSummary::compute(&leads, &results);
        let b = AttributionSummary::compute(&leads, &results);
        assert_eq!(a, b);
    }
}
