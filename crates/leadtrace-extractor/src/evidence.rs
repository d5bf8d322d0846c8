//! Core evidence extraction

use crate::config::ExtractorConfig;
use crate::keywords::extract_keywords;
use crate::types::RawLead;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use leadtrace_domain::{LeadRecord, TicketMessage};
use tracing::debug;

/// Timestamp formats accepted from evidence providers, tried in order
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M",
];

/// Parse a provider timestamp leniently; `None` when unparsable
///
/// Absence of a parseable timestamp is neutral "no time evidence", never an
/// error.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    // Date-only fallback, midnight UTC
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }

    None
}

/// The extractor turns raw lead rows into normalized [`LeadRecord`]s
pub struct EvidenceExtractor {
    config: ExtractorConfig,
}

impl EvidenceExtractor {
    /// Create an extractor with the given configuration
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extract normalized evidence from one raw lead
    ///
    /// Pure transform: no side effects, and missing fields degrade to empty
    /// strings / `None` rather than failing.
    pub fn extract(&self, raw: RawLead) -> LeadRecord {
        let email = raw.email.trim().to_lowercase();

        let messages: Vec<TicketMessage> = raw
            .tickets
            .iter()
            .map(|t| TicketMessage {
                subject: normalize_text(&t.subject, self.config.max_content_length),
                content: normalize_text(&t.content, self.config.max_content_length),
                timestamp: parse_timestamp(&t.timestamp),
            })
            .collect();

        let subject_text = join_nonempty(messages.iter().map(|m| m.subject.as_str()));
        let content_text = join_nonempty(messages.iter().map(|m| m.content.as_str()));
        let first_contact = messages.iter().filter_map(|m| m.timestamp).min();

        let products: Vec<String> = raw
            .products
            .split(';')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        // Keywords come from product mentions and subjects, matching the
        // organic/paid keyword overlap checks downstream
        let mut seen = std::collections::HashSet::new();
        let mut keywords = Vec::new();
        for text in products.iter().map(String::as_str).chain([subject_text.as_str()]) {
            for keyword in extract_keywords(text, self.config.phrase_window) {
                if seen.insert(keyword.clone()) {
                    keywords.push(keyword);
                }
            }
        }
        keywords.truncate(self.config.max_keywords);

        debug!(
            email = %email,
            messages = messages.len(),
            keywords = keywords.len(),
            has_timestamp = first_contact.is_some(),
            "extracted lead evidence"
        );

        LeadRecord {
            email,
            messages,
            products,
            keywords,
            subject_text,
            content_text,
            first_contact,
            extra: raw.extra,
        }
    }

    /// Extract a whole batch
    pub fn extract_batch(&self, raws: Vec<RawLead>) -> Vec<LeadRecord> {
        raws.into_iter().map(|raw| self.extract(raw)).collect()
    }
}

fn normalize_text(raw: &str, max_len: usize) -> String {
    let text = raw.trim().to_lowercase();
    if text.len() <= max_len {
        return text;
    }
    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

fn join_nonempty<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ; ")
}
