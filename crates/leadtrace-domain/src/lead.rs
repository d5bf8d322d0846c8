//! Lead module - one inbound contact and its normalized evidence

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

/// One ticket or email text block belonging to a lead
#[derive(Debug, Clone, PartialEq)]
pub struct TicketMessage {
    /// Normalized (lowercased) subject line; empty when absent
    pub subject: String,

    /// Normalized (lowercased) body text; empty when absent
    pub content: String,

    /// Message timestamp; `None` when unparsable or absent
    pub timestamp: Option<DateTime<Utc>>,
}

/// One distinct inbound contact, immutable once built by the extractor
///
/// Missing evidence is represented as empty strings / empty lists / `None`,
/// never as sentinel values. Downstream stages treat absence as "no
/// evidence", not as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadRecord {
    /// Identity key, lowercased and trimmed
    pub email: String,

    /// Ticket/email text blocks with timestamps
    pub messages: Vec<TicketMessage>,

    /// Extracted product-mention list
    pub products: Vec<String>,

    /// Extracted keyword list (words plus 2-/3-word phrases, deduplicated)
    pub keywords: Vec<String>,

    /// All subjects joined, lowercased
    pub subject_text: String,

    /// All message bodies joined, lowercased
    pub content_text: String,

    /// Earliest parseable message timestamp
    pub first_contact: Option<DateTime<Utc>>,

    /// Pass-through columns from the ingested table, preserved verbatim
    pub extra: Vec<(String, String)>,
}

impl LeadRecord {
    /// Domain part of the email address, empty when malformed
    pub fn email_domain(&self) -> &str {
        self.email.split_once('@').map(|(_, d)| d).unwrap_or("")
    }

    /// Day of week of the first contact, if a timestamp was parseable
    pub fn day_of_week(&self) -> Option<Weekday> {
        self.first_contact.map(|t| t.weekday())
    }

    /// Hour of day (0-23) of the first contact, if a timestamp was parseable
    pub fn hour_of_day(&self) -> Option<u32> {
        self.first_contact.map(|t| t.hour())
    }

    /// Whether this lead carries any text evidence at all
    pub fn has_text_evidence(&self) -> bool {
        !self.subject_text.is_empty() || !self.content_text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lead_at(ts: Option<DateTime<Utc>>) -> LeadRecord {
        LeadRecord {
            email: "alice@example.com".to_string(),
            messages: vec![],
            products: vec![],
            keywords: vec![],
            subject_text: String::new(),
            content_text: String::new(),
            first_contact: ts,
            extra: vec![],
        }
    }

    #[test]
    fn test_email_domain() {
        let lead = lead_at(None);
        assert_eq!(lead.email_domain(), "example.com");

        let mut no_at = lead_at(None);
        no_at.email = "not-an-email".to_string();
        assert_eq!(no_at.email_domain(), "");
    }

    #[test]
    fn test_time_derivations() {
        // 2024-06-12 was a Wednesday
        let ts = Utc.with_ymd_and_hms(2024, 6, 12, 14, 30, 0).unwrap();
        let lead = lead_at(Some(ts));
        assert_eq!(lead.day_of_week(), Some(Weekday::Wed));
        assert_eq!(lead.hour_of_day(), Some(14));
    }

    #[test]
    fn test_missing_timestamp_yields_none() {
        let lead = lead_at(None);
        assert_eq!(lead.day_of_week(), None);
        assert_eq!(lead.hour_of_day(), None);
    }
}
