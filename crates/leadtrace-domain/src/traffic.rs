//! Traffic sample module - rows of an external analytics feed

use crate::source::Source;
use chrono::{DateTime, Utc};

/// Organic/paid classification of an analytics medium
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediumClass {
    /// Organic search media
    Organic,
    /// Paid media (cpc, ppc, paid, cpm)
    Paid,
    /// Anything else (referral, email, direct, ...)
    Other,
}

/// One `(timestamp, source, medium, sessions)` row from an analytics feed
///
/// Read-only input to the correlator; acquisition of the feed itself is an
/// external collaborator's concern.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficSample {
    /// When the sessions were observed
    pub timestamp: DateTime<Utc>,

    /// Traffic source (google, bing, facebook, ...)
    pub source: String,

    /// Traffic medium (organic, cpc, ppc, ...)
    pub medium: String,

    /// Observed session count
    pub sessions: u64,
}

impl TrafficSample {
    const ORGANIC_SOURCES: [&'static str; 3] = ["google", "bing", "yahoo"];
    const PAID_SOURCES: [&'static str; 3] = ["google", "bing", "facebook"];

    /// Classify this sample's medium
    pub fn medium_class(&self) -> MediumClass {
        match self.medium.to_lowercase().as_str() {
            "organic" => MediumClass::Organic,
            "cpc" | "ppc" | "paid" | "cpm" => MediumClass::Paid,
            _ => MediumClass::Other,
        }
    }

    /// Whether this sample's medium marks a paid ad click (cpc, ppc, paid)
    ///
    /// `cpm` display traffic is not a click and never counts here, and no
    /// source restriction applies: any platform can buy paid clicks.
    pub fn is_paid_click(&self) -> bool {
        matches!(self.medium.to_lowercase().as_str(), "cpc" | "ppc" | "paid")
    }

    /// Whether this sample corroborates an attribution to `source`
    ///
    /// The fixed compatibility map: organic media from search engines map to
    /// SEO, paid media from ad platforms map to PPC. No other attribution
    /// has corroborating traffic.
    pub fn is_compatible_with(&self, source: Source) -> bool {
        let sample_source = self.source.to_lowercase();
        match source {
            Source::Seo => {
                self.medium_class() == MediumClass::Organic
                    && Self::ORGANIC_SOURCES.contains(&sample_source.as_str())
            }
            Source::Ppc => {
                self.medium_class() == MediumClass::Paid
                    && Self::PAID_SOURCES.contains(&sample_source.as_str())
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(source: &str, medium: &str) -> TrafficSample {
        TrafficSample {
            timestamp: Utc.with_ymd_and_hms(2024, 6, 12, 10, 0, 0).unwrap(),
            source: source.to_string(),
            medium: medium.to_string(),
            sessions: 5,
        }
    }

    #[test]
    fn test_medium_classification() {
        assert_eq!(sample("google", "organic").medium_class(), MediumClass::Organic);
        assert_eq!(sample("google", "cpc").medium_class(), MediumClass::Paid);
        assert_eq!(sample("google", "CPM").medium_class(), MediumClass::Paid);
        assert_eq!(sample("newsletter", "email").medium_class(), MediumClass::Other);
    }

    #[test]
    fn test_paid_click_media() {
        assert!(sample("google", "cpc").is_paid_click());
        assert!(sample("linkedin", "PPC").is_paid_click());
        assert!(sample("facebook", "paid").is_paid_click());
        assert!(!sample("google", "cpm").is_paid_click());
        assert!(!sample("google", "organic").is_paid_click());
    }

    #[test]
    fn test_compatibility_map() {
        assert!(sample("google", "organic").is_compatible_with(Source::Seo));
        assert!(sample("Bing", "organic").is_compatible_with(Source::Seo));
        assert!(!sample("google", "cpc").is_compatible_with(Source::Seo));

        assert!(sample("google", "cpc").is_compatible_with(Source::Ppc));
        assert!(sample("facebook", "paid").is_compatible_with(Source::Ppc));
        assert!(!sample("yahoo", "organic").is_compatible_with(Source::Ppc));

        assert!(!sample("google", "organic").is_compatible_with(Source::Direct));
        assert!(!sample("google", "cpc").is_compatible_with(Source::Unknown));
    }
}
