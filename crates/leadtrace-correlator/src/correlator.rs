//! Traffic correlation stage

use crate::config::CorrelatorConfig;
use chrono::{DateTime, Duration, Utc};
use leadtrace_domain::{
    AttributionResult, AttributionStage, ConfidenceScore, LeadRecord, Source, TrafficSample,
};
use leadtrace_domain::confidence::HIGH_THRESHOLD;
use tracing::{debug, warn};

/// Boost factor cap for session-validated attributions
const MAX_BOOST_FACTOR: f64 = 1.3;
/// Sessions-to-boost divisor: factor = 1 + sessions / divisor
const BOOST_SESSION_DIVISOR: f64 = 100.0;

/// Re-attribution of an Unknown lead: min(cap, base + step * sessions)
const UNKNOWN_PPC_BASE: f64 = 60.0;
const UNKNOWN_PPC_STEP: f64 = 2.0;
const UNKNOWN_PPC_CAP: f64 = 85.0;

/// Re-attribution of a weakly-attributed SEO lead
const WEAK_SEO_PPC_BASE: f64 = 70.0;
const WEAK_SEO_PPC_STEP: f64 = 2.0;
const WEAK_SEO_PPC_CAP: f64 = 90.0;
/// Minimum paid sessions before daring to flip an SEO attribution
const WEAK_SEO_MIN_SESSIONS: u64 = 5;

/// Correlation stage over an owned traffic feed
///
/// Construct it with the feed rows for the analysis period; an empty feed
/// makes the stage a pass-through.
pub struct TrafficCorrelator {
    config: CorrelatorConfig,
    feed: Vec<TrafficSample>,
}

impl TrafficCorrelator {
    /// Create a correlator over a traffic feed
    pub fn new(config: CorrelatorConfig, feed: Vec<TrafficSample>) -> Self {
        Self { config, feed }
    }

    /// Sum of sessions from feed rows compatible with `source` inside the
    /// boost window around `contact`
    fn compatible_sessions(&self, contact: DateTime<Utc>, source: Source) -> u64 {
        let start = contact - Duration::hours(self.config.boost_before_hours);
        let end = contact + Duration::hours(self.config.boost_after_hours);
        self.feed
            .iter()
            .filter(|s| s.timestamp >= start && s.timestamp <= end)
            .filter(|s| s.is_compatible_with(source))
            .map(|s| s.sessions)
            .sum()
    }

    /// Paid-click sessions from any platform inside the lookback window,
    /// plus the source name of the heaviest contributing row
    fn paid_sessions(&self, contact: DateTime<Utc>) -> (u64, Option<String>) {
        let start = contact - Duration::hours(self.config.paid_before_hours);
        let end = contact + Duration::minutes(self.config.paid_after_minutes);
        let mut total = 0u64;
        let mut dominant: Option<&TrafficSample> = None;
        for sample in self
            .feed
            .iter()
            .filter(|s| s.timestamp >= start && s.timestamp <= end)
            .filter(|s| s.is_paid_click())
        {
            total += sample.sessions;
            if dominant.is_none_or(|d| sample.sessions > d.sessions) {
                dominant = Some(sample);
            }
        }
        (total, dominant.map(|s| s.source.to_lowercase()))
    }

    fn boost_pass(&self, leads: &[LeadRecord], results: &mut [AttributionResult]) {
        for (lead, result) in leads.iter().zip(results.iter_mut()) {
            let source = result.source();
            if !matches!(source, Source::Seo | Source::Ppc) {
                continue;
            }
            let Some(contact) = lead.first_contact else {
                continue;
            };
            let sessions = self.compatible_sessions(contact, source);
            if sessions == 0 {
                continue;
            }

            let factor = (1.0 + sessions as f64 / BOOST_SESSION_DIVISOR).min(MAX_BOOST_FACTOR);
            debug!(email = %lead.email, sessions, factor, "traffic validation boost");
            result.boost(factor, sessions);
        }
    }

    fn reattribution_pass(&self, leads: &[LeadRecord], results: &mut [AttributionResult]) {
        for (lead, result) in leads.iter().zip(results.iter_mut()) {
            let Some(contact) = lead.first_contact else {
                continue;
            };
            let (sessions, dominant) = self.paid_sessions(contact);
            if sessions == 0 {
                continue;
            }

            let confidence = match result.source() {
                Source::Unknown => {
                    ConfidenceScore::new(
                        UNKNOWN_PPC_CAP.min(UNKNOWN_PPC_BASE + UNKNOWN_PPC_STEP * sessions as f64),
                    )
                }
                Source::Seo
                    if result.confidence().value() < HIGH_THRESHOLD
                        && sessions > WEAK_SEO_MIN_SESSIONS =>
                {
                    ConfidenceScore::new(
                        WEAK_SEO_PPC_CAP
                            .min(WEAK_SEO_PPC_BASE + WEAK_SEO_PPC_STEP * sessions as f64),
                    )
                }
                _ => continue,
            };

            let detail = format!(
                "GA4 PPC detection: {} paid sessions from {}",
                sessions,
                dominant.as_deref().unwrap_or("unknown"),
            );
            debug!(email = %lead.email, sessions, "paid re-attribution");
            result.reattribute(
                Source::Ppc,
                confidence,
                detail,
                AttributionResult::SOURCE_GA4_PPC,
            );
        }
    }
}

impl AttributionStage for TrafficCorrelator {
    fn name(&self) -> &'static str {
        "traffic-correlator"
    }

    fn apply(
        &self,
        leads: &[LeadRecord],
        mut results: Vec<AttributionResult>,
    ) -> Vec<AttributionResult> {
        if self.feed.is_empty() {
            warn!("empty traffic feed, correlation skipped");
            return results;
        }
        self.boost_pass(leads, &mut results);
        self.reattribution_pass(leads, &mut results);
        results
    }
}
