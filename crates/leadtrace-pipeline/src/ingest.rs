//! Table ingestion
//!
//! Turns exported helpdesk/analytics tables into pipeline inputs. One lead
//! per distinct email address: every ticket row for the same address folds
//! into the same `RawLead`, in file order. Row-level problems (blank email,
//! unparsable traffic timestamp) skip that row with a warning; only a
//! structurally unusable header aborts.

use crate::error::PipelineError;
use crate::table;
use leadtrace_domain::TrafficSample;
use leadtrace_extractor::{parse_timestamp, RawLead, RawTicket};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Accepted header names per lead column; later entries are export aliases
const LEAD_COLUMNS: [&[&str]; 5] = [
    &["email"],
    &["subject", "ticket_subjects"],
    &["content", "conversation_snippets"],
    &["timestamp", "first_ticket_date"],
    &["products", "products_mentioned"],
];

struct Header {
    indices: Vec<Option<usize>>,
    extras: Vec<(usize, String)>,
}

impl Header {
    fn from_row(row: &[String], known: &[&[&str]]) -> Self {
        let normalized: Vec<String> =
            row.iter().map(|h| h.trim().to_lowercase()).collect();
        let indices: Vec<Option<usize>> = known
            .iter()
            .map(|aliases| {
                normalized
                    .iter()
                    .position(|h| aliases.contains(&h.as_str()))
            })
            .collect();
        let matched: Vec<usize> = indices.iter().flatten().copied().collect();
        let extras = normalized
            .iter()
            .enumerate()
            .filter(|(i, _)| !matched.contains(i))
            .map(|(i, h)| (i, h.clone()))
            .collect();
        Self { indices, extras }
    }

    fn get<'a>(&self, row: &'a [String], column: usize) -> &'a str {
        self.indices[column]
            .and_then(|i| row.get(i))
            .map(|s| s.as_str())
            .unwrap_or("")
    }
}

/// Build raw leads from parsed table rows (header row first)
pub fn leads_from_rows(rows: &[Vec<String>]) -> Result<Vec<RawLead>, PipelineError> {
    let Some(header_row) = rows.first() else {
        return Ok(Vec::new());
    };
    let header = Header::from_row(header_row, &LEAD_COLUMNS);
    if header.indices[0].is_none() {
        return Err(PipelineError::MalformedRecord {
            line: 1,
            message: "lead table has no 'email' column".to_string(),
        });
    }

    let mut leads: Vec<RawLead> = Vec::new();
    let mut by_email: HashMap<String, usize> = HashMap::new();

    for (line, row) in rows.iter().enumerate().skip(1) {
        let email = header.get(row, 0).trim().to_lowercase();
        if email.is_empty() {
            warn!(line = line + 1, "row without email skipped");
            continue;
        }

        let ticket = RawTicket {
            subject: header.get(row, 1).to_string(),
            content: header.get(row, 2).to_string(),
            timestamp: header.get(row, 3).to_string(),
        };
        let products = header.get(row, 4).trim();

        let idx = *by_email.entry(email.clone()).or_insert_with(|| {
            leads.push(RawLead {
                email,
                tickets: Vec::new(),
                products: String::new(),
                extra: header
                    .extras
                    .iter()
                    .map(|(i, name)| {
                        (name.clone(), row.get(*i).cloned().unwrap_or_default())
                    })
                    .collect(),
            });
            leads.len() - 1
        });

        leads[idx].tickets.push(ticket);
        if !products.is_empty() {
            if !leads[idx].products.is_empty() {
                leads[idx].products.push(';');
            }
            leads[idx].products.push_str(products);
        }
    }

    Ok(leads)
}

/// Read and group the lead table from a file
pub fn read_leads(path: &Path) -> Result<Vec<RawLead>, PipelineError> {
    let text = std::fs::read_to_string(path).map_err(|e| PipelineError::MissingEvidence {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let leads = leads_from_rows(&table::parse(&text)?)?;
    info!(path = %path.display(), leads = leads.len(), "lead table loaded");
    Ok(leads)
}

/// Accepted header names per traffic column
const TRAFFIC_COLUMNS: [&[&str]; 4] =
    [&["timestamp", "datetime"], &["source"], &["medium"], &["sessions"]];

/// Build traffic samples from parsed table rows (header row first)
///
/// Rows whose timestamp or session count does not parse are skipped.
pub fn traffic_from_rows(rows: &[Vec<String>]) -> Result<Vec<TrafficSample>, PipelineError> {
    let Some(header_row) = rows.first() else {
        return Ok(Vec::new());
    };
    let header = Header::from_row(header_row, &TRAFFIC_COLUMNS);
    for (i, aliases) in TRAFFIC_COLUMNS.iter().enumerate() {
        if header.indices[i].is_none() {
            return Err(PipelineError::MalformedRecord {
                line: 1,
                message: format!("traffic table has no '{}' column", aliases[0]),
            });
        }
    }

    let mut samples = Vec::new();
    for (line, row) in rows.iter().enumerate().skip(1) {
        let Some(timestamp) = parse_timestamp(header.get(row, 0)) else {
            warn!(line = line + 1, "traffic row without parseable timestamp skipped");
            continue;
        };
        let sessions: u64 = match header.get(row, 3).trim().parse() {
            Ok(n) => n,
            Err(_) => {
                warn!(line = line + 1, "traffic row with bad session count skipped");
                continue;
            }
        };
        samples.push(TrafficSample {
            timestamp,
            source: header.get(row, 1).trim().to_string(),
            medium: header.get(row, 2).trim().to_string(),
            sessions,
        });
    }
    Ok(samples)
}

/// Read the traffic feed from a file
pub fn read_traffic(path: &Path) -> Result<Vec<TrafficSample>, PipelineError> {
    let text = std::fs::read_to_string(path).map_err(|e| PipelineError::FeedUnavailable {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let samples = traffic_from_rows(&table::parse(&text)?)?;
    info!(path = %path.display(), samples = samples.len(), "traffic feed loaded");
    Ok(samples)
}

/// Read and merge several traffic feeds, sorted by timestamp
///
/// An unreadable or structurally broken feed downgrades correlation, never
/// the batch: the feed is skipped with a warning and the merge continues
/// with whatever rows loaded. Samples with equal timestamps keep the order
/// of the `paths` argument, so the merged feed is deterministic for a given
/// invocation.
pub fn read_traffic_feeds<P: AsRef<Path>>(paths: &[P]) -> Vec<TrafficSample> {
    let mut merged = Vec::new();
    for path in paths {
        match read_traffic(path.as_ref()) {
            Ok(samples) => merged.extend(samples),
            Err(e) => warn!(error = %e, "traffic feed skipped"),
        }
    }
    merged.sort_by_key(|s| s.timestamp);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(text: &str) -> Vec<Vec<String>> {
        table::parse(text).unwrap()
    }

    #[test]
    fn test_leads_grouped_by_email() {
        let text = "email,subject,content,timestamp,products\n\
                    a@x.com,first,hello,2024-06-10 10:00:00,Lanyards\n\
                    b@y.com,other,hi,2024-06-10 11:00:00,\n\
                    A@X.com ,second,again,2024-06-11 09:00:00,Badges\n";
        let leads = leads_from_rows(&rows(text)).unwrap();

        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].email, "a@x.com");
        assert_eq!(leads[0].tickets.len(), 2);
        assert_eq!(leads[0].products, "Lanyards;Badges");
        assert_eq!(leads[1].email, "b@y.com");
    }

    #[test]
    fn test_rows_without_email_skipped() {
        let text = "email,subject,content,timestamp,products\n\
                    ,orphan,text,,\n\
                    a@x.com,kept,text,,\n";
        let leads = leads_from_rows(&rows(text)).unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].tickets[0].subject, "kept");
    }

    #[test]
    fn test_extra_columns_preserved() {
        let text = "email,subject,content,timestamp,products,region\n\
                    a@x.com,s,c,,,APAC\n";
        let leads = leads_from_rows(&rows(text)).unwrap();
        assert_eq!(leads[0].extra, vec![("region".to_string(), "APAC".to_string())]);
    }

    #[test]
    fn test_missing_email_column_is_malformed() {
        let text = "subject,content\nhello,world\n";
        assert!(matches!(
            leads_from_rows(&rows(text)),
            Err(PipelineError::MalformedRecord { line: 1, .. })
        ));
    }

    #[test]
    fn test_empty_table_yields_no_leads() {
        assert!(leads_from_rows(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_traffic_rows_parsed() {
        let text = "timestamp,source,medium,sessions\n\
                    2024-06-10 09:00:00,google,cpc,12\n\
                    2024-06-10 10:00:00,bing,organic,3\n";
        let samples = traffic_from_rows(&rows(text)).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].source, "google");
        assert_eq!(samples[0].sessions, 12);
    }

    #[test]
    fn test_bad_traffic_rows_skipped() {
        let text = "timestamp,source,medium,sessions\n\
                    not-a-time,google,cpc,12\n\
                    2024-06-10 10:00:00,google,cpc,many\n\
                    2024-06-10 11:00:00,google,cpc,4\n";
        let samples = traffic_from_rows(&rows(text)).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].sessions, 4);
    }

    #[test]
    fn test_missing_traffic_column_is_malformed() {
        let text = "timestamp,source,sessions\n2024-06-10 10:00:00,google,3\n";
        assert!(traffic_from_rows(&rows(text)).is_err());
    }

    #[test]
    fn test_lead_header_aliases_accepted() {
        let text = "email,ticket_subjects,conversation_snippets,first_ticket_date,products_mentioned\n\
                    a@x.com,hello,body,2024-06-10 10:00:00,Lanyards\n";
        let leads = leads_from_rows(&rows(text)).unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].tickets[0].subject, "hello");
        assert_eq!(leads[0].tickets[0].timestamp, "2024-06-10 10:00:00");
        assert_eq!(leads[0].products, "Lanyards");
        assert!(leads[0].extra.is_empty());
    }

    #[test]
    fn test_traffic_header_alias_accepted() {
        let text = "datetime,source,medium,sessions\n\
                    2024-06-10 09:00:00,google,cpc,12\n";
        let samples = traffic_from_rows(&rows(text)).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].sessions, 12);
    }

    #[test]
    fn test_traffic_feeds_merged_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        std::fs::write(
            &first,
            "timestamp,source,medium,sessions\n\
             2024-06-10 12:00:00,google,cpc,5\n",
        )
        .unwrap();
        std::fs::write(
            &second,
            "timestamp,source,medium,sessions\n\
             2024-06-10 09:00:00,bing,organic,2\n\
             2024-06-10 15:00:00,google,cpc,8\n",
        )
        .unwrap();

        let merged = read_traffic_feeds(&[first, second]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].source, "bing");
        assert_eq!(merged[1].sessions, 5);
        assert_eq!(merged[2].sessions, 8);
    }

    #[test]
    fn test_unreadable_feed_skipped_in_merge() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.csv");
        std::fs::write(
            &good,
            "timestamp,source,medium,sessions\n\
             2024-06-10 09:00:00,google,cpc,12\n",
        )
        .unwrap();
        let missing = dir.path().join("missing.csv");

        let merged = read_traffic_feeds(&[good, missing]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].sessions, 12);
    }

    #[test]
    fn test_read_leads_missing_file() {
        let err = read_leads(Path::new("/nonexistent/leads.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::MissingEvidence { .. }));
    }
}
