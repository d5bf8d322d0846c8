//! Source module - the marketing channels a lead can be attributed to

/// Marketing channel believed responsible for generating a lead
///
/// Exactly one value is current for a lead at any time; pipeline stages
/// overwrite it through [`crate::AttributionResult`] methods. The variant
/// order documents the classifier's fixed priority: Direct evidence outranks
/// paid-campaign evidence, which outranks organic keyword evidence, which
/// outranks referral phrasing. `Unknown` is the default for leads matching
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Existing-customer / direct contact
    Direct,

    /// Paid search campaign (Google Ads or equivalent)
    Ppc,

    /// Organic search
    Seo,

    /// Word-of-mouth referral
    Referral,

    /// No attributing evidence found
    Unknown,
}

impl Source {
    /// All variants in classifier priority order
    pub const PRIORITY_ORDER: [Source; 5] = [
        Source::Direct,
        Source::Ppc,
        Source::Seo,
        Source::Referral,
        Source::Unknown,
    ];

    /// Get the source name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Direct => "Direct",
            Source::Ppc => "PPC",
            Source::Seo => "SEO",
            Source::Referral => "Referral",
            Source::Unknown => "Unknown",
        }
    }

    /// Parse a source from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "direct" => Some(Source::Direct),
            "ppc" | "paid" => Some(Source::Ppc),
            "seo" | "organic" => Some(Source::Seo),
            "referral" => Some(Source::Referral),
            "unknown" => Some(Source::Unknown),
            _ => None,
        }
    }

    /// Whether this source carries any attribution at all
    pub fn is_attributed(&self) -> bool {
        !matches!(self, Source::Unknown)
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid source: {}", s))
    }
}
