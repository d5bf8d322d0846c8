//! Input types for the extractor

/// One raw `(subject, content, timestamp)` text record for a lead
///
/// All fields are unparsed strings exactly as supplied by the evidence
/// provider; empty strings mean absent data and are valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTicket {
    /// Raw subject line(s)
    pub subject: String,

    /// Raw body / conversation text
    pub content: String,

    /// Raw timestamp string, parsed leniently downstream
    pub timestamp: String,
}

/// One raw lead row as supplied by the evidence provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawLead {
    /// Lead email identity, not yet normalized
    pub email: String,

    /// Zero or more ticket/email text records
    pub tickets: Vec<RawTicket>,

    /// Semicolon-separated product mentions
    pub products: String,

    /// Pass-through columns preserved verbatim into the output
    pub extra: Vec<(String, String)>,
}
