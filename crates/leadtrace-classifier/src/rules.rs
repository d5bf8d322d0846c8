//! Declarative pattern rule tables
//!
//! A rule table is an ordered list of per-source rule sets. Set order is the
//! classifier's documented source priority: paid-campaign evidence outranks
//! organic keyword evidence, which outranks weak/default Unknown. Within a
//! set, rules are tried in order and the first match wins.

use crate::error::ClassifierError;
use leadtrace_domain::{LeadRecord, Source};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Which lead field a rule matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
    /// The lead's email address
    Email,
    /// Normalized subject text
    Subject,
    /// Normalized body text
    Content,
    /// Any extracted keyword
    Keywords,
    /// Subject or content
    AnyText,
}

/// One declarative pattern rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Human-readable rule name, used in the attribution detail
    pub label: String,

    /// Regex pattern (compiled case-insensitively)
    pub pattern: String,

    /// Field the pattern is applied to
    pub field: MatchField,

    /// Confidence seed when this rule decides the attribution
    pub weight: f64,
}

/// Ordered rules for one candidate source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSetSpec {
    /// Resulting source when any member matches
    pub source: String,

    /// Ordered member rules
    pub rules: Vec<RuleSpec>,
}

/// The full declarative table, sets in priority order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleTableSpec {
    /// Rule sets, highest priority first
    pub sets: Vec<RuleSetSpec>,
}

impl RuleTableSpec {
    /// Load a table spec from TOML
    pub fn from_toml(toml_str: &str) -> Result<Self, ClassifierError> {
        toml::from_str(toml_str).map_err(|e| ClassifierError::Toml(e.to_string()))
    }

    /// Serialize the table spec to TOML
    pub fn to_toml(&self) -> Result<String, ClassifierError> {
        toml::to_string_pretty(self).map_err(|e| ClassifierError::Toml(e.to_string()))
    }
}

/// A compiled rule ready for evaluation
#[derive(Debug)]
pub struct CompiledRule {
    /// Rule name for the audit trail
    pub label: String,
    /// Case-insensitive compiled pattern
    pub regex: Regex,
    /// Field the pattern is applied to
    pub field: MatchField,
    /// Confidence seed
    pub weight: f64,
}

/// A compiled per-source rule set
#[derive(Debug)]
pub struct CompiledRuleSet {
    /// Resulting source
    pub source: Source,
    /// Ordered member rules
    pub rules: Vec<CompiledRule>,
}

/// The outcome of evaluating a table against one lead
#[derive(Debug)]
pub struct RuleMatch<'a> {
    /// Source assigned by the winning set
    pub source: Source,
    /// The winning rule
    pub rule: &'a CompiledRule,
}

/// Compiled, evaluation-ready rule table
#[derive(Debug)]
pub struct RuleTable {
    sets: Vec<CompiledRuleSet>,
}

impl RuleTable {
    /// Compile a declarative spec
    pub fn compile(spec: &RuleTableSpec) -> Result<Self, ClassifierError> {
        let mut sets = Vec::with_capacity(spec.sets.len());
        for set in &spec.sets {
            let source = Source::parse(&set.source)
                .ok_or_else(|| ClassifierError::UnknownSource(set.source.clone()))?;
            let rules = set
                .rules
                .iter()
                .map(|r| compile_rule(r))
                .collect::<Result<Vec<_>, _>>()?;
            sets.push(CompiledRuleSet { source, rules });
        }
        Ok(Self { sets })
    }

    /// The built-in default table
    ///
    /// Stands in for deployment-specific rule data (customer domain
    /// whitelists, exported ranking keyword lists, campaign identifiers),
    /// which operators load from TOML in the same shape.
    pub fn default_table() -> Self {
        Self::compile(&Self::default_spec()).expect("default rule table compiles")
    }

    /// The declarative form of the default table
    pub fn default_spec() -> RuleTableSpec {
        RuleTableSpec {
            sets: vec![
                RuleSetSpec {
                    source: "Direct".to_string(),
                    rules: vec![RuleSpec {
                        label: "helpdesk team interaction".to_string(),
                        pattern: r"sales executive|team lead|corporate accounts".to_string(),
                        field: MatchField::Content,
                        weight: 60.0,
                    }],
                },
                RuleSetSpec {
                    source: "PPC".to_string(),
                    rules: vec![
                        RuleSpec {
                            label: "campaign landing page".to_string(),
                            pattern: r"\([\w ]+ lp\)".to_string(),
                            field: MatchField::Subject,
                            weight: 85.0,
                        },
                        RuleSpec {
                            label: "paid click marker".to_string(),
                            pattern: r"gclid|google ads".to_string(),
                            field: MatchField::AnyText,
                            weight: 80.0,
                        },
                    ],
                },
                RuleSetSpec {
                    source: "SEO".to_string(),
                    rules: vec![RuleSpec {
                        label: "organic ranking keyword".to_string(),
                        pattern: r"^(custom )?(lanyards?|badges?|business cards?|banners?|stickers?)$"
                            .to_string(),
                        field: MatchField::Keywords,
                        weight: 70.0,
                    }],
                },
                RuleSetSpec {
                    source: "Referral".to_string(),
                    rules: vec![RuleSpec {
                        label: "referral phrasing".to_string(),
                        pattern: r"referred|referral|recommended".to_string(),
                        field: MatchField::Content,
                        weight: 55.0,
                    }],
                },
            ],
        }
    }

    /// First matching rule in priority order, or `None`
    ///
    /// The first rule set with any matching member wins; later sets are not
    /// consulted. Within the winning set the first matching rule decides.
    pub fn first_match(&self, lead: &LeadRecord) -> Option<RuleMatch<'_>> {
        for set in &self.sets {
            for rule in &set.rules {
                if rule_matches(rule, lead) {
                    return Some(RuleMatch {
                        source: set.source,
                        rule,
                    });
                }
            }
        }
        None
    }

    /// Number of rule sets in the table
    pub fn set_count(&self) -> usize {
        self.sets.len()
    }
}

fn compile_rule(spec: &RuleSpec) -> Result<CompiledRule, ClassifierError> {
    let regex = RegexBuilder::new(&spec.pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ClassifierError::InvalidPattern {
            label: spec.label.clone(),
            message: e.to_string(),
        })?;
    Ok(CompiledRule {
        label: spec.label.clone(),
        regex,
        field: spec.field,
        weight: spec.weight,
    })
}

fn rule_matches(rule: &CompiledRule, lead: &LeadRecord) -> bool {
    match rule.field {
        MatchField::Email => rule.regex.is_match(&lead.email),
        MatchField::Subject => rule.regex.is_match(&lead.subject_text),
        MatchField::Content => rule.regex.is_match(&lead.content_text),
        MatchField::Keywords => lead.keywords.iter().any(|k| rule.regex.is_match(k)),
        MatchField::AnyText => {
            rule.regex.is_match(&lead.subject_text) || rule.regex.is_match(&lead.content_text)
        }
    }
}
