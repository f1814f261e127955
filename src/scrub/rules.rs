use regex::Regex;

use crate::error::{MailscrubError, Result};

/// Category label carrying the literal-substring replacement semantics in
/// the pattern stage (see `pattern.rs`).
pub const PHONE_CATEGORY: &str = "phone";

/// A single (category, compiled pattern) redaction rule. Immutable once
/// constructed; evaluation order is the order of the owning `RuleSet`.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub category: String,
    pub matcher: Regex,
}

/// An ordered rule list. Built by concatenating a base set with zero or
/// more extension sets; rules are evaluated strictly in construction
/// order, never reordered.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<PatternRule>,
}

impl RuleSet {
    /// Core categories: email, NANP phone, SSN-like national id, IPv4,
    /// IPv6, hostname, UUID.
    pub fn core() -> Self {
        Self::compile(CORE_PATTERNS).expect("built-in core patterns should compile")
    }

    /// The production rule order: the PII extension list (bank
    /// identifiers, street addresses, AU/NZ phones, vehicle plates, URLs)
    /// runs ahead of the core list. Order matters on overlapping matches:
    /// the URL rule subsumes substrings the hostname rule would otherwise
    /// claim.
    pub fn standard() -> Self {
        Self::compile(PII_PATTERNS)
            .expect("built-in pii patterns should compile")
            .extend(Self::core())
    }

    /// Compile a rule list from (category, pattern) pairs. Invalid
    /// patterns surface as a typed error; used for config-supplied
    /// extension rules.
    pub fn compile(pairs: &[(&str, &str)]) -> Result<Self> {
        let mut rules = Vec::with_capacity(pairs.len());
        for (category, pattern) in pairs {
            let matcher = Regex::new(pattern).map_err(|e| MailscrubError::InvalidPattern {
                category: (*category).to_string(),
                reason: e.to_string(),
            })?;
            rules.push(PatternRule {
                category: (*category).to_string(),
                matcher,
            });
        }
        Ok(Self { rules })
    }

    /// Append another rule list after this one, preserving both orders.
    pub fn extend(mut self, other: RuleSet) -> Self {
        self.rules.extend(other.rules);
        self
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Base categories shared by every rule set.
const CORE_PATTERNS: &[(&str, &str)] = &[
    ("email", r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"),
    (PHONE_CATEGORY, r"\b\(?\d{3}\)?[-\s]?\d{3}[-\s]?\d{4}\b"),
    ("national_id", r"\b\d{3}-?\d{2}-?\d{4}\b"),
    (
        "ipv4",
        r"\b(?:(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\b",
    ),
    ("ipv6", r"\b(?:[0-9A-Fa-f]{1,4}:){7}[0-9A-Fa-f]{1,4}\b"),
    (
        "hostname",
        r"\b(?:(?:[a-zA-Z]|[a-zA-Z][a-zA-Z0-9-]*[a-zA-Z0-9])\.)*(?:(?:[A-Za-z]|[A-Za-z][A-Za-z0-9-]*[A-Za-z0-9])\.[a-zA-Z]{2,}|xn--[A-Za-z0-9]+)\b",
    ),
    (
        "uuid",
        r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b",
    ),
];

/// PII extension categories, evaluated ahead of the core list. The three
/// vehicle-plate rules stay disjoint; no single expression covers all
/// plate formats without swallowing unrelated tokens.
const PII_PATTERNS: &[(&str, &str)] = &[
    ("iban", r"\b([A-Z]{2}\d{2}[-\s]?[A-Z0-9\s-]{1,33}\d)\b"),
    ("bank_account", r"\b\d{2}-\d{4}-\d{7}-\d{2,3}\b"),
    (
        "street_address",
        r"(?i)\b\d+\s*[\w\s]+?\s+(?:Street|St|Lane|Ln|Avenue|Ave|Av|Road|Rd)\b",
    ),
    (
        PHONE_CATEGORY,
        r"\b(?:\+?6[14][-\s]?)?\(?0?\d{1,2}\)?[-\s]?\d{3,4}[-\s]?\d{3,4}\b",
    ),
    ("vehicle_plate", r"\b\d?\s?[A-Z]{2,4}[-\s]?[A-Z]?\d{2,4}\b"),
    ("vehicle_plate", r"\b\d{2,4}[-\s]?[A-Z]{2,4}\b"),
    ("vehicle_plate", r"\b[A-Z]{2}[-\s]?\d{5}\b"),
    (
        "url",
        r"\b(?:https?://)?[a-zA-Z0-9./?:@_=#-]+\.[a-zA-Z]{2,6}[a-zA-Z0-9.&/?:@_=#-]*",
    ),
];
